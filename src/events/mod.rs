pub mod pointer;
pub mod scroll;

pub use pointer::{wire_cursor, CursorBinding};
pub use scroll::wire_ui_signals;
