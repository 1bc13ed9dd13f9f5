pub mod constants;
pub mod cursor;
pub mod driver;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod orchestrator;
pub mod presets;
pub mod reveal;
pub mod signal;
pub mod style;
pub mod tracker;

pub use cursor::*;
pub use driver::ScrollDriver;
pub use easing::{Direction, Easing};
pub use error::{ConfigurationError, Result};
pub use geometry::*;
pub use orchestrator::*;
pub use reveal::*;
pub use signal::*;
pub use style::{group_by_target, TargetStyle};
pub use tracker::*;
