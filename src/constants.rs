// DOM contract between the page markup and the bindings.
//
// Motion tuning lives in `folio_core::constants`; this file only names the
// selectors, attributes and CSS hooks the bindings read and write.

// Sections
pub const HERO_SELECTOR: &str = "[data-section=\"hero\"]";
pub const HORIZONTAL_SELECTOR: &str = "[data-section=\"horizontal\"]";
pub const PORTFOLIO_SELECTOR: &str = "[data-section=\"portfolio\"]";

// Inside a section
pub const TRACK_SELECTOR: &str = "[data-track]";
pub const PANEL_SELECTOR: &str = "[data-panel]";
pub const PART_SELECTOR: &str = "[data-part]";
pub const PANEL_ATTR: &str = "data-panel"; // "scroll" | "content" | "work" | "footer"
pub const PART_ATTR: &str = "data-part"; // "word:3" addresses item 3 of part "word"
pub const PART_ITEM_SEPARATOR: char = ':';

// Cursor
pub const CURSOR_RING_ID: &str = "cursor-ring";
pub const CURSOR_DOT_ID: &str = "cursor-dot";
pub const CURSOR_LABEL_SELECTOR: &str = "[data-cursor-label]";
pub const CURSOR_ATTR: &str = "data-cursor";
pub const INTERACTIVE_SELECTOR: &str = "a, button, [data-cursor]";
pub const FINE_POINTER_QUERY: &str = "(hover: hover) and (pointer: fine)";

// CSS hooks
pub const SCROLL_P_VAR: &str = "--scroll-p";
pub const SCROLL_P_INV_VAR: &str = "--scroll-p-inv";
pub const INVERTED_CLASS: &str = "inverted";
pub const CURSOR_HOVER_CLASS: &str = "is-hovered";
pub const CURSOR_ACTIVE_CLASS: &str = "has-custom-cursor"; // set on <html> while the cursor is live

// Frame pacing: a tab returning from the background reports one huge delta
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
