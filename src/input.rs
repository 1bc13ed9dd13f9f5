use folio_core::presets::{PanelKind, PanelShape};
use folio_core::style::css_number;
use folio_core::{PointerCapability, SectionFrame, Target, TriggerWindow};
use glam::Vec2;

// ---------------- Markup parsing ----------------

/// Parse a `data-part` value: `"image"` or `"word:3"`.
#[inline]
pub fn parse_part(value: &str, separator: char) -> Option<Target> {
    let value = value.trim();
    match value.split_once(separator) {
        Some((part, item)) => {
            let item = item.trim().parse::<usize>().ok()?;
            let part = part.trim();
            (!part.is_empty()).then(|| Target::item(part, item))
        }
        None => (!value.is_empty()).then(|| Target::part(value)),
    }
}

/// Panel kind from its `data-panel` annotation. Anything unrecognized is a
/// scroll panel, which needs the shape read from its markup.
pub fn panel_kind(annotation: Option<&str>, shape: PanelShape) -> PanelKind {
    annotation
        .and_then(PanelKind::from_annotation)
        .unwrap_or(PanelKind::Scroll(shape))
}

#[inline]
pub fn pointer_capability(fine_pointer_matches: bool) -> PointerCapability {
    if fine_pointer_matches {
        PointerCapability::Fine
    } else {
        PointerCapability::Coarse
    }
}

// ---------------- Frame helpers ----------------

/// Seconds since the previous frame, clamped to `[0, max]`.
#[inline]
pub fn clamp_frame_dt(dt_sec: f32, max: f32) -> f32 {
    if dt_sec.is_finite() {
        dt_sec.clamp(0.0, max)
    } else {
        0.0
    }
}

/// `(--scroll-p, --scroll-p-inv)` values for a section frame.
pub fn section_vars(frame: &SectionFrame) -> (String, String) {
    (css_number(frame.progress), css_number(frame.progress_inv))
}

/// Page scroll offset at which a section's raw progress equals `stop`.
#[inline]
pub fn snap_scroll_offset(window: TriggerWindow, stop: f32) -> f32 {
    window.start() + window.length() * stop.clamp(0.0, 1.0)
}

#[inline]
pub fn track_transform(offset_px: f32) -> String {
    format!("translate3d({}px, 0px, 0px)", css_number(offset_px))
}

/// Transform that centers an element of `size` px on `position`.
#[inline]
pub fn centered_transform(position: Vec2, size: f32) -> String {
    let half = size * 0.5;
    format!(
        "translate3d({}px, {}px, 0px)",
        css_number(position.x - half),
        css_number(position.y - half)
    )
}
