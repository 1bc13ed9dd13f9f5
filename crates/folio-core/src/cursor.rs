//! Magnetic custom cursor.
//!
//! The cursor is a dot that sits exactly on the pointer and a ring that is
//! pulled toward the center of whatever interactive element is hovered. The
//! engine only exists while the device has a precise pointer; losing that
//! capability destroys the cursor state.

use glam::Vec2;

use crate::constants::{
    CURSOR_MAX_STEP_SEC, CURSOR_RING_BUTTON_PX, CURSOR_RING_IDLE_PX, CURSOR_RING_LABELED_PX,
    CURSOR_SPRING_DAMPING, CURSOR_SPRING_STIFFNESS, MAGNETIC_RADIUS_PX, MAGNETIC_STRENGTH,
    MIN_POINTER_DISTANCE_PX,
};
use crate::error::{ConfigurationError, Result};
use crate::geometry::{GeometryQuery, Rect};
use crate::signal::PointerCapability;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorVariant {
    #[default]
    Default,
    View,
    Explore,
    Button,
}

impl CursorVariant {
    /// Resolve the variant for a hovered element from its `data-cursor`
    /// annotation and tag name. The annotation wins; `a` and `button` tags
    /// (or a `pointer` annotation) fall back to the button variant.
    pub fn resolve(annotation: Option<&str>, tag: &str) -> Self {
        match annotation.map(str::trim) {
            Some("explore") => return CursorVariant::Explore,
            Some("view") => return CursorVariant::View,
            Some("pointer") => return CursorVariant::Button,
            _ => {}
        }
        if tag.eq_ignore_ascii_case("a") || tag.eq_ignore_ascii_case("button") {
            CursorVariant::Button
        } else {
            CursorVariant::Default
        }
    }

    #[inline]
    pub fn is_hovered(self) -> bool {
        self != CursorVariant::Default
    }

    pub fn ring_size(self) -> f32 {
        match self {
            CursorVariant::View | CursorVariant::Explore => CURSOR_RING_LABELED_PX,
            CursorVariant::Button => CURSOR_RING_BUTTON_PX,
            CursorVariant::Default => CURSOR_RING_IDLE_PX,
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            CursorVariant::View => Some("View"),
            CursorVariant::Explore => Some("Explore"),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticConfig {
    radius: f32,
    strength: f32,
}

impl MagneticConfig {
    pub fn new(radius: f32, strength: f32) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigurationError::InvalidMagneticRadius(radius));
        }
        if !strength.is_finite() || strength <= 0.0 || strength > 1.0 {
            return Err(ConfigurationError::InvalidMagneticStrength(strength));
        }
        Ok(Self { radius, strength })
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Fraction of the pointer-to-center gap closed at distance `d`.
    #[inline]
    pub fn pull_factor(&self, d: f32) -> f32 {
        let d = d.max(MIN_POINTER_DISTANCE_PX);
        (self.radius / d).min(1.0) * self.strength
    }
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            radius: MAGNETIC_RADIUS_PX,
            strength: MAGNETIC_STRENGTH,
        }
    }
}

/// Pointer position pulled toward `center`; exactly `pointer` when there is
/// no center.
pub fn magnetic_position(pointer: Vec2, center: Option<Vec2>, config: &MagneticConfig) -> Vec2 {
    let Some(center) = center else {
        return pointer;
    };
    let delta = center - pointer;
    let d = delta.length();
    if !d.is_finite() {
        return pointer;
    }
    pointer + delta * config.pull_factor(d)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CursorState {
    pub position: Vec2,
    pub variant: CursorVariant,
    pub hover_target: Option<Rect>,
}

impl Default for CursorState {
    fn default() -> Self {
        // parked off-screen until the first pointer move
        Self {
            position: Vec2::new(-100.0, -100.0),
            variant: CursorVariant::Default,
            hover_target: None,
        }
    }
}

/// What to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorFrame {
    pub dot: Vec2,
    pub ring: Vec2,
    pub ring_size: f32,
    pub label: Option<&'static str>,
    pub hovered: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct RingSpring {
    pos: Vec2,
    vel: Vec2,
    initialized: bool,
}

impl RingSpring {
    fn step(&mut self, target: Vec2, dt_sec: f32) -> Vec2 {
        if !self.initialized || !dt_sec.is_finite() {
            self.pos = target;
            self.vel = Vec2::ZERO;
            self.initialized = true;
            return self.pos;
        }
        let mut remaining = dt_sec.max(0.0);
        while remaining > 0.0 {
            let h = remaining.min(CURSOR_MAX_STEP_SEC);
            let accel =
                (target - self.pos) * CURSOR_SPRING_STIFFNESS - self.vel * CURSOR_SPRING_DAMPING;
            self.vel += accel * h;
            self.pos += self.vel * h;
            remaining -= h;
        }
        self.pos
    }
}

#[derive(Clone, Debug)]
pub struct CursorProximityEngine {
    config: MagneticConfig,
    state: Option<CursorState>,
    ring: RingSpring,
}

impl CursorProximityEngine {
    pub fn new(config: MagneticConfig) -> Self {
        Self {
            config,
            state: None,
            ring: RingSpring::default(),
        }
    }

    pub fn config(&self) -> &MagneticConfig {
        &self.config
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&CursorState> {
        self.state.as_ref()
    }

    /// Re-evaluate after a capability change. A precise pointer creates the
    /// cursor state (if absent); anything else destroys it.
    pub fn set_capability(&mut self, capability: PointerCapability) {
        match (capability, self.state.is_some()) {
            (PointerCapability::Fine, false) => {
                self.state = Some(CursorState::default());
                self.ring = RingSpring::default();
                log::info!("[cursor] enabled");
            }
            (PointerCapability::Coarse, true) => {
                self.state = None;
                log::info!("[cursor] disabled (no precise pointer)");
            }
            _ => {}
        }
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        if let Some(state) = self.state.as_mut() {
            if position.is_finite() {
                state.position = position;
            }
        }
    }

    /// Pointer entered an element whose role resolved to `variant`. The
    /// default variant clears any hover target.
    pub fn hover(&mut self, variant: CursorVariant, target: Option<Rect>) {
        if let Some(state) = self.state.as_mut() {
            state.variant = variant;
            state.hover_target = if variant.is_hovered() { target } else { None };
        }
    }

    /// Replace the hover target's geometry with a fresh read (targets move
    /// while the page scrolls).
    pub fn refresh_target<G: GeometryQuery>(&mut self, geometry: &G, handle: &G::Handle) {
        if let Some(state) = self.state.as_mut() {
            if state.hover_target.is_some() {
                state.hover_target = Some(geometry.query_bounding_box(handle));
            }
        }
    }

    /// Pointer left the document root.
    pub fn leave_document(&mut self) {
        self.hover(CursorVariant::Default, None);
    }

    /// Where the ring is aiming, before spring smoothing.
    pub fn rendered_position(&self) -> Option<Vec2> {
        let state = self.state.as_ref()?;
        let center = state
            .hover_target
            .filter(|_| state.variant.is_hovered())
            .map(|r| r.center())
            .filter(|c| c.is_finite());
        Some(magnetic_position(state.position, center, &self.config))
    }

    /// Advance the ring spring and describe the frame; `None` while disabled.
    pub fn frame(&mut self, dt_sec: f32) -> Option<CursorFrame> {
        let target = self.rendered_position()?;
        let state = self.state.as_ref()?;
        let ring = self.ring.step(target, dt_sec);
        Some(CursorFrame {
            dot: state.position,
            ring,
            ring_size: state.variant.ring_size(),
            label: state.variant.label(),
            hovered: state.variant.is_hovered(),
        })
    }
}

impl Default for CursorProximityEngine {
    fn default() -> Self {
        Self::new(MagneticConfig::default())
    }
}
