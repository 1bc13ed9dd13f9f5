use glam::Vec2;

/// Axis-aligned box in CSS pixels, as returned by a bounding-box query
/// (viewport-relative unless stated otherwise).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Leading coordinate along `axis` (top or left).
    #[inline]
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Size along `axis` (height or width).
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    /// Convert viewport-width units to pixels.
    #[inline]
    pub fn vw(&self, value: f32) -> f32 {
        self.width * value / 100.0
    }

    /// Convert viewport-height units to pixels.
    #[inline]
    pub fn vh(&self, value: f32) -> f32 {
        self.height * value / 100.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1440.0, 900.0)
    }
}

/// Capability for reading where an element currently sits on screen.
///
/// Trackers and the cursor depend on this instead of on a rendering tree, so
/// the same code runs against the DOM in the browser and against fixed boxes
/// in host tests.
pub trait GeometryQuery {
    type Handle;

    fn query_bounding_box(&self, handle: &Self::Handle) -> Rect;
}

/// Replace NaN/∞ coordinates from a bad geometry read with 0 so they cannot
/// poison downstream arithmetic.
#[inline]
pub fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
