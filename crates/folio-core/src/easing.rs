//! Easing curves applied to a local progress fraction.
//!
//! Names follow the tweening vocabulary used in the site markup and config
//! (`none`, `power2.out`, `power1.inOut`, ...), so presets read the same as
//! the animation timelines they reproduce.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    In,
    Out,
    InOut,
}

/// An easing function mapping `[0, 1]` onto `[0, 1]`.
///
/// Power curves take a degree from 1 to 4; degree `n` raises to `n + 1`, so
/// `power1` is quadratic and `power4` quintic.
#[derive(Clone, Copy, Default)]
pub enum Easing {
    #[default]
    Linear,
    Power(u8, Direction),
    CubicBezier(f32, f32, f32, f32),
    Custom(fn(f32) -> f32),
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::Power(degree, dir) => write!(f, "Power({degree}, {dir:?})"),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({x1}, {y1}, {x2}, {y2})")
            }
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Easing {
    pub const POWER1_IN_OUT: Easing = Easing::Power(1, Direction::InOut);
    pub const POWER2_OUT: Easing = Easing::Power(2, Direction::Out);
    pub const POWER2_IN_OUT: Easing = Easing::Power(2, Direction::InOut);

    /// Apply the curve. Input is clamped to `[0, 1]`; a non-finite input is
    /// treated as 0.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::Power(degree, dir) => {
                let exp = i32::from(degree.clamp(1, 4)) + 1;
                match dir {
                    Direction::In => t.powi(exp),
                    Direction::Out => 1.0 - (1.0 - t).powi(exp),
                    Direction::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(exp) * 0.5
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(exp) * 0.5
                        }
                    }
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
            Easing::Custom(f) => f(t),
        }
    }
}

impl FromStr for Easing {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name == "none" || name == "linear" {
            return Ok(Easing::Linear);
        }
        let unknown = || ConfigurationError::UnknownEasing(s.to_string());
        let (family, dir) = match name.split_once('.') {
            Some((family, "in")) => (family, Direction::In),
            Some((family, "out")) => (family, Direction::Out),
            Some((family, "inOut")) => (family, Direction::InOut),
            Some(_) => return Err(unknown()),
            // bare "power2" means the out variant
            None => (name, Direction::Out),
        };
        let degree = match family {
            "power1" | "quad" => 1,
            "power2" | "cubic" => 2,
            "power3" | "quart" => 3,
            "power4" | "quint" => 4,
            _ => return Err(unknown()),
        };
        Ok(Easing::Power(degree, dir))
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let curve = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let slope = |t: f32| (3.0 * ax * t + 2.0 * bx) * t + cx;

    // Newton first, bisection if the slope flattens out.
    let mut t = x;
    for _ in 0..8 {
        let err = curve(ax, bx, cx, t) - x;
        if err.abs() < 1e-6 {
            return curve(ay, by, cy, t);
        }
        let d = slope(t);
        if d.abs() < 1e-6 {
            break;
        }
        t = (t - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = x;
    for _ in 0..24 {
        let err = curve(ax, bx, cx, t) - x;
        if err.abs() < 1e-6 {
            break;
        }
        if err > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
        t = 0.5 * (lo + hi);
    }
    curve(ay, by, cy, t)
}
