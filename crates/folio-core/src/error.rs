//! Setup-time failures.
//!
//! Everything that runs per frame is plain arithmetic over validated
//! configuration, so the only error type in the crate describes a bad
//! configuration caught while channels, trackers or orchestrators are built.

use crate::reveal::Unit;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("degenerate trigger window: end ({end}) must be strictly after start ({start})")]
    DegenerateTriggerWindow { start: f32, end: f32 },
    #[error("invalid trigger position `{0}`")]
    InvalidTriggerPosition(String),
    #[error("unknown easing `{0}`")]
    UnknownEasing(String),
    #[error("channel name must not be empty")]
    EmptyChannelName,
    #[error("duplicate channel `{0}`")]
    DuplicateChannel(String),
    #[error("channel `{name}`: activation window is inverted ({start} > {end})")]
    InvertedActivationWindow { name: String, start: f32, end: f32 },
    #[error("channel `{name}`: {field} is not a finite number")]
    NonFiniteValue { name: String, field: &'static str },
    #[error("channel `{name}`: output range mixes {from:?} and {to:?}")]
    MismatchedOutputUnits { name: String, from: Unit, to: Unit },
    #[error("channel `{name}`: `{property}` cannot be expressed in {unit:?}")]
    UnsupportedUnit {
        name: String,
        property: String,
        unit: Unit,
    },
    #[error("stagger item delay must be non-negative, got {0}")]
    NegativeStaggerDelay(f32),
    #[error("stagger window width must be non-negative, got {0}")]
    NegativeStaggerWidth(f32),
    #[error("stagger speed must be positive, got {0}")]
    InvalidStaggerSpeed(f32),
    #[error("magnetic radius must be positive, got {0}")]
    InvalidMagneticRadius(f32),
    #[error("magnetic strength must be in (0, 1], got {0}")]
    InvalidMagneticStrength(f32),
    #[error("snap duration range is invalid: min {min}, max {max}")]
    InvalidSnapDuration { min: f32, max: f32 },
    #[error("scrub lag must be non-negative, got {0}")]
    InvalidScrub(f32),
    #[error("track geometry is invalid: {0}")]
    InvalidTrack(&'static str),
    #[error("panel `{0}` registered twice")]
    DuplicatePanel(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
