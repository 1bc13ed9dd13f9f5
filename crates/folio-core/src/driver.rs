//! Scrubbed progress with settle-then-snap.
//!
//! Raw scroll progress jumps with every wheel tick. The driver lags the
//! displayed progress behind it and, once input has settled, tweens the
//! displayed value to the nearest snap stop. When the tween lands, the stop
//! is handed out once through [`ScrollDriver::take_settled_stop`] so the host
//! can scroll the page there; raw progress then agrees with what is shown.

use crate::constants::{SCRUB_TIME_CONSTANTS, SETTLE_EPSILON};
use crate::easing::Easing;
use crate::error::{ConfigurationError, Result};
use crate::orchestrator::SnapPlan;
use crate::tracker::{sanitize_unit, ProgressSample};

#[derive(Clone, Copy, Debug)]
struct SnapTween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    ease: Easing,
}

impl SnapTween {
    fn advance(&mut self, dt: f32) -> (f32, bool) {
        self.elapsed += dt;
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return (self.to, true);
        }
        let f = self.ease.apply(self.elapsed / self.duration);
        (self.from + (self.to - self.from) * f, false)
    }
}

#[derive(Clone, Debug)]
pub struct ScrollDriver {
    lag: f32,
    target: f32,
    displayed: f32,
    idle: f32,
    snap: Option<SnapTween>,
    settled_stop: Option<f32>,
}

impl ScrollDriver {
    /// `lag` is the scrub time in seconds; zero follows the target exactly.
    pub fn new(lag: f32) -> Result<Self> {
        if !lag.is_finite() || lag < 0.0 {
            return Err(ConfigurationError::InvalidScrub(lag));
        }
        Ok(Self {
            lag,
            target: 0.0,
            displayed: 0.0,
            idle: 0.0,
            snap: None,
            settled_stop: None,
        })
    }

    #[inline]
    pub fn lag(&self) -> f32 {
        self.lag
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn displayed(&self) -> ProgressSample {
        ProgressSample::new(self.displayed)
    }

    #[inline]
    pub fn is_snapping(&self) -> bool {
        self.snap.is_some()
    }

    /// Snap stop reached since the last call. The page should be scrolled to
    /// it; until then raw progress still sits where the user left it.
    pub fn take_settled_stop(&mut self) -> Option<f32> {
        self.settled_stop.take()
    }

    /// New raw progress from the scroll tracker. Any change cancels a
    /// running snap; the displayed value continues from where it is.
    pub fn set_target(&mut self, progress: ProgressSample) {
        let p = progress.value();
        if (p - self.target).abs() <= f32::EPSILON {
            return;
        }
        self.target = p;
        self.idle = 0.0;
        self.snap = None;
        self.settled_stop = None;
    }

    /// Place both target and displayed progress at `progress` without
    /// smoothing (initial mount, breakpoint switches).
    pub fn jump_to(&mut self, progress: ProgressSample) {
        self.target = progress.value();
        self.displayed = self.target;
        self.idle = 0.0;
        self.snap = None;
        self.settled_stop = None;
    }

    /// Advance by `dt` seconds and return the displayed progress.
    pub fn tick(&mut self, dt: f32, plan: Option<&SnapPlan>) -> ProgressSample {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(tween) = self.snap.as_mut() {
            let (value, done) = tween.advance(dt);
            self.displayed = sanitize_unit(value);
            if done {
                self.target = self.displayed;
                self.snap = None;
                self.idle = 0.0;
                self.settled_stop = Some(self.displayed);
            }
            return self.displayed();
        }

        if self.lag <= 0.0 {
            self.displayed = self.target;
        } else {
            let alpha = 1.0 - (-dt * SCRUB_TIME_CONSTANTS / self.lag).exp();
            self.displayed += (self.target - self.displayed) * alpha;
        }
        if (self.target - self.displayed).abs() < SETTLE_EPSILON {
            self.displayed = self.target;
            self.idle += dt;
            if let Some(plan) = plan {
                self.maybe_snap(plan);
            }
        } else {
            self.idle = 0.0;
        }
        self.displayed()
    }

    fn maybe_snap(&mut self, plan: &SnapPlan) {
        if self.idle < plan.config().delay() {
            return;
        }
        let stop = plan.nearest(self.displayed);
        if (stop - self.displayed).abs() < SETTLE_EPSILON {
            return;
        }
        let duration = plan.config().duration_for(plan.stop_fraction(self.displayed));
        log::debug!(
            "[section] snap {:.3} -> {:.3} over {:.2}s",
            self.displayed,
            stop,
            duration
        );
        self.snap = Some(SnapTween {
            from: self.displayed,
            to: stop,
            elapsed: 0.0,
            duration,
            ease: plan.config().ease(),
        });
    }
}
