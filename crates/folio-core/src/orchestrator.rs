//! One scroll progress driving a horizontal track of panels.
//!
//! The section's progress moves the whole track; each panel additionally
//! gets its own local progress from where it currently sits in the viewport
//! and resolves its channel set from that. Local progress can lag behind
//! through a per-panel scrub (see [`PanelOrchestratorBuilder::panel_scrub`]).

use fnv::FnvHashSet;

use crate::constants::{
    INVERT_THRESHOLD, MOBILE_BREAKPOINT_PX, PANEL_GAP_VW, PANEL_WIDTH_VW, PROGRESS_INV_GAIN,
    SNAP_DURATION_MAX_SEC, SNAP_DURATION_MIN_SEC, SNAP_SETTLE_DELAY_SEC, TRACK_PADDING_VW,
};
use crate::driver::ScrollDriver;
use crate::easing::Easing;
use crate::error::{ConfigurationError, Result};
use crate::geometry::{Axis, Rect, Viewport};
use crate::reveal::{ChannelSet, ResolvedVisualState};
use crate::tracker::{ProgressSample, ScrollProgressTracker, TriggerSpec};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackLayout {
    panel_width_vw: f32,
    gap_vw: f32,
    padding_vw: f32,
}

impl TrackLayout {
    pub fn new(panel_width_vw: f32, gap_vw: f32, padding_vw: f32) -> Result<Self> {
        if !panel_width_vw.is_finite() || panel_width_vw <= 0.0 {
            return Err(ConfigurationError::InvalidTrack("panel width must be positive"));
        }
        if !gap_vw.is_finite() || gap_vw < 0.0 || !padding_vw.is_finite() || padding_vw < 0.0 {
            return Err(ConfigurationError::InvalidTrack(
                "gap and padding must be non-negative",
            ));
        }
        Ok(Self {
            panel_width_vw,
            gap_vw,
            padding_vw,
        })
    }

    #[inline]
    pub fn panel_width_vw(&self) -> f32 {
        self.panel_width_vw
    }

    #[inline]
    pub fn gap_vw(&self) -> f32 {
        self.gap_vw
    }

    #[inline]
    pub fn padding_vw(&self) -> f32 {
        self.padding_vw
    }

    /// Width of `count` panels and the gaps between them.
    pub fn total_extent_vw(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.panel_width_vw + (count - 1) as f32 * self.gap_vw
    }

    /// Left edge of panel `index` inside the track.
    pub fn panel_start_vw(&self, index: usize) -> f32 {
        self.padding_vw + index as f32 * (self.panel_width_vw + self.gap_vw)
    }
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            panel_width_vw: PANEL_WIDTH_VW,
            gap_vw: PANEL_GAP_VW,
            padding_vw: TRACK_PADDING_VW,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SnapConfig {
    duration_min: f32,
    duration_max: f32,
    ease: Easing,
    delay: f32,
}

impl SnapConfig {
    pub fn new(duration_min: f32, duration_max: f32, ease: Easing) -> Result<Self> {
        let valid = duration_min.is_finite()
            && duration_max.is_finite()
            && duration_min >= 0.0
            && duration_max >= duration_min;
        if !valid {
            return Err(ConfigurationError::InvalidSnapDuration {
                min: duration_min,
                max: duration_max,
            });
        }
        Ok(Self {
            duration_min,
            duration_max,
            ease,
            delay: SNAP_SETTLE_DELAY_SEC,
        })
    }

    /// How long scroll input must stay settled before a snap starts.
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self
    }

    #[inline]
    pub fn ease(&self) -> Easing {
        self.ease
    }

    #[inline]
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Tween length for a move covering `stop_fraction` of the distance
    /// between two adjacent stops (at most one half when snapping to the
    /// nearest stop).
    pub fn duration_for(&self, stop_fraction: f32) -> f32 {
        let t = (stop_fraction * 2.0).clamp(0.0, 1.0);
        self.duration_min + (self.duration_max - self.duration_min) * t
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            duration_min: SNAP_DURATION_MIN_SEC,
            duration_max: SNAP_DURATION_MAX_SEC,
            ease: Easing::POWER2_IN_OUT,
            delay: SNAP_SETTLE_DELAY_SEC,
        }
    }
}

/// Evenly spaced snap stops `k / intervals` for `k in 0..=intervals`.
#[derive(Clone, Copy, Debug)]
pub struct SnapPlan {
    intervals: usize,
    config: SnapConfig,
}

impl SnapPlan {
    /// `None` for fewer than two panels: there is nothing to snap between.
    pub fn for_panels(panel_count: usize, config: SnapConfig) -> Option<Self> {
        (panel_count >= 2).then_some(Self {
            intervals: panel_count - 1,
            config,
        })
    }

    #[inline]
    pub fn intervals(&self) -> usize {
        self.intervals
    }

    #[inline]
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn nearest(&self, progress: f32) -> f32 {
        let n = self.intervals as f32;
        ((ProgressSample::new(progress).value() * n).round() / n).clamp(0.0, 1.0)
    }

    /// Distance to the nearest stop in units of stop spacing.
    pub fn stop_fraction(&self, progress: f32) -> f32 {
        (self.nearest(progress) - progress).abs() * self.intervals as f32
    }
}

#[derive(Clone, Debug)]
pub struct PanelConfig {
    id: String,
    trigger: TriggerSpec,
    channels: ChannelSet,
}

impl PanelConfig {
    /// The trigger is evaluated along the horizontal axis of the track.
    pub fn new(id: impl Into<String>, trigger: TriggerSpec, channels: ChannelSet) -> Self {
        Self {
            id: id.into(),
            trigger: TriggerSpec {
                axis: Axis::Horizontal,
                ..trigger
            },
            channels,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }
}

#[derive(Clone, Debug)]
struct PanelSlot {
    config: PanelConfig,
    tracker: ScrollProgressTracker,
    driver: ScrollDriver,
    local: ProgressSample,
    state: ResolvedVisualState,
}

/// Borrowed view of one panel after [`PanelOrchestrator::frame`].
#[derive(Clone, Copy, Debug)]
pub struct PanelView<'a> {
    pub index: usize,
    pub id: &'a str,
    pub local: ProgressSample,
    pub state: &'a ResolvedVisualState,
}

/// Section-wide values for one frame; every panel saw the same `progress`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionFrame {
    pub progress: f32,
    /// `min(1, 2p)`, exposed to CSS as `--scroll-p-inv`.
    pub progress_inv: f32,
    pub inverted: bool,
    pub container_offset_px: f32,
    pub horizontal: bool,
}

pub struct PanelOrchestratorBuilder {
    track: TrackLayout,
    panels: Vec<PanelConfig>,
    snap: Option<SnapConfig>,
    breakpoint_px: f32,
    panel_scrub: f32,
}

impl PanelOrchestratorBuilder {
    pub fn track(mut self, track: TrackLayout) -> Self {
        self.track = track;
        self
    }

    pub fn panel(mut self, panel: PanelConfig) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn snap(mut self, snap: SnapConfig) -> Self {
        self.snap = Some(snap);
        self
    }

    /// Seconds each panel's local progress lags behind its raw value when
    /// driven through [`PanelOrchestrator::advance`]. Zero by default.
    pub fn panel_scrub(mut self, lag: f32) -> Self {
        self.panel_scrub = lag;
        self
    }

    /// Viewports narrower than this get the stacked (non-horizontal) layout.
    pub fn breakpoint(mut self, px: f32) -> Self {
        self.breakpoint_px = px;
        self
    }

    pub fn build(self, viewport: Viewport) -> Result<PanelOrchestrator> {
        let mut ids = FnvHashSet::default();
        let mut slots = Vec::with_capacity(self.panels.len());
        for (index, config) in self.panels.into_iter().enumerate() {
            if !ids.insert(config.id.clone()) {
                return Err(ConfigurationError::DuplicatePanel(config.id));
            }
            let tracker = panel_tracker(&self.track, index, &config.trigger, viewport)?;
            let state = ResolvedVisualState::with_capacity(config.channels.len());
            slots.push(PanelSlot {
                config,
                tracker,
                driver: ScrollDriver::new(self.panel_scrub)?,
                local: ProgressSample::START,
                state,
            });
        }
        let snap = self
            .snap
            .and_then(|cfg| SnapPlan::for_panels(slots.len(), cfg));
        if self.snap.is_some() && snap.is_none() {
            log::debug!("[section] snapping disabled for {} panel(s)", slots.len());
        }
        log::debug!(
            "[section] orchestrating {} panel(s), viewport {}x{}",
            slots.len(),
            viewport.width,
            viewport.height
        );
        Ok(PanelOrchestrator {
            track: self.track,
            slots,
            snap,
            viewport,
            breakpoint_px: self.breakpoint_px,
        })
    }
}

fn panel_tracker(
    track: &TrackLayout,
    index: usize,
    trigger: &TriggerSpec,
    viewport: Viewport,
) -> Result<ScrollProgressTracker> {
    let rect = Rect::new(
        viewport.vw(track.panel_start_vw(index)),
        0.0,
        viewport.vw(track.panel_width_vw()),
        viewport.height,
    );
    ScrollProgressTracker::with_spec(*trigger, rect, viewport)
}

#[derive(Clone, Debug)]
pub struct PanelOrchestrator {
    track: TrackLayout,
    slots: Vec<PanelSlot>,
    snap: Option<SnapPlan>,
    viewport: Viewport,
    breakpoint_px: f32,
}

impl PanelOrchestrator {
    pub fn builder() -> PanelOrchestratorBuilder {
        PanelOrchestratorBuilder {
            track: TrackLayout::default(),
            panels: Vec::new(),
            snap: None,
            breakpoint_px: MOBILE_BREAKPOINT_PX,
            panel_scrub: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn track(&self) -> &TrackLayout {
        &self.track
    }

    /// Whether the track runs horizontally at the current viewport width.
    pub fn is_horizontal(&self) -> bool {
        self.viewport.width >= self.breakpoint_px
    }

    pub fn snap_plan(&self) -> Option<&SnapPlan> {
        self.snap.as_ref().filter(|_| self.is_horizontal())
    }

    /// Nearest snap stop, or `None` when snapping does not apply.
    pub fn snap_target(&self, progress: f32) -> Option<f32> {
        self.snap_plan().map(|plan| plan.nearest(progress))
    }

    /// How far (px) the track travels over the whole section.
    pub fn scroll_distance(&self) -> f32 {
        let total = self.viewport.vw(self.track.total_extent_vw(self.slots.len()));
        (total - self.viewport.width).max(0.0)
    }

    pub fn container_offset(&self, progress: f32) -> f32 {
        if !self.is_horizontal() {
            return 0.0;
        }
        -self.scroll_distance() * ProgressSample::new(progress).value()
    }

    /// Re-derive every panel's trigger window for a new viewport. Idempotent;
    /// on error the previous layout is kept.
    pub fn relayout(&mut self, viewport: Viewport) -> Result<()> {
        let trackers = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| panel_tracker(&self.track, i, &slot.config.trigger, viewport))
            .collect::<Result<Vec<_>>>()?;
        for (slot, tracker) in self.slots.iter_mut().zip(trackers) {
            slot.tracker = tracker;
        }
        self.viewport = viewport;
        log::debug!(
            "[section] relayout {}x{} (horizontal: {})",
            viewport.width,
            viewport.height,
            self.is_horizontal()
        );
        Ok(())
    }

    /// Resolve every panel for one section progress value, with panels
    /// jumping straight to their local progress.
    pub fn frame(&mut self, progress: ProgressSample) -> SectionFrame {
        self.step(progress, None)
    }

    /// Like [`frame`](Self::frame), but each panel's local progress eases
    /// toward its raw value over the panel scrub.
    pub fn advance(&mut self, progress: ProgressSample, dt: f32) -> SectionFrame {
        self.step(progress, Some(dt))
    }

    fn step(&mut self, progress: ProgressSample, dt: Option<f32>) -> SectionFrame {
        let p = progress.value();
        let horizontal = self.is_horizontal();
        let offset = self.container_offset(p);
        let travelled = -offset;
        for slot in &mut self.slots {
            let raw = if horizontal {
                slot.tracker.update(travelled)
            } else {
                // stacked layout shows every panel fully revealed
                ProgressSample::END
            };
            slot.local = match dt {
                Some(dt) if horizontal => {
                    slot.driver.set_target(raw);
                    slot.driver.tick(dt, None)
                }
                _ => {
                    slot.driver.jump_to(raw);
                    raw
                }
            };
            slot.config
                .channels
                .resolve_into(slot.local.value(), &mut slot.state);
        }
        SectionFrame {
            progress: p,
            progress_inv: (p * PROGRESS_INV_GAIN).min(1.0),
            inverted: p > INVERT_THRESHOLD,
            container_offset_px: offset,
            horizontal,
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = PanelView<'_>> {
        self.slots.iter().enumerate().map(|(index, slot)| PanelView {
            index,
            id: &slot.config.id,
            local: slot.local,
            state: &slot.state,
        })
    }

    pub fn panel(&self, id: &str) -> Option<PanelView<'_>> {
        self.panels().find(|p| p.id == id)
    }
}
