//! Scroll offset → normalized progress through a trigger window.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use glam::Vec2;

use crate::error::{ConfigurationError, Result};
use crate::geometry::{Axis, GeometryQuery, Rect, Viewport};
use crate::signal::{Subscription, UiSignalsView};

/// Clamp into `[0, 1]`; NaN maps to 0 and infinities to the nearest end.
#[inline]
pub fn sanitize_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// How far a trigger region has scrolled through its window, in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ProgressSample(f32);

impl ProgressSample {
    pub const START: ProgressSample = ProgressSample(0.0);
    pub const END: ProgressSample = ProgressSample(1.0);

    #[inline]
    pub fn new(value: f32) -> Self {
        Self(sanitize_unit(value))
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

/// Scroll thresholds, in scroll-offset units, between which progress runs
/// from 0 to 1. Always non-degenerate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerWindow {
    start: f32,
    end: f32,
}

impl TriggerWindow {
    pub fn new(start: f32, end: f32) -> Result<Self> {
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(ConfigurationError::DegenerateTriggerWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> f32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.end
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    #[inline]
    pub fn progress_at(&self, scroll: f32) -> ProgressSample {
        ProgressSample::new((scroll - self.start) / (self.end - self.start))
    }
}

/// One-shot form of [`TriggerWindow::progress_at`].
pub fn progress(scroll: f32, trigger_start: f32, trigger_end: f32) -> Result<ProgressSample> {
    Ok(TriggerWindow::new(trigger_start, trigger_end)?.progress_at(scroll))
}

// ---------------- Trigger positions ----------------

/// A point along one axis of either the trigger element or the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    Start,
    Center,
    End,
    Percent(f32),
    Px(f32),
}

impl Anchor {
    #[inline]
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Center => extent * 0.5,
            Anchor::End => extent,
            Anchor::Percent(p) => extent * p / 100.0,
            Anchor::Px(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidTriggerPosition(s.to_string());
        let number = |text: &str| {
            text.parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)
        };
        match s {
            "top" | "left" => Ok(Anchor::Start),
            "center" => Ok(Anchor::Center),
            "bottom" | "right" => Ok(Anchor::End),
            _ => {
                if let Some(pct) = s.strip_suffix('%') {
                    Ok(Anchor::Percent(number(pct)?))
                } else if let Some(px) = s.strip_suffix("px") {
                    Ok(Anchor::Px(number(px)?))
                } else {
                    Ok(Anchor::Px(number(s)?))
                }
            }
        }
    }
}

/// `"<element anchor> <viewport anchor>"`: the trigger fires when that point
/// of the element meets that point of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPoint {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl FromStr for TriggerPoint {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(TriggerPoint {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(ConfigurationError::InvalidTriggerPosition(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerEnd {
    Point(TriggerPoint),
    /// `"+=N"`: N pixels of scroll after the start threshold.
    Relative(f32),
    /// `"+=N%"`: N percent of the viewport extent after the start threshold.
    RelativeViewport(f32),
}

impl FromStr for TriggerEnd {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let Some(rest) = s.trim().strip_prefix("+=") else {
            return Ok(TriggerEnd::Point(s.parse()?));
        };
        let (number, make): (&str, fn(f32) -> TriggerEnd) = match rest.strip_suffix('%') {
            Some(pct) => (pct, TriggerEnd::RelativeViewport),
            None => (rest.strip_suffix("px").unwrap_or(rest), TriggerEnd::Relative),
        };
        number
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(make)
            .ok_or_else(|| ConfigurationError::InvalidTriggerPosition(s.to_string()))
    }
}

/// Where a trigger window starts and ends relative to an element, in a form
/// that survives viewport resizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSpec {
    pub axis: Axis,
    pub start: TriggerPoint,
    pub end: TriggerEnd,
}

impl TriggerSpec {
    pub fn parse(axis: Axis, start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            axis,
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// Derive scroll thresholds for an element at `element_start` (document
    /// coordinates, along the axis) spanning `element_extent`.
    pub fn resolve_window(
        &self,
        element_start: f32,
        element_extent: f32,
        viewport_extent: f32,
    ) -> Result<TriggerWindow> {
        let threshold = |point: &TriggerPoint| {
            element_start + point.element.resolve(element_extent)
                - point.viewport.resolve(viewport_extent)
        };
        let start = threshold(&self.start);
        let end = match &self.end {
            TriggerEnd::Point(point) => threshold(point),
            TriggerEnd::Relative(px) => start + px,
            TriggerEnd::RelativeViewport(pct) => start + viewport_extent * pct / 100.0,
        };
        TriggerWindow::new(start, end)
    }

    pub fn resolve_rect(&self, element: Rect, viewport: Viewport) -> Result<TriggerWindow> {
        self.resolve_window(
            element.start(self.axis),
            element.extent(self.axis),
            viewport.extent(self.axis),
        )
    }
}

// ---------------- Tracker ----------------

#[derive(Clone, Debug)]
pub struct ScrollProgressTracker {
    spec: Option<TriggerSpec>,
    window: TriggerWindow,
    last: ProgressSample,
}

impl ScrollProgressTracker {
    /// Tracker over fixed thresholds; resizes do not move them.
    pub fn new(trigger_start: f32, trigger_end: f32) -> Result<Self> {
        Ok(Self {
            spec: None,
            window: TriggerWindow::new(trigger_start, trigger_end)?,
            last: ProgressSample::START,
        })
    }

    /// Tracker whose thresholds follow `element` (document coordinates).
    pub fn with_spec(spec: TriggerSpec, element: Rect, viewport: Viewport) -> Result<Self> {
        Ok(Self {
            spec: Some(spec),
            window: spec.resolve_rect(element, viewport)?,
            last: ProgressSample::START,
        })
    }

    #[inline]
    pub fn window(&self) -> TriggerWindow {
        self.window
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.spec.map(|s| s.axis).unwrap_or_default()
    }

    #[inline]
    pub fn last(&self) -> ProgressSample {
        self.last
    }

    #[inline]
    pub fn progress_at(&self, scroll: f32) -> ProgressSample {
        self.window.progress_at(scroll)
    }

    pub fn update(&mut self, scroll: f32) -> ProgressSample {
        self.last = self.progress_at(scroll);
        self.last
    }

    /// Re-derive thresholds from the trigger spec. Calling it again with the
    /// same layout leaves the tracker unchanged; on error the previous window
    /// is kept.
    pub fn relayout(&mut self, element: Rect, viewport: Viewport) -> Result<()> {
        if let Some(spec) = self.spec {
            self.window = spec.resolve_rect(element, viewport)?;
        }
        Ok(())
    }

    /// Query the element's current box, convert it to document coordinates
    /// and re-derive thresholds.
    pub fn refresh<G: GeometryQuery>(
        &mut self,
        geometry: &G,
        handle: &G::Handle,
        scroll: Vec2,
        viewport: Viewport,
    ) -> Result<()> {
        let rect = geometry.query_bounding_box(handle);
        let document_rect = Rect::new(
            rect.x + scroll.x,
            rect.y + scroll.y,
            rect.width,
            rect.height,
        );
        self.relayout(document_rect, viewport)
    }

    /// Start an observation session: the tracker follows the scroll signal,
    /// re-derives its thresholds on every viewport change and reports each
    /// new sample. Dropping the session detaches both listeners.
    pub fn observe<G>(
        self,
        signals: &UiSignalsView,
        geometry: Rc<G>,
        handle: G::Handle,
        on_sample: impl Fn(ProgressSample) + 'static,
    ) -> ProgressSession
    where
        G: GeometryQuery + 'static,
        G::Handle: 'static,
    {
        let axis = self.axis();
        let tracker = Rc::new(RefCell::new(self));
        let on_sample: Rc<dyn Fn(ProgressSample)> = Rc::new(on_sample);
        let handle = Rc::new(handle);

        let along = move |scroll: Vec2| match axis {
            Axis::Vertical => scroll.y,
            Axis::Horizontal => scroll.x,
        };

        let refresh = {
            let tracker = tracker.clone();
            let geometry = geometry.clone();
            let handle = handle.clone();
            move |scroll: Vec2, viewport: Viewport| {
                let mut t = tracker.borrow_mut();
                if let Err(e) = t.refresh(geometry.as_ref(), handle.as_ref(), scroll, viewport) {
                    log::warn!("[scroll] keeping previous trigger window: {}", e);
                }
                t.update(along(scroll))
            }
        };

        let initial = refresh(signals.scroll.get(), signals.viewport.get());
        on_sample(initial);

        let scroll_sub = {
            let tracker = tracker.clone();
            let on_sample = on_sample.clone();
            signals.scroll.subscribe(move |scroll| {
                let sample = tracker.borrow_mut().update(along(*scroll));
                on_sample(sample);
            })
        };

        let viewport_sub = {
            let scroll = signals.scroll.clone();
            signals.viewport.subscribe(move |viewport| {
                let sample = refresh(scroll.get(), *viewport);
                on_sample(sample);
            })
        };

        log::debug!("[scroll] tracker attached ({:?})", axis);
        ProgressSession {
            tracker,
            _scroll: scroll_sub,
            _viewport: viewport_sub,
        }
    }
}

/// Live tracker attached to the observed scroll and viewport signals.
pub struct ProgressSession {
    tracker: Rc<RefCell<ScrollProgressTracker>>,
    _scroll: Subscription,
    _viewport: Subscription,
}

impl ProgressSession {
    pub fn sample(&self) -> ProgressSample {
        self.tracker.borrow().last()
    }

    pub fn window(&self) -> TriggerWindow {
        self.tracker.borrow().window()
    }

    /// Detach now instead of at end of scope.
    pub fn detach(self) {
        log::debug!("[scroll] tracker detached");
    }
}
