// Host-side tests for scroll progress tracking and trigger parsing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_core::{
    progress, Anchor, Axis, ConfigurationError, GeometryQuery, PointerCapability,
    ProgressSample, Rect, ScrollProgressTracker, TriggerEnd, TriggerPoint, TriggerSpec,
    TriggerWindow, UiSignals, Viewport,
};
use glam::Vec2;

/// One element whose viewport-relative box the test moves by hand.
struct FakeGeometry {
    rect: Cell<Rect>,
    queries: Cell<usize>,
}

impl FakeGeometry {
    fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(rect),
            queries: Cell::new(0),
        }
    }
}

impl GeometryQuery for FakeGeometry {
    type Handle = ();

    fn query_bounding_box(&self, _: &()) -> Rect {
        self.queries.set(self.queries.get() + 1);
        self.rect.get()
    }
}

#[test]
fn midpoint_scroll_is_exactly_half() {
    let mut tracker = ScrollProgressTracker::new(0.0, 1000.0).unwrap();
    assert_eq!(tracker.update(500.0), ProgressSample::new(0.5));
    assert_eq!(tracker.update(500.0).value(), 0.5);
}

#[test]
fn scroll_past_end_clamps_to_one() {
    let mut tracker = ScrollProgressTracker::new(0.0, 1000.0).unwrap();
    assert_eq!(tracker.update(1500.0).value(), 1.0);
    assert_eq!(tracker.update(-20.0).value(), 0.0);
    assert_eq!(tracker.last().value(), 0.0);
}

#[test]
fn one_shot_progress_matches_tracker() {
    assert_eq!(progress(250.0, 0.0, 1000.0).unwrap().value(), 0.25);
    assert_eq!(progress(f32::NAN, 0.0, 1000.0).unwrap().value(), 0.0);
    assert_eq!(progress(f32::INFINITY, 0.0, 1000.0).unwrap().value(), 1.0);
}

#[test]
fn non_finite_inputs_land_inside_the_unit_range() {
    assert_eq!(ProgressSample::new(f32::NAN).value(), 0.0);
    assert_eq!(ProgressSample::new(f32::INFINITY).value(), 1.0);
    assert_eq!(ProgressSample::new(f32::NEG_INFINITY).value(), 0.0);
    assert_eq!(progress(f32::NEG_INFINITY, 0.0, 1000.0).unwrap().value(), 0.0);

    let mut tracker = ScrollProgressTracker::new(0.0, 1000.0).unwrap();
    assert_eq!(tracker.update(f32::NAN).value(), 0.0);
    assert_eq!(tracker.update(f32::INFINITY).value(), 1.0);
}

#[test]
fn degenerate_windows_are_rejected() {
    assert_eq!(
        TriggerWindow::new(500.0, 500.0).unwrap_err(),
        ConfigurationError::DegenerateTriggerWindow {
            start: 500.0,
            end: 500.0
        }
    );
    assert!(TriggerWindow::new(800.0, 100.0).is_err());
    assert!(TriggerWindow::new(0.0, f32::INFINITY).is_err());
    assert!(ScrollProgressTracker::new(10.0, 10.0).is_err());
}

#[test]
fn trigger_positions_parse() {
    let point: TriggerPoint = "left 70%".parse().unwrap();
    assert_eq!(point.element, Anchor::Start);
    assert_eq!(point.viewport, Anchor::Percent(70.0));

    let point: TriggerPoint = "center 120px".parse().unwrap();
    assert_eq!(point.element, Anchor::Center);
    assert_eq!(point.viewport, Anchor::Px(120.0));

    assert_eq!(
        "bottom top".parse::<TriggerPoint>().unwrap().element,
        Anchor::End
    );
    assert!("top".parse::<TriggerPoint>().is_err());
    assert!("top top top".parse::<TriggerPoint>().is_err());
    assert!("top middle".parse::<TriggerPoint>().is_err());

    assert_eq!(
        "+=500".parse::<TriggerEnd>().unwrap(),
        TriggerEnd::Relative(500.0)
    );
    assert_eq!(
        "+=64px".parse::<TriggerEnd>().unwrap(),
        TriggerEnd::Relative(64.0)
    );
    assert_eq!(
        "+=310%".parse::<TriggerEnd>().unwrap(),
        TriggerEnd::RelativeViewport(310.0)
    );
    assert!("+=lots".parse::<TriggerEnd>().is_err());
    assert!(matches!(
        "left 20%".parse::<TriggerEnd>().unwrap(),
        TriggerEnd::Point(_)
    ));
}

#[test]
fn panel_trigger_resolves_against_viewport_width() {
    let spec = TriggerSpec::parse(Axis::Horizontal, "left 70%", "left 30%").unwrap();
    let window = spec.resolve_window(3600.0, 1296.0, 1440.0).unwrap();
    assert!((window.start() - 2592.0).abs() < 1e-3);
    assert!((window.end() - 3168.0).abs() < 1e-3);
}

#[test]
fn relayout_is_idempotent_and_keeps_window_on_error() {
    let spec = TriggerSpec::parse(Axis::Vertical, "top top", "+=100%").unwrap();
    let element = Rect::new(0.0, 1200.0, 1440.0, 900.0);
    let viewport = Viewport::new(1440.0, 900.0);
    let mut tracker = ScrollProgressTracker::with_spec(spec, element, viewport).unwrap();
    let before = tracker.window();

    tracker.relayout(element, viewport).unwrap();
    tracker.relayout(element, viewport).unwrap();
    assert_eq!(tracker.window(), before);

    // a zero-height viewport makes "+=100%" degenerate
    assert!(tracker.relayout(element, Viewport::new(1440.0, 0.0)).is_err());
    assert_eq!(tracker.window(), before);

    tracker.relayout(element, Viewport::new(1440.0, 600.0)).unwrap();
    assert_eq!(tracker.window().start(), 1200.0);
    assert_eq!(tracker.window().end(), 1800.0);
}

#[test]
fn refresh_converts_to_document_coordinates() {
    let spec = TriggerSpec::parse(Axis::Vertical, "top top", "+=500").unwrap();
    let viewport = Viewport::new(1000.0, 800.0);
    let mut tracker =
        ScrollProgressTracker::with_spec(spec, Rect::new(0.0, 0.0, 10.0, 10.0), viewport)
            .unwrap();
    // element scrolled 300px up, page scrolled 700px: document top is 1000
    let geometry = FakeGeometry::new(Rect::new(0.0, -300.0, 1000.0, 400.0));
    tracker
        .refresh(&geometry, &(), Vec2::new(0.0, 700.0), viewport)
        .unwrap();
    assert_eq!(tracker.window().start(), 1000.0);
    assert_eq!(tracker.window().end(), 1500.0);
}

#[test]
fn observed_session_follows_scroll_and_viewport() {
    let signals = UiSignals::new(
        Vec2::ZERO,
        Viewport::new(1000.0, 800.0),
        PointerCapability::Fine,
    );
    let view = signals.view();
    let geometry = Rc::new(FakeGeometry::new(Rect::new(0.0, 1000.0, 1000.0, 800.0)));
    let spec = TriggerSpec::parse(Axis::Vertical, "top top", "+=100%").unwrap();
    let tracker = ScrollProgressTracker::with_spec(
        spec,
        Rect::new(0.0, 1000.0, 1000.0, 800.0),
        signals.viewport.get(),
    )
    .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let session = {
        let seen = seen.clone();
        tracker.observe(&view, geometry.clone(), (), move |s| {
            seen.borrow_mut().push(s.value())
        })
    };
    assert_eq!(*seen.borrow(), vec![0.0]);
    assert_eq!(geometry.queries.get(), 1);

    signals.scroll.set(Vec2::new(0.0, 1400.0));
    assert_eq!(session.sample().value(), 0.5);

    // the page moved; the element box is now 400px above the viewport top
    geometry.rect.set(Rect::new(0.0, -400.0, 1000.0, 800.0));
    signals.viewport.set(Viewport::new(1000.0, 400.0));
    assert_eq!(session.window().end(), 1400.0);
    assert_eq!(session.sample().value(), 1.0);
    assert_eq!(*seen.borrow(), vec![0.0, 0.5, 1.0]);

    // unchanged values do not notify
    signals.scroll.set(Vec2::new(0.0, 1400.0));
    assert_eq!(seen.borrow().len(), 3);

    assert_eq!(view.scroll.subscriber_count(), 1);
    assert_eq!(view.viewport.subscriber_count(), 1);
    session.detach();
    assert_eq!(view.scroll.subscriber_count(), 0);
    assert_eq!(view.viewport.subscriber_count(), 0);

    signals.scroll.set(Vec2::new(0.0, 0.0));
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn horizontal_trackers_read_the_horizontal_scroll() {
    let signals = UiSignals::new(
        Vec2::ZERO,
        Viewport::new(1000.0, 800.0),
        PointerCapability::Coarse,
    );
    let geometry = Rc::new(FakeGeometry::new(Rect::new(0.0, 0.0, 1000.0, 800.0)));
    let spec = TriggerSpec::parse(Axis::Horizontal, "left left", "+=1000").unwrap();
    let tracker = ScrollProgressTracker::with_spec(
        spec,
        Rect::new(0.0, 0.0, 1000.0, 800.0),
        Viewport::new(1000.0, 800.0),
    )
    .unwrap();
    let session = tracker.observe(&signals.view(), geometry, (), |_| {});
    signals.scroll.set(Vec2::new(250.0, 9000.0));
    assert_eq!(session.sample().value(), 0.25);
}
