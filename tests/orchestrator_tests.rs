// Host-side tests for panel orchestration, snapping and the scrub driver.

use folio_core::presets::{PanelKind, PanelShape};
use folio_core::{
    ConfigurationError, Easing, PanelOrchestrator, ProgressSample, ScrollDriver, SnapConfig,
    SnapPlan, TrackLayout, TriggerWindow, Viewport,
};

const DESKTOP: Viewport = Viewport::new(1440.0, 900.0);
const PHONE: Viewport = Viewport::new(800.0, 900.0);

fn scroll_panels(n: usize, viewport: Viewport) -> PanelOrchestrator {
    scrubbed_panels(n, viewport, 0.0)
}

fn scrubbed_panels(n: usize, viewport: Viewport, panel_scrub: f32) -> PanelOrchestrator {
    let shape = PanelShape {
        title_words: 3,
        has_email: false,
        has_image: true,
    };
    (0..n)
        .fold(
            PanelOrchestrator::builder()
                .snap(SnapConfig::default())
                .panel_scrub(panel_scrub),
            |b, i| {
                b.panel(
                    PanelKind::Scroll(shape)
                        .config(format!("panel-{i}"))
                        .unwrap(),
                )
            },
        )
        .build(viewport)
        .unwrap()
}

#[test]
fn single_panel_disables_snapping_without_error() {
    let orchestrator = scroll_panels(1, DESKTOP);
    assert!(orchestrator.snap_plan().is_none());
    assert_eq!(orchestrator.snap_target(0.7), None);
    assert!(SnapPlan::for_panels(0, SnapConfig::default()).is_none());
    assert!(SnapPlan::for_panels(1, SnapConfig::default()).is_none());
    // one 90vw panel fits the viewport: nothing to travel
    assert_eq!(orchestrator.scroll_distance(), 0.0);
}

#[test]
fn snap_stops_are_evenly_spaced() {
    let orchestrator = scroll_panels(5, DESKTOP);
    let plan = orchestrator.snap_plan().unwrap();
    assert_eq!(plan.intervals(), 4);
    assert_eq!(plan.nearest(0.0), 0.0);
    assert_eq!(plan.nearest(0.3), 0.25);
    assert_eq!(plan.nearest(0.4), 0.5);
    assert_eq!(plan.nearest(0.9), 1.0);
    assert_eq!(plan.nearest(f32::NAN), 0.0);
    assert_eq!(orchestrator.snap_target(0.62), Some(0.5));
}

#[test]
fn container_offset_is_linear_in_progress() {
    let orchestrator = scroll_panels(6, DESKTOP);
    // 6 * 90vw + 5 * 4vw = 560vw, minus one viewport
    let distance = 460.0 * 14.4;
    assert!((orchestrator.scroll_distance() - distance).abs() < 1e-2);
    assert_eq!(orchestrator.container_offset(0.0), 0.0);
    assert!((orchestrator.container_offset(0.5) + distance * 0.5).abs() < 1e-2);
    assert!((orchestrator.container_offset(1.0) + distance).abs() < 1e-2);
    assert!((orchestrator.container_offset(4.0) + distance).abs() < 1e-2);
}

#[test]
fn panels_reveal_from_their_own_trigger_window() {
    let mut orchestrator = scroll_panels(6, DESKTOP);
    let distance = orchestrator.scroll_distance();

    orchestrator.frame(ProgressSample::START);
    let locals: Vec<f32> = orchestrator.panels().map(|p| p.local.value()).collect();
    assert_eq!(locals[0], 1.0);
    assert!(locals[1..].iter().all(|&l| l == 0.0));

    // panel 1 starts at 98vw; "left 70%" → "left 30%" is centered on 48vw of travel
    let travelled = 48.0 * 14.4;
    orchestrator.frame(ProgressSample::new(travelled / distance));
    let panel = orchestrator.panel("panel-1").unwrap();
    assert!((panel.local.value() - 0.5).abs() < 1e-3);
    let x = panel.state.value("content.x").unwrap();
    assert!((x + 40.0).abs() < 0.1, "{x}");
}

#[test]
fn section_frame_exposes_css_values() {
    let mut orchestrator = scroll_panels(4, DESKTOP);
    let frame = orchestrator.frame(ProgressSample::new(0.2));
    assert!(!frame.inverted);
    assert!((frame.progress_inv - 0.4).abs() < 1e-6);
    assert!(frame.horizontal);

    assert!(!orchestrator.frame(ProgressSample::new(0.25)).inverted);
    let frame = orchestrator.frame(ProgressSample::new(0.3));
    assert!(frame.inverted);
    assert!((frame.progress_inv - 0.6).abs() < 1e-6);
    assert_eq!(orchestrator.frame(ProgressSample::new(0.8)).progress_inv, 1.0);
}

#[test]
fn narrow_viewports_stack_panels_fully_revealed() {
    let mut orchestrator = scroll_panels(4, PHONE);
    assert!(!orchestrator.is_horizontal());
    assert!(orchestrator.snap_plan().is_none());
    let frame = orchestrator.frame(ProgressSample::new(0.6));
    assert_eq!(frame.container_offset_px, 0.0);
    assert!(!frame.horizontal);
    assert!(orchestrator.panels().all(|p| p.local == ProgressSample::END));

    orchestrator.relayout(DESKTOP).unwrap();
    assert!(orchestrator.is_horizontal());
    assert!(orchestrator.snap_plan().is_some());
    assert!(orchestrator.frame(ProgressSample::new(0.6)).container_offset_px < 0.0);
}

#[test]
fn relayout_is_idempotent() {
    let mut orchestrator = scroll_panels(3, DESKTOP);
    let before: Vec<f32> = {
        orchestrator.frame(ProgressSample::new(0.4));
        orchestrator.panels().map(|p| p.local.value()).collect()
    };
    orchestrator.relayout(DESKTOP).unwrap();
    orchestrator.relayout(DESKTOP).unwrap();
    orchestrator.frame(ProgressSample::new(0.4));
    let after: Vec<f32> = orchestrator.panels().map(|p| p.local.value()).collect();
    assert_eq!(before, after);
}

#[test]
fn duplicate_panels_and_bad_geometry_are_rejected() {
    let config = PanelKind::Footer.config("footer").unwrap();
    let err = PanelOrchestrator::builder()
        .panel(config.clone())
        .panel(config)
        .build(DESKTOP)
        .unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicatePanel("footer".to_string()));

    assert!(TrackLayout::new(0.0, 4.0, 4.0).is_err());
    assert!(TrackLayout::new(90.0, -1.0, 4.0).is_err());
    assert!(SnapConfig::new(0.8, 0.3, Easing::POWER2_IN_OUT).is_err());
}

#[test]
fn track_layout_geometry() {
    let track = TrackLayout::default();
    assert_eq!(track.total_extent_vw(0), 0.0);
    assert_eq!(track.total_extent_vw(1), 90.0);
    assert_eq!(track.total_extent_vw(8), 8.0 * 90.0 + 7.0 * 4.0);
    assert_eq!(track.panel_start_vw(0), 4.0);
    assert_eq!(track.panel_start_vw(2), 4.0 + 2.0 * 94.0);
}

#[test]
fn snap_duration_scales_with_distance() {
    let snap = SnapConfig::default();
    assert_eq!(snap.duration_for(0.0), 0.3);
    assert!((snap.duration_for(0.5) - 0.8).abs() < 1e-6);
    assert!((snap.duration_for(3.0) - 0.8).abs() < 1e-6);
    assert!(snap.duration_for(0.25) > 0.3 && snap.duration_for(0.25) < 0.8);
    assert_eq!(snap.delay(), 0.02);
    assert_eq!(snap.with_delay(-1.0).delay(), 0.0);
}

// ---------------- Driver ----------------

#[test]
fn driver_rejects_invalid_lag() {
    assert_eq!(
        ScrollDriver::new(-1.0).unwrap_err(),
        ConfigurationError::InvalidScrub(-1.0)
    );
    assert!(ScrollDriver::new(f32::NAN).is_err());
}

#[test]
fn scrub_lag_covers_most_of_the_gap_in_one_lag() {
    let mut driver = ScrollDriver::new(2.2).unwrap();
    driver.set_target(ProgressSample::new(1.0));
    let mut displayed = 0.0;
    for _ in 0..220 {
        displayed = driver.tick(0.01, None).value();
    }
    assert!((displayed - (1.0 - (-3.0_f32).exp())).abs() < 1e-3, "{displayed}");

    let mut instant = ScrollDriver::new(0.0).unwrap();
    instant.set_target(ProgressSample::new(0.6));
    assert_eq!(instant.tick(0.016, None).value(), 0.6);
}

#[test]
fn settled_driver_snaps_to_nearest_stop() {
    let orchestrator = scroll_panels(5, DESKTOP);
    let plan = orchestrator.snap_plan().copied();
    let mut driver = ScrollDriver::new(0.0).unwrap();
    driver.set_target(ProgressSample::new(0.4));

    let dt = 1.0 / 60.0;
    let mut prev = driver.tick(dt, plan.as_ref()).value();
    assert_eq!(prev, 0.4);
    let mut snapped = false;
    for _ in 0..120 {
        let p = driver.tick(dt, plan.as_ref()).value();
        snapped |= driver.is_snapping();
        assert!(p >= prev - 1e-6, "snap moved backwards: {prev} -> {p}");
        assert!(p - prev < 0.02, "snap jumped: {prev} -> {p}");
        prev = p;
    }
    assert!(snapped);
    assert!(!driver.is_snapping());
    assert_eq!(prev, 0.5);
    assert_eq!(driver.target(), 0.5);
}

#[test]
fn scroll_input_cancels_a_running_snap() {
    let plan = SnapPlan::for_panels(5, SnapConfig::default());
    let mut driver = ScrollDriver::new(0.0).unwrap();
    driver.jump_to(ProgressSample::new(0.4));
    let dt = 1.0 / 60.0;
    for _ in 0..6 {
        driver.tick(dt, plan.as_ref());
    }
    assert!(driver.is_snapping());
    let mid = driver.displayed().value();
    assert!(mid > 0.4 && mid < 0.5);

    driver.set_target(ProgressSample::new(0.1));
    assert!(!driver.is_snapping());
    assert_eq!(driver.displayed().value(), mid);
}

#[test]
fn landed_snap_hands_out_its_stop_once() {
    let plan = SnapPlan::for_panels(3, SnapConfig::default());
    let mut driver = ScrollDriver::new(0.0).unwrap();
    driver.set_target(ProgressSample::new(0.45));

    let dt = 1.0 / 60.0;
    let mut stops = Vec::new();
    for _ in 0..120 {
        driver.tick(dt, plan.as_ref());
        stops.extend(driver.take_settled_stop());
    }
    assert_eq!(stops, vec![0.5]);
    assert_eq!(driver.take_settled_stop(), None);
}

#[test]
fn forward_scroll_after_a_snap_never_lowers_progress() {
    let plan = SnapPlan::for_panels(3, SnapConfig::default());
    let window = TriggerWindow::new(1000.0, 3790.0).unwrap();
    let mut driver = ScrollDriver::new(0.0).unwrap();
    driver.set_target(ProgressSample::new(0.45));

    let dt = 1.0 / 60.0;
    let mut stop = None;
    for _ in 0..120 {
        driver.tick(dt, plan.as_ref());
        stop = stop.or(driver.take_settled_stop());
    }
    let stop = stop.unwrap();
    assert_eq!(stop, 0.5);

    // host scrolls the page onto the stop, then the user scrolls on
    let page = window.start() + window.length() * stop;
    driver.set_target(window.progress_at(page));
    assert!(!driver.is_snapping());
    driver.set_target(window.progress_at(page + 0.01 * window.length()));
    for _ in 0..120 {
        let p = driver.tick(dt, plan.as_ref()).value();
        assert!(p >= 0.5 - 1e-6, "forward scroll dropped progress to {p}");
    }
}

#[test]
fn interrupted_snap_reports_no_stop() {
    let plan = SnapPlan::for_panels(5, SnapConfig::default());
    let mut driver = ScrollDriver::new(0.0).unwrap();
    driver.jump_to(ProgressSample::new(0.4));
    let dt = 1.0 / 60.0;
    for _ in 0..6 {
        driver.tick(dt, plan.as_ref());
    }
    assert!(driver.is_snapping());
    driver.set_target(ProgressSample::new(0.1));
    assert_eq!(driver.take_settled_stop(), None);
}

#[test]
fn panel_scrub_eases_local_progress() {
    let mut eased = scrubbed_panels(6, DESKTOP, 1.5);
    let mut direct = scroll_panels(6, DESKTOP);
    let travelled = 48.0 * 14.4;
    let p = ProgressSample::new(travelled / eased.scroll_distance());
    eased.frame(ProgressSample::START);

    let dt = 1.0 / 60.0;
    let first = eased.advance(p, dt);
    direct.frame(p);
    let raw = direct.panel("panel-1").unwrap().local.value();
    let local = eased.panel("panel-1").unwrap().local.value();
    assert!(local > 0.0 && local < raw * 0.1, "{local} vs {raw}");
    // the section itself is not delayed
    assert_eq!(first.progress, p.value());
    assert_eq!(first.container_offset_px, direct.container_offset(p.value()));

    let mut prev = local;
    for _ in 0..600 {
        eased.advance(p, dt);
        let next = eased.panel("panel-1").unwrap().local.value();
        assert!(next >= prev - 1e-6);
        prev = next;
    }
    assert!((prev - raw).abs() < 1e-3, "{prev} vs {raw}");
}

#[test]
fn unscrubbed_advance_matches_frame() {
    let mut advanced = scroll_panels(4, DESKTOP);
    let mut framed = scroll_panels(4, DESKTOP);
    for p in [0.1, 0.35, 0.8] {
        let p = ProgressSample::new(p);
        advanced.advance(p, 1.0 / 60.0);
        framed.frame(p);
        for (a, b) in advanced.panels().zip(framed.panels()) {
            assert_eq!(a.local, b.local);
        }
    }

    let mut stacked = scrubbed_panels(4, PHONE, 1.5);
    stacked.advance(ProgressSample::new(0.4), 1.0 / 60.0);
    assert!(stacked.panels().all(|p| p.local == ProgressSample::END));

    let err = PanelOrchestrator::builder()
        .panel_scrub(-1.0)
        .panel(PanelKind::Work.config("work").unwrap())
        .build(DESKTOP)
        .unwrap_err();
    assert_eq!(err, ConfigurationError::InvalidScrub(-1.0));
}

#[test]
fn snapping_never_resets_panel_reveals() {
    let mut orchestrator = scroll_panels(5, DESKTOP);
    let mut driver = ScrollDriver::new(0.5).unwrap();
    driver.jump_to(ProgressSample::new(0.3));
    driver.set_target(ProgressSample::new(0.37));

    let dt = 1.0 / 60.0;
    let mut prev: Option<Vec<f32>> = None;
    for _ in 0..300 {
        let p = driver.tick(dt, orchestrator.snap_plan());
        orchestrator.frame(p);
        let locals: Vec<f32> = orchestrator.panels().map(|v| v.local.value()).collect();
        if let Some(prev) = &prev {
            for (a, b) in prev.iter().zip(&locals) {
                assert!((a - b).abs() < 0.25, "panel reveal jumped {a} -> {b}");
            }
        }
        prev = Some(locals);
    }
    // 0.37 is closest to the stop at 0.25
    assert_eq!(driver.displayed().value(), 0.25);
}
