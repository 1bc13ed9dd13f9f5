use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use folio_core::constants::HERO_SCRUB_SEC;
use folio_core::presets::{self, parts, PanelShape, SectionPreset};
use folio_core::{
    group_by_target, ChannelSet, GeometryQuery, PanelOrchestrator, ProgressSession, Rect,
    ResolvedVisualState, ScrollDriver, ScrollProgressTracker, Subscription, Target, UiSignalsView,
    Viewport,
};
use glam::Vec2;
use web_sys as web;

use crate::constants::{
    INVERTED_CLASS, PANEL_ATTR, PANEL_SELECTOR, PART_ATTR, PART_ITEM_SEPARATOR, PART_SELECTOR,
    SCROLL_P_INV_VAR, SCROLL_P_VAR, TRACK_SELECTOR,
};
use crate::dom::{self, DomGeometry};
use crate::input;

/// `[data-part]` elements under one root, keyed by the target they render.
struct PartIndex {
    entries: Vec<(Target, web::Element)>,
}

impl PartIndex {
    fn scan(root: &web::Element) -> Self {
        let entries = dom::query_all(root, PART_SELECTOR)
            .into_iter()
            .filter_map(|el| {
                let value = el.get_attribute(PART_ATTR)?;
                let target = input::parse_part(&value, PART_ITEM_SEPARATOR)?;
                Some((target, el))
            })
            .collect();
        Self { entries }
    }

    fn has(&self, part: &str) -> bool {
        self.entries.iter().any(|(t, _)| &*t.part == part)
    }

    /// Number of items of a repeated part (highest index + 1).
    fn item_count(&self, part: &str) -> usize {
        self.entries
            .iter()
            .filter(|(t, _)| &*t.part == part)
            .filter_map(|(t, _)| t.item)
            .map(|i| i + 1)
            .max()
            .unwrap_or(0)
    }

    fn apply(&self, state: &ResolvedVisualState) {
        for (target, style) in group_by_target(state) {
            for (_, el) in self.entries.iter().filter(|(t, _)| *t == target) {
                dom::apply_target_style(el, &style);
            }
        }
    }
}

fn document_rect(el: &web::Element, scroll: Vec2) -> Rect {
    let r = DomGeometry.query_bounding_box(el);
    Rect::new(r.x + scroll.x, r.y + scroll.y, r.width, r.height)
}

fn attach_driver(
    tracker: ScrollProgressTracker,
    root: &web::Element,
    signals: &UiSignalsView,
    scrub: f32,
) -> anyhow::Result<(Rc<RefCell<ScrollDriver>>, ProgressSession)> {
    let driver = Rc::new(RefCell::new(ScrollDriver::new(scrub)?));
    let session = {
        let driver = driver.clone();
        tracker.observe(signals, Rc::new(DomGeometry), root.clone(), move |sample| {
            driver.borrow_mut().set_target(sample)
        })
    };
    driver.borrow_mut().jump_to(session.sample());
    Ok((driver, session))
}

// ---------------- Hero ----------------

/// Pinned hero: slides one viewport to the left while the backdrop darkens.
pub struct HeroBinding {
    channels: ChannelSet,
    state: ResolvedVisualState,
    parts: PartIndex,
    driver: Rc<RefCell<ScrollDriver>>,
    _session: ProgressSession,
}

impl HeroBinding {
    pub fn mount(root: web::Element, signals: &UiSignalsView) -> anyhow::Result<Self> {
        let channels = presets::hero_section().context("hero channels")?;
        let trigger = presets::hero_trigger()?;
        let rect = document_rect(&root, signals.scroll.get());
        let tracker = ScrollProgressTracker::with_spec(trigger, rect, signals.viewport.get())
            .context("hero trigger")?;
        let (driver, session) = attach_driver(tracker, &root, signals, HERO_SCRUB_SEC)?;
        let parts = PartIndex::scan(&root);
        log::info!("[section] hero mounted ({} parts)", parts.entries.len());
        Ok(Self {
            state: ResolvedVisualState::with_capacity(channels.len()),
            channels,
            parts,
            driver,
            _session: session,
        })
    }

    pub fn frame(&mut self, dt_sec: f32) {
        let p = self.driver.borrow_mut().tick(dt_sec, None);
        self.channels.resolve_into(p.value(), &mut self.state);
        self.parts.apply(&self.state);
    }
}

// ---------------- Horizontal sections ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Horizontal,
    Portfolio,
}

fn section_height(orchestrator: &PanelOrchestrator, pin_vh: f32, viewport: Viewport) -> String {
    if orchestrator.is_horizontal() {
        format!("{}px", presets::pinned_section_height(pin_vh, viewport))
    } else {
        "auto".to_string()
    }
}

/// A pinned section whose panels travel horizontally as the page scrolls.
pub struct HorizontalBinding {
    section: web::Element,
    track: web::Element,
    panels: Vec<PartIndex>,
    orchestrator: Rc<RefCell<PanelOrchestrator>>,
    driver: Rc<RefCell<ScrollDriver>>,
    inverted: Option<bool>,
    session: ProgressSession,
    _viewport: Subscription,
}

impl HorizontalBinding {
    pub fn mount(
        section: web::Element,
        kind: SectionKind,
        signals: &UiSignalsView,
    ) -> anyhow::Result<Self> {
        let track = section
            .query_selector(TRACK_SELECTOR)
            .ok()
            .flatten()
            .with_context(|| format!("{} missing", TRACK_SELECTOR))?;
        let panel_elements = dom::query_all(&section, PANEL_SELECTOR);
        let panels: Vec<PartIndex> = panel_elements.iter().map(PartIndex::scan).collect();

        let layout = panel_elements
            .iter()
            .zip(&panels)
            .enumerate()
            .map(|(i, (el, index))| {
                let shape = PanelShape {
                    title_words: index.item_count(parts::WORD),
                    has_email: index.has(parts::EMAIL),
                    has_image: index.has(parts::IMAGE),
                };
                let id = match el.id() {
                    id if id.is_empty() => format!("panel-{i}"),
                    id => id,
                };
                let annotation = el.get_attribute(PANEL_ATTR);
                (id, input::panel_kind(annotation.as_deref(), shape))
            })
            .collect::<Vec<_>>();

        let viewport = signals.viewport.get();
        let SectionPreset {
            trigger,
            scrub,
            pin_vh,
            orchestrator,
        } = match kind {
            SectionKind::Horizontal => presets::horizontal_section(layout, viewport),
            SectionKind::Portfolio => presets::portfolio_section(layout, viewport),
        }
        .with_context(|| format!("{:?} section", kind))?;

        dom::set_style(
            &section,
            "height",
            &section_height(&orchestrator, pin_vh, viewport),
        );
        let orchestrator = Rc::new(RefCell::new(orchestrator));

        // Registered before the tracker so the height is current when the
        // trigger window is re-derived.
        let viewport_sub = {
            let orchestrator = orchestrator.clone();
            let section = section.clone();
            signals.viewport.subscribe(move |viewport| {
                let mut orchestrator = orchestrator.borrow_mut();
                if let Err(e) = orchestrator.relayout(*viewport) {
                    log::warn!("[section] keeping previous layout: {}", e);
                }
                dom::set_style(
                    &section,
                    "height",
                    &section_height(&orchestrator, pin_vh, *viewport),
                );
            })
        };

        let rect = document_rect(&section, signals.scroll.get());
        let tracker =
            ScrollProgressTracker::with_spec(trigger, rect, viewport).context("section trigger")?;
        let (driver, session) = attach_driver(tracker, &section, signals, scrub)?;
        // panels start settled at the mount position
        orchestrator.borrow_mut().frame(session.sample());

        log::info!(
            "[section] {:?} mounted with {} panel(s)",
            kind,
            orchestrator.borrow().len()
        );
        Ok(Self {
            section,
            track,
            panels,
            orchestrator,
            driver,
            inverted: None,
            session,
            _viewport: viewport_sub,
        })
    }

    pub fn frame(&mut self, dt_sec: f32) {
        let mut orchestrator = self.orchestrator.borrow_mut();
        let (p, settled) = {
            let mut driver = self.driver.borrow_mut();
            let p = driver.tick(dt_sec, orchestrator.snap_plan());
            (p, driver.take_settled_stop())
        };
        if let Some(stop) = settled {
            self.scroll_to_stop(stop);
        }
        let frame = orchestrator.advance(p, dt_sec);

        let (p_css, inv_css) = input::section_vars(&frame);
        dom::set_style(&self.section, SCROLL_P_VAR, &p_css);
        dom::set_style(&self.section, SCROLL_P_INV_VAR, &inv_css);
        if self.inverted != Some(frame.inverted) {
            dom::toggle_class(&self.section, INVERTED_CLASS, frame.inverted);
            self.inverted = Some(frame.inverted);
        }

        let transform = if frame.horizontal {
            input::track_transform(frame.container_offset_px)
        } else {
            "none".to_string()
        };
        dom::set_style(&self.track, "transform", &transform);

        for view in orchestrator.panels() {
            if let Some(parts) = self.panels.get(view.index) {
                parts.apply(view.state);
            }
        }
    }

    /// Move the page under a finished snap so raw progress matches it.
    fn scroll_to_stop(&self, stop: f32) {
        let Some(window) = web::window() else {
            return;
        };
        let y = input::snap_scroll_offset(self.session.window(), stop);
        let x = dom::scroll_position(&window).x;
        window.scroll_to_with_x_and_y(f64::from(x), f64::from(y));
    }
}
