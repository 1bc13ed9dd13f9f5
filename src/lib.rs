#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use folio_core::{PointerCapability, UiSignals};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod section;

use constants::{HERO_SELECTOR, HORIZONTAL_SELECTOR, PORTFOLIO_SELECTOR};
use section::{HeroBinding, HorizontalBinding, SectionKind};

#[derive(Default)]
struct Bindings {
    hero: Option<HeroBinding>,
    sections: Vec<HorizontalBinding>,
    cursor: Option<events::CursorBinding>,
}

impl Bindings {
    fn frame(&mut self, dt_sec: f32) {
        if let Some(hero) = self.hero.as_mut() {
            hero.frame(dt_sec);
        }
        for section in &mut self.sections {
            section.frame(dt_sec);
        }
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.frame(dt_sec);
        }
    }
}

/// Everything mounted on the page. Fields drop in order: the frame loop
/// stops first, then window listeners, then bindings and their sessions.
struct App {
    _frame: frame::FrameLoop,
    _listeners: Vec<dom::EventListener>,
    _bindings: Rc<RefCell<Bindings>>,
    _signals: Rc<UiSignals>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn mount_sections(document: &web::Document, signals: &folio_core::UiSignalsView) -> Bindings {
    let mut bindings = Bindings::default();

    match document.query_selector(HERO_SELECTOR).ok().flatten() {
        Some(root) => match HeroBinding::mount(root, signals) {
            Ok(hero) => bindings.hero = Some(hero),
            Err(e) => log::warn!("[section] hero skipped: {:#}", e),
        },
        None => log::warn!("[section] {} not found", HERO_SELECTOR),
    }

    let Some(root) = document.document_element() else {
        return bindings;
    };
    for (selector, kind) in [
        (HORIZONTAL_SELECTOR, SectionKind::Horizontal),
        (PORTFOLIO_SELECTOR, SectionKind::Portfolio),
    ] {
        let found = dom::query_all(&root, selector);
        if found.is_empty() && kind == SectionKind::Horizontal {
            log::warn!("[section] {} not found", selector);
        }
        for el in found {
            match HorizontalBinding::mount(el, kind, signals) {
                Ok(section) => bindings.sections.push(section),
                Err(e) => log::warn!("[section] {:?} skipped: {:#}", kind, e),
            }
        }
    }
    bindings
}

fn mount() -> anyhow::Result<App> {
    let window = web::window().context("no window")?;
    let document = dom::window_document().context("no document")?;

    let signals = Rc::new(UiSignals::new(
        dom::scroll_position(&window),
        dom::viewport(&window),
        PointerCapability::Coarse,
    ));
    let listeners = events::wire_ui_signals(&window, signals.clone())?;
    let view = signals.view();

    let mut bindings = mount_sections(&document, &view);
    bindings.cursor = match events::wire_cursor(&document, &view) {
        Ok(cursor) => cursor,
        Err(e) => {
            log::warn!("[cursor] skipped: {:#}", e);
            None
        }
    };

    let bindings = Rc::new(RefCell::new(bindings));
    let frame = {
        let bindings = bindings.clone();
        frame::FrameLoop::start(move |dt| bindings.borrow_mut().frame(dt))
    };

    Ok(App {
        _frame: frame,
        _listeners: listeners,
        _bindings: bindings,
        _signals: signals,
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    match mount() {
        Ok(app) => APP.with(|slot| *slot.borrow_mut() = Some(app)),
        Err(e) => log::error!("mount failed: {:#}", e),
    }
    Ok(())
}

/// Drop every binding and listener (client-side navigation away from the
/// page). Safe to call more than once.
#[wasm_bindgen]
pub fn unmount() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if app.is_some() {
        drop(app);
        log::info!("folio-web unmounted");
    }
}
