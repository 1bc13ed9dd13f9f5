use std::rc::Rc;

use folio_core::UiSignals;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::FINE_POINTER_QUERY;
use crate::dom::{self, EventListener};
use crate::input;

/// Keep the observed scroll, viewport and pointer-capability signals in step
/// with the window. These listeners are the only writers of `signals`.
pub fn wire_ui_signals(
    window: &web::Window,
    signals: Rc<UiSignals>,
) -> anyhow::Result<Vec<EventListener>> {
    let target: &web::EventTarget = window.unchecked_ref();
    let mut listeners = Vec::with_capacity(3);

    let scroll = {
        let window = window.clone();
        let signals = signals.clone();
        EventListener::new(target, "scroll", move |_| {
            signals.scroll.set(dom::scroll_position(&window));
        })?
    };
    listeners.push(scroll);

    let resize = {
        let window = window.clone();
        let signals = signals.clone();
        EventListener::new(target, "resize", move |_| {
            signals.viewport.set(dom::viewport(&window));
            signals.scroll.set(dom::scroll_position(&window));
        })?
    };
    listeners.push(resize);

    match window.match_media(FINE_POINTER_QUERY) {
        Ok(Some(query)) => {
            signals
                .pointer
                .set(input::pointer_capability(query.matches()));
            let change = {
                let current = query.clone();
                EventListener::new(query.unchecked_ref(), "change", move |_| {
                    signals
                        .pointer
                        .set(input::pointer_capability(current.matches()));
                })?
            };
            listeners.push(change);
        }
        _ => log::warn!("[cursor] matchMedia unavailable; assuming coarse pointer"),
    }

    Ok(listeners)
}
