use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{
    CursorProximityEngine, CursorVariant, GeometryQuery, PointerCapability, Subscription,
    UiSignalsView,
};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{
    CURSOR_ACTIVE_CLASS, CURSOR_ATTR, CURSOR_DOT_ID, CURSOR_HOVER_CLASS, CURSOR_LABEL_SELECTOR,
    CURSOR_RING_ID, INTERACTIVE_SELECTOR,
};
use crate::dom::{self, DomGeometry, EventListener};
use crate::input;

/// The magnetic cursor mounted on `#cursor-ring` / `#cursor-dot`.
pub struct CursorBinding {
    engine: Rc<RefCell<CursorProximityEngine>>,
    root: web::Element,
    ring: web::Element,
    dot: Option<web::Element>,
    label: Option<web::Element>,
    last_label: Option<&'static str>,
    _listeners: Vec<EventListener>,
    _capability: Subscription,
}

impl CursorBinding {
    pub fn frame(&mut self, dt_sec: f32) {
        let frame = self.engine.borrow_mut().frame(dt_sec);
        let Some(frame) = frame else {
            dom::set_style(&self.ring, "opacity", "0");
            if let Some(dot) = &self.dot {
                dom::set_style(dot, "opacity", "0");
            }
            return;
        };

        let size = format!("{}px", frame.ring_size);
        dom::set_style(&self.ring, "opacity", "1");
        dom::set_style(&self.ring, "width", &size);
        dom::set_style(&self.ring, "height", &size);
        dom::set_style(
            &self.ring,
            "transform",
            &input::centered_transform(frame.ring, frame.ring_size),
        );
        dom::toggle_class(&self.ring, CURSOR_HOVER_CLASS, frame.hovered);

        if let Some(dot) = &self.dot {
            dom::set_style(dot, "opacity", "1");
            dom::set_style(dot, "transform", &input::centered_transform(frame.dot, 0.0));
        }
        if frame.label != self.last_label {
            if let Some(label) = &self.label {
                label.set_text_content(frame.label);
            }
            self.last_label = frame.label;
        }
    }
}

impl Drop for CursorBinding {
    fn drop(&mut self) {
        dom::toggle_class(&self.root, CURSOR_ACTIVE_CLASS, false);
        dom::set_style(&self.ring, "opacity", "0");
        if let Some(dot) = &self.dot {
            dom::set_style(dot, "opacity", "0");
        }
    }
}

fn client_position(ev: &web::Event) -> Option<Vec2> {
    let ev = ev.dyn_ref::<web::MouseEvent>()?;
    Some(Vec2::new(ev.client_x() as f32, ev.client_y() as f32))
}

/// Mount the cursor. `Ok(None)` when the page has no cursor ring.
pub fn wire_cursor(
    document: &web::Document,
    signals: &UiSignalsView,
) -> anyhow::Result<Option<CursorBinding>> {
    let Some(ring) = document.get_element_by_id(CURSOR_RING_ID) else {
        log::warn!("[cursor] #{} not found; cursor disabled", CURSOR_RING_ID);
        return Ok(None);
    };
    let root = document
        .document_element()
        .ok_or_else(|| anyhow::anyhow!("document has no root element"))?;
    let dot = document.get_element_by_id(CURSOR_DOT_ID);
    let label = ring.query_selector(CURSOR_LABEL_SELECTOR).ok().flatten();

    let engine = Rc::new(RefCell::new(CursorProximityEngine::default()));
    let hovered: Rc<RefCell<Option<web::Element>>> = Rc::new(RefCell::new(None));

    let apply_capability = {
        let engine = engine.clone();
        let root = root.clone();
        move |capability: PointerCapability| {
            engine.borrow_mut().set_capability(capability);
            dom::toggle_class(&root, CURSOR_ACTIVE_CLASS, capability == PointerCapability::Fine);
        }
    };
    apply_capability(signals.pointer.get());
    let capability = signals
        .pointer
        .subscribe(move |capability| apply_capability(*capability));

    let doc_target: &web::EventTarget = document.unchecked_ref();
    let mut listeners = Vec::with_capacity(3);

    let pointermove = {
        let engine = engine.clone();
        let hovered = hovered.clone();
        EventListener::new(doc_target, "pointermove", move |ev| {
            let Some(position) = client_position(&ev) else {
                return;
            };
            let mut engine = engine.borrow_mut();
            engine.pointer_moved(position);
            if let Some(el) = hovered.borrow().as_ref() {
                engine.refresh_target(&DomGeometry, el);
            }
        })?
    };
    listeners.push(pointermove);

    let mouseover = {
        let engine = engine.clone();
        let hovered = hovered.clone();
        EventListener::new(doc_target, "mouseover", move |ev| {
            let interactive = ev
                .target()
                .and_then(|t| t.dyn_into::<web::Element>().ok())
                .and_then(|el| el.closest(INTERACTIVE_SELECTOR).ok().flatten());
            let mut engine = engine.borrow_mut();
            match interactive {
                Some(el) => {
                    let variant = CursorVariant::resolve(
                        el.get_attribute(CURSOR_ATTR).as_deref(),
                        &el.tag_name(),
                    );
                    engine.hover(variant, Some(DomGeometry.query_bounding_box(&el)));
                    *hovered.borrow_mut() = variant.is_hovered().then_some(el);
                }
                None => {
                    engine.hover(CursorVariant::Default, None);
                    *hovered.borrow_mut() = None;
                }
            }
        })?
    };
    listeners.push(mouseover);

    let mouseleave = {
        let engine = engine.clone();
        EventListener::new(root.unchecked_ref(), "mouseleave", move |_| {
            engine.borrow_mut().leave_document();
            *hovered.borrow_mut() = None;
        })?
    };
    listeners.push(mouseleave);

    log::info!("[cursor] mounted");
    Ok(Some(CursorBinding {
        engine,
        root,
        ring,
        dot,
        label,
        last_label: None,
        _listeners: listeners,
        _capability: capability,
    }))
}
