use folio_core::{GeometryQuery, Rect, TargetStyle, Viewport};
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

fn js_f32(v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>) -> f32 {
    v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
}

pub fn viewport(window: &web::Window) -> Viewport {
    Viewport::new(js_f32(window.inner_width()), js_f32(window.inner_height()))
}

pub fn scroll_position(window: &web::Window) -> Vec2 {
    Vec2::new(
        window.scroll_x().unwrap_or(0.0) as f32,
        window.scroll_y().unwrap_or(0.0) as f32,
    )
}

/// Elements under `root` matching `selector`, in document order.
pub fn query_all(root: &web::Element, selector: &str) -> Vec<web::Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web::Element>().ok())
        .collect()
}

/// Bounding boxes straight from `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomGeometry;

impl GeometryQuery for DomGeometry {
    type Handle = web::Element;

    fn query_bounding_box(&self, handle: &web::Element) -> Rect {
        let r = handle.get_bounding_client_rect();
        Rect::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        )
    }
}

/// A registered DOM listener; dropping it removes the listener.
pub struct EventListener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", kind, e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

#[inline]
pub fn set_style(el: &web::Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        _ = html.style().set_property(property, value);
    }
}

#[inline]
pub fn toggle_class(el: &web::Element, class: &str, on: bool) {
    _ = el.class_list().toggle_with_force(class, on);
}

pub fn apply_target_style(el: &web::Element, style: &TargetStyle) {
    if let Some(opacity) = style.opacity_css() {
        set_style(el, "opacity", &opacity);
    }
    if let Some(transform) = style.transform_css() {
        set_style(el, "transform", &transform);
    }
    for (name, value) in style.custom_properties() {
        set_style(el, &name, &value);
    }
}
