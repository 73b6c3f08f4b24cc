use anyhow::anyhow;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn create_div(document: &web::Document, class: &str) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("div")
        .map_err(|e| anyhow!("create div: {:?}", e))?;
    el.set_class_name(class);
    el.dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow!("div is not an HtmlElement: {:?}", e))
}

pub fn element_by_id(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

#[inline]
pub fn set_style(el: &web::HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::warn!("style {}={} failed: {:?}", property, value, e);
    }
}

#[inline]
pub fn set_text(el: &web::HtmlElement, text: &str) {
    el.set_text_content(Some(text));
}

/// ISO-8601 wall-clock timestamp from the JS clock.
pub fn iso_timestamp() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Arm a one-shot browser timeout. The callback is freed by JS after it runs.
pub fn set_timeout_once(delay_ms: i32, callback: impl FnOnce() + 'static) -> Option<i32> {
    let window = web::window()?;
    let closure = wasm_bindgen::closure::Closure::once_into_js(callback);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), delay_ms)
        .map_err(|e| log::error!("setTimeout failed: {:?}", e))
        .ok()
}
