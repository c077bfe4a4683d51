#![forbid(unsafe_code)]

//! Element resolution and small DOM helpers.

use impulse_embed_core::EmbedError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Window};

/// A host element given either as a CSS selector or as a live handle.
#[derive(Debug, Clone)]
pub enum ElementRef {
    Selector(String),
    Element(HtmlElement),
}

impl ElementRef {
    /// Human-readable form for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Selector(selector) => selector.clone(),
            Self::Element(element) => format!("<{}>", element.tag_name().to_ascii_lowercase()),
        }
    }

    /// Resolve to a live element: handles pass through, selectors look up
    /// the document's first match. Returns `None` on a miss (including an
    /// invalid selector) — the caller decides whether that is fatal.
    #[must_use]
    pub fn resolve(&self, document: &Document) -> Option<HtmlElement> {
        match self {
            Self::Element(element) => Some(element.clone()),
            Self::Selector(selector) => document
                .query_selector(selector)
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlElement>().ok()),
        }
    }
}

pub fn window() -> Result<Window, EmbedError> {
    web_sys::window().ok_or_else(|| EmbedError::Dom("no window".to_string()))
}

pub fn document() -> Result<Document, EmbedError> {
    window()?
        .document()
        .ok_or_else(|| EmbedError::Dom("no document".to_string()))
}

pub fn body(document: &Document) -> Result<HtmlElement, EmbedError> {
    document
        .body()
        .ok_or_else(|| EmbedError::Dom("document has no body".to_string()))
}

/// Create a `div` carrying `class`, typed for inline style access.
pub fn create_div(document: &Document, class: &str) -> Result<HtmlElement, EmbedError> {
    let element = document
        .create_element("div")
        .map_err(js_error("create div"))?;
    element.set_class_name(class);
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| EmbedError::Dom("div is not an html element".to_string()))
}

/// Append raw style text to an element's inline style (`cssText +=`).
pub fn append_inline_css(element: &HtmlElement, css: &str) {
    let style = element.style();
    let mut text = style.css_text();
    text.push_str(css);
    style.set_css_text(&text);
}

pub(crate) fn js_error(context: &'static str) -> impl FnOnce(JsValue) -> EmbedError {
    move |err| EmbedError::Dom(format!("{context}: {err:?}"))
}
