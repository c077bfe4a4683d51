#![forbid(unsafe_code)]

//! Iframe construction.

use impulse_embed_core::{EmbedError, FrameOptions};
use js_sys::Function;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlIFrameElement};

use crate::dom::{append_inline_css, js_error};

/// Permissions delegated to the embedded document.
pub const FRAME_ALLOW: &str = "camera; microphone; geolocation";

/// Build a configured embed iframe: no border, `100%`/`600px` size
/// defaults, the fixed permission allow-list, lazy loading, and any
/// `customCSS` appended verbatim to the inline style.
///
/// `on_load` is attached as the frame's load handler and fires exactly
/// once when the frame's document completes loading — no retry, no
/// timeout; a frame that never loads never fires it.
pub fn build_iframe(
    document: &Document,
    src: &str,
    frame: &FrameOptions,
    on_load: Option<&Function>,
) -> Result<HtmlIFrameElement, EmbedError> {
    let iframe: HtmlIFrameElement = document
        .create_element("iframe")
        .map_err(js_error("create iframe"))?
        .dyn_into()
        .map_err(|_| EmbedError::Dom("iframe is not an iframe element".to_string()))?;

    iframe.set_src(src);
    let style = iframe.style();
    let _ = style.set_property("border", "none");
    let _ = style.set_property("width", frame.width_or_default());
    let _ = style.set_property("height", frame.height_or_default());
    iframe
        .set_attribute("allow", FRAME_ALLOW)
        .map_err(js_error("set iframe allow"))?;
    iframe
        .set_attribute("loading", "lazy")
        .map_err(js_error("set iframe loading"))?;

    if let Some(css) = frame.custom_css.as_deref() {
        append_inline_css(&iframe, css);
    }
    if let Some(on_load) = on_load {
        iframe.set_onload(Some(on_load));
    }

    Ok(iframe)
}
