#![forbid(unsafe_code)]

//! Declarative auto-initialization.
//!
//! Host pages can mark `<script>` elements with `data-impulse-*` attributes
//! instead of calling the API. Every marker becomes one embed instance at
//! document-ready; per-marker failures are reported on the console and do
//! not block the remaining markers.

use std::cell::RefCell;

use gloo::events::EventListener;
use impulse_embed_core::{EmbedConfig, EmbedError};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DocumentReadyState, Element};

use crate::dom::{self, ElementRef};
use crate::embed::{EmbedCallbacks, EmbedInstance};

/// Selector matching declarative embed markers.
pub const MARKER_SELECTOR: &str = "script[data-impulse-url]";

thread_local! {
    // declaratively created instances are retained for the page lifetime so
    // their listeners stay registered
    static AUTO_EMBEDS: RefCell<Vec<EmbedInstance>> = const { RefCell::new(Vec::new()) };
    static READY_LISTENER: RefCell<Option<EventListener>> = const { RefCell::new(None) };
}

/// Run auto-init now, or defer until `DOMContentLoaded` while the document
/// is still loading.
pub fn schedule() {
    let Ok(document) = dom::document() else { return };
    if document.ready_state() == DocumentReadyState::Loading {
        let listener = EventListener::once(&document, "DOMContentLoaded", move |_event| {
            run();
        });
        READY_LISTENER.with(|slot| *slot.borrow_mut() = Some(listener));
    } else {
        run();
    }
}

/// Scan the document and instantiate every marked embed.
pub fn run() {
    let Ok(document) = dom::document() else { return };
    let Ok(markers) = document.query_selector_all(MARKER_SELECTOR) else {
        return;
    };

    let mut created = 0usize;
    for index in 0..markers.length() {
        let Some(node) = markers.item(index) else {
            continue;
        };
        let Some(element) = node.dyn_ref::<Element>() else {
            continue;
        };
        if let Some(instance) = init_marker(element) {
            AUTO_EMBEDS.with(|embeds| embeds.borrow_mut().push(instance));
            created += 1;
        }
    }
    debug!(created, "auto-init complete");
}

fn init_marker(element: &Element) -> Option<EmbedInstance> {
    let (config, warnings) =
        EmbedConfig::from_data_attributes(|name| element.get_attribute(name));
    for warning in &warnings {
        web_sys::console::warn_1(&JsValue::from_str(&format!("ImpulseEmbed: {warning}")));
    }

    match create_from_config(config) {
        Ok(instance) => Some(instance),
        Err(err) => {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "ImpulseEmbed auto-init failed: {err}"
            )));
            None
        }
    }
}

fn create_from_config(config: EmbedConfig) -> Result<EmbedInstance, EmbedError> {
    config.validate_url()?;
    let anchor = config.anchor()?.map(ElementRef::Selector);
    EmbedInstance::create(config, anchor, EmbedCallbacks::default())
}
