#![forbid(unsafe_code)]

//! JS-facing API surface.
//!
//! Mirrors the loader's package entry points: the `ImpulseEmbed` class, the
//! `createEmbed` convenience factory, `version`, and the auto-init side
//! effect at module start. Element-or-selector fields and callback
//! functions are pulled off the configuration object via reflection; the
//! structural remainder is deserialized with `serde-wasm-bindgen`.

use impulse_embed_core::{EmbedAnchor, EmbedConfig, EmbedError};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlIFrameElement};

use crate::auto_init;
use crate::dom::ElementRef;
use crate::embed::{EmbedCallbacks, EmbedInstance};

/// An embed handle.
///
/// Construction validates synchronously and performs mode-specific
/// initialization; the instance methods are defensive no-ops once the
/// embed is destroyed.
#[wasm_bindgen]
pub struct ImpulseEmbed {
    instance: EmbedInstance,
}

#[wasm_bindgen]
impl ImpulseEmbed {
    /// Create and initialize an embed from a configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ImpulseEmbed, JsError> {
        let parts = ConfigParts::from_js(&config)?;
        let instance = EmbedInstance::create(parts.config, parts.anchor, parts.callbacks)
            .map_err(embed_js_error)?;
        Ok(Self { instance })
    }

    /// Present the popup (popup mode only).
    pub fn open(&self) {
        self.instance.open();
    }

    /// Dismiss the popup (popup mode only).
    pub fn close(&self) {
        self.instance.close();
    }

    /// Reload the embedded page, e.g. to reset form state.
    pub fn reload(&self) -> Result<(), JsError> {
        self.instance.reload().map_err(embed_js_error)
    }

    /// Tear the embed down. Safe to call more than once.
    pub fn destroy(&self) {
        self.instance.destroy();
    }

    /// The live iframe element, or `null`.
    #[wasm_bindgen(js_name = getIframe)]
    pub fn get_iframe(&self) -> Option<HtmlIFrameElement> {
        self.instance.iframe()
    }
}

/// Convenience factory mirroring the class constructor.
#[wasm_bindgen(js_name = createEmbed)]
pub fn create_embed(config: JsValue) -> Result<ImpulseEmbed, JsError> {
    ImpulseEmbed::new(config)
}

/// Loader version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Module start: panic diagnostics plus declarative auto-init.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    auto_init::schedule();
}

fn embed_js_error(err: EmbedError) -> JsError {
    JsError::new(&format!("ImpulseEmbed: {err}"))
}

struct ConfigParts {
    config: EmbedConfig,
    anchor: EmbedAnchor<ElementRef>,
    callbacks: EmbedCallbacks,
}

impl ConfigParts {
    fn from_js(config: &JsValue) -> Result<Self, JsError> {
        let object: &Object = config
            .dyn_ref()
            .ok_or_else(|| JsError::new("ImpulseEmbed: configuration must be an object"))?;

        let container = element_ref(get(object, "container"));
        let trigger = element_ref(get(object, "trigger"));
        let callbacks = EmbedCallbacks {
            on_load: function_field(object, "onLoad"),
            on_close: function_field(object, "onClose"),
            on_submit: function_field(object, "onSubmit"),
        };

        // strip element handles and functions before structural
        // deserialization; selector strings for container/trigger were
        // already captured above
        let plain = Object::assign(&Object::new(), object);
        for key in ["container", "trigger", "onLoad", "onClose", "onSubmit"] {
            let _ = Reflect::delete_property(&plain, &JsValue::from_str(key));
        }
        let config: EmbedConfig = serde_wasm_bindgen::from_value(plain.into())
            .map_err(|err| JsError::new(&format!("ImpulseEmbed: invalid configuration: {err}")))?;

        config
            .validate_url()
            .map_err(|err| embed_js_error(err.into()))?;
        let anchor = EmbedAnchor::new(config.mode, container, trigger)
            .map_err(|err| embed_js_error(err.into()))?;

        Ok(Self {
            config,
            anchor,
            callbacks,
        })
    }
}

fn get(object: &Object, key: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn element_ref(value: JsValue) -> Option<ElementRef> {
    if let Some(selector) = value.as_string() {
        return Some(ElementRef::Selector(selector));
    }
    value
        .dyn_into::<HtmlElement>()
        .ok()
        .map(ElementRef::Element)
}

fn function_field(object: &Object, key: &str) -> Option<Function> {
    get(object, key).dyn_into::<Function>().ok()
}
