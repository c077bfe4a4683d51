#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use gloo_timers::future::TimeoutFuture;
use impulse_embed_core::{EmbedAnchor, EmbedConfig, EmbedMode, PopupOptions};
use impulse_embed_web::dom::ElementRef;
use impulse_embed_web::embed::{EmbedCallbacks, EmbedInstance};
use impulse_embed_web::styles;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement, MessageEvent, MessageEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn host_element(tag: &str) -> HtmlElement {
    let doc = document();
    let element = doc.create_element(tag).unwrap();
    doc.body().unwrap().append_child(&element).unwrap();
    element.dyn_into().unwrap()
}

fn inline_config(url: &str) -> EmbedConfig {
    EmbedConfig {
        url: url.to_string(),
        mode: EmbedMode::Inline,
        ..EmbedConfig::default()
    }
}

fn popup_config(url: &str) -> EmbedConfig {
    EmbedConfig {
        url: url.to_string(),
        mode: EmbedMode::Popup,
        ..EmbedConfig::default()
    }
}

fn inline_instance(container: &HtmlElement, config: EmbedConfig) -> EmbedInstance {
    let anchor = EmbedAnchor::new(
        EmbedMode::Inline,
        Some(ElementRef::Element(container.clone())),
        None,
    )
    .unwrap();
    EmbedInstance::create(config, anchor, EmbedCallbacks::default()).unwrap()
}

fn popup_instance(trigger: &HtmlElement, config: EmbedConfig) -> EmbedInstance {
    let anchor = EmbedAnchor::new(
        EmbedMode::Popup,
        None,
        Some(ElementRef::Element(trigger.clone())),
    )
    .unwrap();
    EmbedInstance::create(config, anchor, EmbedCallbacks::default()).unwrap()
}

fn overlay_count() -> u32 {
    document()
        .query_selector_all(&format!(".{}", styles::OVERLAY_CLASS))
        .unwrap()
        .length()
}

fn body_overflow() -> String {
    document().body().unwrap().style().css_text()
}

// -- construction --

#[wasm_bindgen_test]
fn unresolvable_selector_fails_without_dom_residue() {
    let before = overlay_count();
    let anchor = EmbedAnchor::new(
        EmbedMode::Inline,
        Some(ElementRef::Selector("#does-not-exist-anywhere".to_string())),
        None,
    )
    .unwrap();
    let result = EmbedInstance::create(
        inline_config("https://example.com/book"),
        anchor,
        EmbedCallbacks::default(),
    );
    assert!(result.is_err());
    assert_eq!(overlay_count(), before);
}

#[wasm_bindgen_test]
fn inline_embed_appends_iframe_with_embed_url() {
    let container = host_element("div");
    let mut config = inline_config("https://example.com/book?q=1");
    config.params.insert("a".to_string(), "1".to_string());

    let instance = inline_instance(&container, config);

    assert!(
        container
            .class_list()
            .contains(styles::INLINE_CONTAINER_CLASS)
    );
    let iframe = instance.iframe().expect("inline embed owns an iframe");
    assert_eq!(iframe.src(), "https://example.com/book?q=1&embed=true&a=1");
    assert_eq!(iframe.get_attribute("loading").as_deref(), Some("lazy"));
    assert!(container.query_selector("iframe").unwrap().is_some());

    instance.destroy();
}

// -- popup presentation --

#[wasm_bindgen_test]
fn open_twice_mounts_a_single_overlay() {
    let trigger = host_element("button");
    let instance = popup_instance(&trigger, popup_config("https://example.com/book"));

    assert_eq!(overlay_count(), 0);
    assert!(instance.iframe().is_none(), "no iframe before first open");

    instance.open();
    instance.open();
    assert_eq!(overlay_count(), 1);
    assert!(instance.iframe().is_some());
    assert!(body_overflow().contains("hidden"));

    instance.destroy();
    assert_eq!(overlay_count(), 0);
}

#[wasm_bindgen_test]
async fn close_tears_down_after_the_animation_and_restores_scroll() {
    let trigger = host_element("button");
    let instance = popup_instance(&trigger, popup_config("https://example.com/book"));

    instance.open();
    assert_eq!(overlay_count(), 1);

    instance.close();
    // the iframe reference is dropped immediately, the subtree later
    assert!(instance.iframe().is_none());
    assert_eq!(overlay_count(), 1);

    TimeoutFuture::new(styles::CLOSE_ANIMATION_MS + 50).await;
    assert_eq!(overlay_count(), 0);
    assert!(!body_overflow().contains("hidden"));

    // a reopen after a completed close rebuilds from scratch
    instance.open();
    assert_eq!(overlay_count(), 1);
    instance.destroy();
}

#[wasm_bindgen_test]
fn popup_honors_disabled_close_button() {
    let trigger = host_element("button");
    let mut config = popup_config("https://example.com/book");
    config.popup = PopupOptions {
        show_close_button: false,
        ..PopupOptions::default()
    };
    let instance = popup_instance(&trigger, config);

    instance.open();
    let close_buttons = document()
        .query_selector_all(&format!(".{}", styles::CLOSE_BUTTON_CLASS))
        .unwrap();
    assert_eq!(close_buttons.length(), 0);
    instance.destroy();
}

// -- messages --

#[wasm_bindgen_test]
fn resize_from_a_foreign_source_is_ignored() {
    let container = host_element("div");
    let instance = inline_instance(&container, inline_config("https://example.com/book"));
    let iframe = instance.iframe().unwrap();
    let height_before = iframe.style().get_property_value("height").unwrap();

    let data = Object::new();
    Reflect::set(
        &data,
        &JsValue::from_str("type"),
        &JsValue::from_str("impulse:form:resize"),
    )
    .unwrap();
    let payload = Object::new();
    Reflect::set(&payload, &JsValue::from_str("height"), &JsValue::from_f64(450.0)).unwrap();
    Reflect::set(&data, &JsValue::from_str("data"), &payload).unwrap();

    // no `source` set: the event does not originate from our iframe
    let init = MessageEventInit::new();
    init.set_data(data.as_ref());
    let event = MessageEvent::new_with_event_init_dict("message", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();

    let height_after = iframe.style().get_property_value("height").unwrap();
    assert_eq!(height_before, height_after);
    instance.destroy();
}

// -- destroy --

#[wasm_bindgen_test]
fn destroy_twice_is_a_no_op_and_disables_the_api() {
    let container = host_element("div");
    let instance = inline_instance(&container, inline_config("https://example.com/book"));

    instance.destroy();
    instance.destroy();

    assert!(instance.is_destroyed());
    assert!(instance.iframe().is_none());
    assert!(container.query_selector("iframe").unwrap().is_none());

    instance.open();
    instance.close();
    instance.reload().unwrap();
    assert_eq!(overlay_count(), 0);
    assert!(instance.iframe().is_none());
}

#[wasm_bindgen_test]
fn instances_do_not_interfere() {
    let first_host = host_element("div");
    let second_host = host_element("div");
    let first = inline_instance(&first_host, inline_config("https://example.com/a"));
    let second = inline_instance(&second_host, inline_config("https://example.com/b"));

    first.destroy();

    assert!(first_host.query_selector("iframe").unwrap().is_none());
    let survivor = second.iframe().expect("second embed untouched");
    assert!(survivor.src().contains("/b?embed=true"));
    second.destroy();
}

// -- JS boundary --

#[wasm_bindgen_test]
fn js_constructor_accepts_element_trigger() {
    use impulse_embed_web::ImpulseEmbed;

    let trigger = host_element("button");
    let config = Object::new();
    Reflect::set(
        &config,
        &JsValue::from_str("url"),
        &JsValue::from_str("https://example.com/book"),
    )
    .unwrap();
    Reflect::set(
        &config,
        &JsValue::from_str("mode"),
        &JsValue::from_str("popup"),
    )
    .unwrap();
    Reflect::set(&config, &JsValue::from_str("trigger"), trigger.as_ref()).unwrap();

    let embed = ImpulseEmbed::new(config.into()).expect("constructor should accept the object");
    embed.open();
    assert_eq!(overlay_count(), 1);
    embed.destroy();
    assert_eq!(overlay_count(), 0);
}

#[wasm_bindgen_test]
fn js_constructor_rejects_missing_trigger() {
    use impulse_embed_web::ImpulseEmbed;

    let config = Object::new();
    Reflect::set(
        &config,
        &JsValue::from_str("url"),
        &JsValue::from_str("https://example.com/book"),
    )
    .unwrap();
    Reflect::set(
        &config,
        &JsValue::from_str("mode"),
        &JsValue::from_str("popup"),
    )
    .unwrap();

    assert!(ImpulseEmbed::new(config.into()).is_err());
}
