#![forbid(unsafe_code)]

//! Embed lifecycle manager.
//!
//! [`EmbedInstance`] owns one embed end to end: construction-time
//! validation and element resolution, inline insertion or popup
//! presentation, cross-document message routing, reload, and teardown.
//! Every listener registration is an owned [`EventListener`] handle, so
//! registration and deregistration are paired one-to-one per instance and
//! dropping the instance releases everything it attached to the document.
//!
//! Transition decisions live in the core [`Lifecycle`] machine; this module
//! only executes the DOM effects it prescribes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use impulse_embed_core::{
    CloseStep, EmbedAnchor, EmbedConfig, EmbedError, EmbedId, EmbedMessage, FinishStep, Lifecycle,
    OpenStep, build_embed_url,
};
use js_sys::{Function, Object};
use tracing::{debug, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlElement, HtmlIFrameElement, KeyboardEvent, MessageEvent};

use crate::dom::{self, ElementRef};
use crate::iframe::build_iframe;
use crate::styles;

/// Host callbacks from the configuration object.
#[derive(Debug, Clone, Default)]
pub struct EmbedCallbacks {
    /// Fires once the iframe's document finishes loading.
    pub on_load: Option<Function>,
    /// Fires once a popup fully dismisses.
    pub on_close: Option<Function>,
    /// Fires with the payload of a form submission signal.
    pub on_submit: Option<Function>,
}

/// One embed instance: at most one live iframe, at most one overlay.
pub struct EmbedInstance {
    shared: Rc<EmbedShared>,
}

struct EmbedShared {
    id: EmbedId,
    config: EmbedConfig,
    callbacks: EmbedCallbacks,
    anchor: EmbedAnchor<HtmlElement>,
    document: Document,
    lifecycle: Cell<Lifecycle>,
    dom: RefCell<DomState>,
}

#[derive(Default)]
struct DomState {
    iframe: Option<HtmlIFrameElement>,
    overlay: Option<HtmlElement>,
    overlay_listeners: Vec<EventListener>,
    trigger_listener: Option<EventListener>,
    escape_listener: Option<EventListener>,
    message_listener: Option<EventListener>,
    reveal_frame: Option<AnimationFrame>,
}

impl EmbedInstance {
    /// Validate the configuration, resolve the anchor, and perform
    /// mode-specific initialization.
    ///
    /// Fails with `Config` on a missing required field, `ElementNotFound`
    /// when a selector resolves to nothing, and `InvalidUrl` when the base
    /// URL does not parse; in every failure case nothing has been attached
    /// to the document.
    pub fn create(
        config: EmbedConfig,
        anchor: EmbedAnchor<ElementRef>,
        callbacks: EmbedCallbacks,
    ) -> Result<Self, EmbedError> {
        config.validate_url()?;
        let document = dom::document()?;
        styles::ensure_global_styles(&document);

        let anchor = anchor.try_map(|target| {
            target
                .resolve(&document)
                .ok_or_else(|| EmbedError::ElementNotFound(target.describe()))
        })?;
        // fail on a bad base URL before touching the document
        let embed_url = build_embed_url(&config.url, &config.params)?;

        let lifecycle = match anchor {
            EmbedAnchor::Inline { .. } => Lifecycle::inline(),
            EmbedAnchor::Popup { .. } => Lifecycle::popup(),
        };
        let shared = Rc::new(EmbedShared {
            id: EmbedId::next(),
            config,
            callbacks,
            anchor,
            document,
            lifecycle: Cell::new(lifecycle),
            dom: RefCell::new(DomState::default()),
        });

        match &shared.anchor {
            EmbedAnchor::Inline { container } => shared.init_inline(container, &embed_url)?,
            EmbedAnchor::Popup { trigger } => shared.init_popup(trigger),
        }
        shared.install_message_listener()?;

        debug!(id = %shared.id, mode = shared.anchor.mode().as_str(), "embed created");
        Ok(Self { shared })
    }

    /// Present the popup. No-op for inline or destroyed instances.
    pub fn open(&self) {
        self.shared.open();
    }

    /// Dismiss the popup. No-op when destroyed or nothing is mounted.
    pub fn close(&self) {
        self.shared.close();
    }

    /// Navigate the live iframe to a freshly built embed URL.
    pub fn reload(&self) -> Result<(), EmbedError> {
        self.shared.reload()
    }

    /// Idempotent terminal teardown.
    pub fn destroy(&self) {
        self.shared.destroy();
    }

    /// The current live iframe, if any. Observational.
    #[must_use]
    pub fn iframe(&self) -> Option<HtmlIFrameElement> {
        self.shared.dom.borrow().iframe.clone()
    }

    #[must_use]
    pub fn id(&self) -> &EmbedId {
        &self.shared.id
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.shared.lifecycle.get().is_destroyed()
    }
}

impl EmbedShared {
    // -- construction ------------------------------------------------------

    fn init_inline(&self, container: &HtmlElement, embed_url: &str) -> Result<(), EmbedError> {
        let _ = container.class_list().add_1(styles::INLINE_CONTAINER_CLASS);
        let iframe = self.build_embed_iframe(embed_url)?;
        container
            .append_child(&iframe)
            .map_err(dom::js_error("append inline iframe"))?;
        self.dom.borrow_mut().iframe = Some(iframe);
        Ok(())
    }

    fn init_popup(self: &Rc<Self>, trigger: &HtmlElement) {
        let _ = trigger.style().set_property("cursor", "pointer");
        let weak = Rc::downgrade(self);
        let listener = EventListener::new_with_options(
            trigger,
            "click",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                event.prevent_default();
                if let Some(shared) = weak.upgrade() {
                    shared.open();
                }
            },
        );
        self.dom.borrow_mut().trigger_listener = Some(listener);
    }

    fn build_embed_iframe(&self, src: &str) -> Result<HtmlIFrameElement, EmbedError> {
        let iframe = build_iframe(
            &self.document,
            src,
            &self.config.frame(),
            self.callbacks.on_load.as_ref(),
        )?;
        iframe.set_id(self.id.as_str());
        Ok(iframe)
    }

    // -- messages ----------------------------------------------------------

    fn install_message_listener(self: &Rc<Self>) -> Result<(), EmbedError> {
        let window = dom::window()?;
        let weak = Rc::downgrade(self);
        let listener = EventListener::new(&window, "message", move |event: &Event| {
            let Some(shared) = weak.upgrade() else { return };
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            shared.handle_message(event);
        });
        self.dom.borrow_mut().message_listener = Some(listener);
        Ok(())
    }

    fn handle_message(self: &Rc<Self>, event: &MessageEvent) {
        // only messages originating from our live iframe's content window;
        // a message arriving during the closing window finds no iframe and
        // is dropped
        let content_window = {
            let state = self.dom.borrow();
            let Some(iframe) = state.iframe.as_ref() else {
                return;
            };
            let Some(content_window) = iframe.content_window() else {
                return;
            };
            content_window
        };
        let Some(source) = event.source() else { return };
        if !Object::is(source.as_ref(), content_window.as_ref()) {
            return;
        }

        let Ok(raw) = serde_wasm_bindgen::from_value::<serde_json::Value>(event.data()) else {
            return;
        };
        let Some(message) = EmbedMessage::parse(&raw) else {
            trace!(id = %self.id, "ignoring unrecognized embed message");
            return;
        };

        match message {
            EmbedMessage::Submit(payload) => {
                if let Some(on_submit) = &self.callbacks.on_submit {
                    let data = serde_wasm_bindgen::to_value(&payload).unwrap_or(JsValue::NULL);
                    if let Err(err) = on_submit.call1(&JsValue::NULL, &data) {
                        warn!(id = %self.id, ?err, "onSubmit callback failed");
                    }
                }
            }
            EmbedMessage::Close => {
                if self.anchor.is_popup() {
                    self.close();
                }
            }
            EmbedMessage::Resize { height } => {
                if !self.anchor.is_popup() {
                    let state = self.dom.borrow();
                    if let Some(iframe) = state.iframe.as_ref() {
                        let _ = iframe.style().set_property("height", &format!("{height}px"));
                    }
                }
            }
        }
    }

    // -- popup presentation ------------------------------------------------

    fn open(self: &Rc<Self>) {
        let mut lifecycle = self.lifecycle.get();
        let step = lifecycle.open();
        self.lifecycle.set(lifecycle);

        match step {
            OpenStep::Ignore => return,
            OpenStep::Mount => {
                if let Err(err) = self.mount_overlay() {
                    warn!(id = %self.id, %err, "failed to mount popup overlay");
                    self.lifecycle.set(Lifecycle::popup());
                    return;
                }
            }
            OpenStep::Reveal => {}
        }

        self.lock_scroll();
        // defer the visible class to the next paint so the browser observes
        // the pre-transition state and runs the reveal transition
        let weak = Rc::downgrade(self);
        let frame = request_animation_frame(move |_| {
            let Some(shared) = weak.upgrade() else { return };
            let state = shared.dom.borrow();
            if let Some(overlay) = state.overlay.as_ref() {
                let _ = overlay.class_list().add_1(styles::VISIBLE_CLASS);
            }
        });
        self.dom.borrow_mut().reveal_frame = Some(frame);
        debug!(id = %self.id, "popup opened");
    }

    fn mount_overlay(self: &Rc<Self>) -> Result<(), EmbedError> {
        let overlay = dom::create_div(&self.document, styles::OVERLAY_CLASS)?;
        overlay.set_id(&self.id.overlay_id());
        if let Some(css) = self.config.popup.overlay_css.as_deref() {
            dom::append_inline_css(&overlay, css);
        }

        let container = dom::create_div(&self.document, styles::POPUP_CONTAINER_CLASS)?;
        if let Some(css) = self.config.custom_css.as_deref() {
            dom::append_inline_css(&container, css);
        }
        if let Some(css) = self.config.popup.popup_css.as_deref() {
            dom::append_inline_css(&container, css);
        }

        let mut listeners = Vec::new();

        if self.config.popup.show_close_button {
            let button = self
                .document
                .create_element("button")
                .map_err(dom::js_error("create close button"))?;
            button.set_class_name(styles::CLOSE_BUTTON_CLASS);
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
                if let Some(shared) = weak.upgrade() {
                    shared.close();
                }
            }));
            container
                .append_child(&button)
                .map_err(dom::js_error("append close button"))?;
        }

        let embed_url = build_embed_url(&self.config.url, &self.config.params)?;
        let iframe = self.build_embed_iframe(&embed_url)?;
        container
            .append_child(&iframe)
            .map_err(dom::js_error("append popup iframe"))?;
        overlay
            .append_child(&container)
            .map_err(dom::js_error("append popup container"))?;

        if self.config.popup.close_on_overlay_click {
            let weak = Rc::downgrade(self);
            let backdrop = overlay.clone();
            listeners.push(EventListener::new(&overlay, "click", move |event: &Event| {
                // only direct backdrop clicks, not clicks inside the shell
                let Some(target) = event.target() else { return };
                if !Object::is(target.as_ref(), backdrop.as_ref()) {
                    return;
                }
                if let Some(shared) = weak.upgrade() {
                    shared.close();
                }
            }));
        }

        dom::body(&self.document)?
            .append_child(&overlay)
            .map_err(dom::js_error("append overlay"))?;

        {
            let mut state = self.dom.borrow_mut();
            state.overlay = Some(overlay);
            state.iframe = Some(iframe);
            state.overlay_listeners = listeners;
        }
        self.install_escape_listener();
        Ok(())
    }

    fn install_escape_listener(self: &Rc<Self>) {
        let mut state = self.dom.borrow_mut();
        if state.escape_listener.is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let listener = EventListener::new(&self.document, "keydown", move |event: &Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() != "Escape" {
                return;
            }
            let Some(shared) = weak.upgrade() else { return };
            let overlay_mounted = shared.dom.borrow().overlay.is_some();
            if overlay_mounted {
                shared.close();
            }
        });
        state.escape_listener = Some(listener);
    }

    fn close(self: &Rc<Self>) {
        let mut lifecycle = self.lifecycle.get();
        let step = lifecycle.close();
        self.lifecycle.set(lifecycle);
        if step == CloseStep::Ignore {
            return;
        }

        {
            let mut state = self.dom.borrow_mut();
            if let Some(overlay) = state.overlay.as_ref() {
                let _ = overlay.class_list().remove_1(styles::VISIBLE_CLASS);
            }
            // cleared before the deferred detach so a resize arriving
            // during the closing animation is not misapplied
            state.iframe = None;
        }

        let strong = Rc::clone(self);
        Timeout::new(styles::CLOSE_ANIMATION_MS, move || {
            strong.finish_close();
        })
        .forget();
        debug!(id = %self.id, "popup closing");
    }

    /// Deferred continuation after the exit transition. The state machine
    /// decides whether this particular timer still owns the teardown.
    fn finish_close(self: &Rc<Self>) {
        let mut lifecycle = self.lifecycle.get();
        let step = lifecycle.finish_close();
        self.lifecycle.set(lifecycle);
        if step == FinishStep::Ignore {
            return;
        }

        self.teardown_overlay();
        self.unlock_scroll();
        if let Some(on_close) = &self.callbacks.on_close {
            if let Err(err) = on_close.call0(&JsValue::NULL) {
                warn!(id = %self.id, ?err, "onClose callback failed");
            }
        }
        debug!(id = %self.id, "popup closed");
    }

    fn teardown_overlay(&self) {
        let mut state = self.dom.borrow_mut();
        if let Some(overlay) = state.overlay.take() {
            overlay.remove();
        }
        state.overlay_listeners.clear();
        state.reveal_frame = None;
        state.iframe = None;
    }

    fn lock_scroll(&self) {
        if let Ok(body) = dom::body(&self.document) {
            let _ = body.style().set_property("overflow", "hidden");
        }
    }

    fn unlock_scroll(&self) {
        if let Ok(body) = dom::body(&self.document) {
            let _ = body.style().remove_property("overflow");
        }
    }

    // -- reload / destroy --------------------------------------------------

    fn reload(&self) -> Result<(), EmbedError> {
        if self.lifecycle.get().is_destroyed() {
            return Ok(());
        }
        let state = self.dom.borrow();
        let Some(iframe) = state.iframe.as_ref() else {
            return Ok(());
        };
        let src = build_embed_url(&self.config.url, &self.config.params)?;
        iframe.set_src(&src);
        debug!(id = %self.id, "embed reloaded");
        Ok(())
    }

    fn destroy(&self) {
        let mut lifecycle = self.lifecycle.get();
        let destroyed_now = lifecycle.destroy();
        self.lifecycle.set(lifecycle);
        if !destroyed_now {
            return;
        }

        let mut state = self.dom.borrow_mut();
        match &self.anchor {
            EmbedAnchor::Popup { trigger } => {
                // immediate close: no exit animation, no onClose
                if let Some(overlay) = state.overlay.take() {
                    overlay.remove();
                    self.unlock_scroll();
                }
                state.overlay_listeners.clear();
                state.trigger_listener = None;
                let _ = trigger.style().remove_property("cursor");
            }
            EmbedAnchor::Inline { .. } => {
                if let Some(iframe) = state.iframe.take() {
                    iframe.remove();
                }
            }
        }
        state.iframe = None;
        state.escape_listener = None;
        state.message_listener = None;
        state.reveal_frame = None;
        debug!(id = %self.id, "embed destroyed");
    }
}
