#![forbid(unsafe_code)]

//! Core: embed configuration, URL building, message protocol, and
//! lifecycle state for Impulse Embed.
//!
//! # Role in Impulse Embed
//! `impulse-embed-core` is the platform-independent model. It owns
//! everything about an embed that does not touch a document: parsing and
//! validating configuration, building the embed URL, classifying
//! cross-document messages, and deciding lifecycle transitions.
//!
//! # Primary responsibilities
//! - **EmbedConfig / EmbedAnchor**: wire-shaped configuration and the typed
//!   inline/popup anchor union it validates into.
//! - **build_embed_url**: the `embed=true` marker plus caller parameters,
//!   with overwrite semantics and order preserved.
//! - **EmbedMessage**: permissive classification of `impulse:form:*`
//!   signals from the embedded page.
//! - **Lifecycle**: the popup open/close/destroy state machine, including
//!   the closing-animation window.
//!
//! # How it fits in the system
//! `impulse-embed-web` wraps this crate with a `wasm-bindgen` JS API and
//! the `web-sys` DOM plumbing (style injection, iframe construction, event
//! listeners). Everything here is deterministic and tested on native
//! targets.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod message;
pub mod url;

pub use config::{
    EmbedAnchor, EmbedConfig, EmbedId, EmbedMode, FrameOptions, PopupOptions,
};
pub use error::{ConfigError, ConfigWarning, EmbedError};
pub use lifecycle::{CloseStep, FinishStep, Lifecycle, OpenStep, Phase, PopupPhase};
pub use message::EmbedMessage;
pub use url::build_embed_url;
