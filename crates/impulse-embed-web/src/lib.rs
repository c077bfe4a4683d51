#![forbid(unsafe_code)]

//! `impulse-embed-web` is the browser surface of Impulse Embed.
//!
//! Design:
//! - **All DOM effects live here**: style injection, element resolution,
//!   iframe construction, the popup overlay, listener registration, and
//!   the declarative auto-init scanner.
//! - **Decisions live in `impulse-embed-core`**: configuration validation,
//!   URL building, message classification, and the lifecycle state machine
//!   are pure and tested on native targets; this crate executes the steps
//!   they prescribe.
//! - **RAII listeners**: every document/window registration is an owned
//!   handle dropped (and thereby deregistered) at destroy.
//!
//! The DOM modules and their dependencies are gated on
//! `target_arch = "wasm32"`; on native targets only the stylesheet
//! constants compile, which keeps the workspace testable without a
//! browser.

pub mod styles;

#[cfg(target_arch = "wasm32")]
pub mod auto_init;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod embed;
#[cfg(target_arch = "wasm32")]
pub mod iframe;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{ImpulseEmbed, create_embed, start, version};
