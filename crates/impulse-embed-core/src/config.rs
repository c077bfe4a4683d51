#![forbid(unsafe_code)]

//! Embed configuration.
//!
//! The wire shape ([`EmbedConfig`]) mirrors the JS configuration object and
//! the declarative `data-impulse-*` attributes. Accepted configuration is
//! immutable; validation happens once, at the boundary, by converting the
//! optional-field wire shape into the typed [`EmbedAnchor`] union — the one
//! place where mode-conditional requiredness is checked.

use core::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigWarning};

/// Iframe width applied when the configuration leaves `width` unset.
pub const DEFAULT_FRAME_WIDTH: &str = "100%";
/// Iframe height applied when the configuration leaves `height` unset.
pub const DEFAULT_FRAME_HEIGHT: &str = "600px";

/// Declarative auto-init attributes carried by a `<script>` marker element.
pub const ATTR_URL: &str = "data-impulse-url";
pub const ATTR_MODE: &str = "data-impulse-mode";
pub const ATTR_CONTAINER: &str = "data-impulse-container";
pub const ATTR_TRIGGER: &str = "data-impulse-trigger";
pub const ATTR_WIDTH: &str = "data-impulse-width";
pub const ATTR_HEIGHT: &str = "data-impulse-height";
pub const ATTR_PARAMS: &str = "data-impulse-params";

/// Presentation mode of an embed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedMode {
    /// Rendered directly into a host-provided container, always visible.
    #[default]
    Inline,
    /// Rendered inside a dismissible overlay, shown after a trigger click.
    Popup,
}

impl EmbedMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Popup => "popup",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(Self::Inline),
            "popup" => Some(Self::Popup),
            _ => None,
        }
    }
}

/// Popup presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopupOptions {
    /// Render the dismiss button in the popup container.
    pub show_close_button: bool,
    /// Close the popup when the backdrop (not the content shell) is clicked.
    pub close_on_overlay_click: bool,
    /// Extra inline style appended to the overlay backdrop.
    #[serde(rename = "overlayCSS")]
    pub overlay_css: Option<String>,
    /// Extra inline style appended to the popup container.
    #[serde(rename = "popupCSS")]
    pub popup_css: Option<String>,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            show_close_button: true,
            close_on_overlay_click: true,
            overlay_css: None,
            popup_css: None,
        }
    }
}

/// Sizing and styling applied to the embed iframe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOptions {
    pub width: Option<String>,
    pub height: Option<String>,
    pub custom_css: Option<String>,
}

impl FrameOptions {
    #[must_use]
    pub fn width_or_default(&self) -> &str {
        self.width.as_deref().unwrap_or(DEFAULT_FRAME_WIDTH)
    }

    #[must_use]
    pub fn height_or_default(&self) -> &str {
        self.height.as_deref().unwrap_or(DEFAULT_FRAME_HEIGHT)
    }
}

/// Wire-shaped embed configuration.
///
/// Field names follow the JS object (camelCase, `customCSS`). `container`
/// and `trigger` hold selector strings here; the web layer may substitute
/// live element handles before anchor construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedConfig {
    pub url: String,
    pub mode: EmbedMode,
    pub container: Option<String>,
    pub trigger: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    #[serde(rename = "customCSS")]
    pub custom_css: Option<String>,
    /// Query parameters merged into the embed URL, in mapping order.
    pub params: IndexMap<String, String>,
    pub popup: PopupOptions,
}

impl EmbedConfig {
    /// Reject an absent or blank base URL.
    pub fn validate_url(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        Ok(())
    }

    /// Sizing/styling subset handed to the iframe factory.
    #[must_use]
    pub fn frame(&self) -> FrameOptions {
        FrameOptions {
            width: self.width.clone(),
            height: self.height.clone(),
            custom_css: self.custom_css.clone(),
        }
    }

    /// Convert the optional-field wire shape into the typed anchor union.
    pub fn anchor(&self) -> Result<EmbedAnchor<String>, ConfigError> {
        EmbedAnchor::new(self.mode, self.container.clone(), self.trigger.clone())
    }

    /// Build a configuration from `data-impulse-*` attributes.
    ///
    /// `attr` is the attribute lookup (name including the `data-impulse-`
    /// prefix). Parsing never fails: a bad mode or params value produces a
    /// [`ConfigWarning`] and the field falls back to its default.
    pub fn from_data_attributes<F>(mut attr: F) -> (Self, Vec<ConfigWarning>)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let mode = match attr(ATTR_MODE) {
            None => EmbedMode::default(),
            Some(raw) => EmbedMode::parse(&raw).unwrap_or_else(|| {
                warnings.push(ConfigWarning::UnknownMode(raw));
                EmbedMode::default()
            }),
        };

        let params = match attr(ATTR_PARAMS) {
            None => IndexMap::new(),
            Some(raw) => match parse_params_json(&raw) {
                Ok(params) => params,
                Err(err) => {
                    warnings.push(ConfigWarning::InvalidParamsJson(err.to_string()));
                    IndexMap::new()
                }
            },
        };

        let config = Self {
            url: attr(ATTR_URL).unwrap_or_default(),
            mode,
            container: attr(ATTR_CONTAINER),
            trigger: attr(ATTR_TRIGGER),
            width: attr(ATTR_WIDTH),
            height: attr(ATTR_HEIGHT),
            custom_css: None,
            params,
            popup: PopupOptions::default(),
        };
        (config, warnings)
    }
}

/// Parse the declarative params attribute: a JSON object mapping string
/// keys to string values, in document order.
pub fn parse_params_json(raw: &str) -> Result<IndexMap<String, String>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Mode-specific anchor of an embed: exactly one of a container (inline)
/// or a trigger (popup).
///
/// `T` is a selector string in the core, an element-or-selector reference
/// in the web layer, and a live element after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedAnchor<T> {
    Inline { container: T },
    Popup { trigger: T },
}

impl<T> EmbedAnchor<T> {
    /// The single mode/requiredness check: inline needs `container`, popup
    /// needs `trigger`.
    pub fn new(mode: EmbedMode, container: Option<T>, trigger: Option<T>) -> Result<Self, ConfigError> {
        match mode {
            EmbedMode::Inline => container
                .map(|container| Self::Inline { container })
                .ok_or(ConfigError::MissingContainer),
            EmbedMode::Popup => trigger
                .map(|trigger| Self::Popup { trigger })
                .ok_or(ConfigError::MissingTrigger),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> EmbedMode {
        match self {
            Self::Inline { .. } => EmbedMode::Inline,
            Self::Popup { .. } => EmbedMode::Popup,
        }
    }

    #[must_use]
    pub const fn is_popup(&self) -> bool {
        matches!(self, Self::Popup { .. })
    }

    /// Anchor-target conversion preserving the variant.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EmbedAnchor<U> {
        match self {
            Self::Inline { container } => EmbedAnchor::Inline {
                container: f(container),
            },
            Self::Popup { trigger } => EmbedAnchor::Popup {
                trigger: f(trigger),
            },
        }
    }

    /// Fallible anchor-target conversion preserving the variant, used to
    /// turn selectors into live elements.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<EmbedAnchor<U>, E> {
        Ok(match self {
            Self::Inline { container } => EmbedAnchor::Inline {
                container: f(container)?,
            },
            Self::Popup { trigger } => EmbedAnchor::Popup {
                trigger: f(trigger)?,
            },
        })
    }
}

/// Opaque unique embed token, stable for the instance's lifetime.
///
/// Used as the iframe element id and, suffixed `-overlay`, as the popup
/// overlay id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmbedId(String);

static NEXT_EMBED_ID: AtomicU64 = AtomicU64::new(1);

impl EmbedId {
    /// Allocate the next id from the process-wide counter.
    #[must_use]
    pub fn next() -> Self {
        let seq = NEXT_EMBED_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("impulse-embed-{seq}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id carried by the popup overlay element.
    #[must_use]
    pub fn overlay_id(&self) -> String {
        format!("{}-overlay", self.0)
    }
}

impl core::fmt::Display for EmbedId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
