#![forbid(unsafe_code)]

//! Error taxonomy for embed construction and operation.
//!
//! Construction-time misconfiguration is fatal and surfaces as [`EmbedError`];
//! post-construction operations are defensive no-ops and never raise.
//! Declarative (auto-init) parsing problems are non-fatal and reported as
//! [`ConfigWarning`] values instead.

use thiserror::Error;

/// A required configuration field is missing for the requested mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("url is required")]
    MissingUrl,
    #[error("container is required for inline mode")]
    MissingContainer,
    #[error("trigger is required for popup mode")]
    MissingTrigger,
}

/// Fatal embed failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// Missing required field for the given mode. Thrown synchronously at
    /// construction; no iframe, overlay, or listener exists afterwards.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A selector resolved to nothing at construction time.
    #[error("element not found for `{0}`")]
    ElementNotFound(String),

    /// The base URL is not a valid absolute URL. Surfaces wherever URL
    /// building is attempted (construction or reload).
    #[error("invalid embed url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Unexpected DOM/JS-side failure (element creation or insertion).
    #[error("dom operation failed: {0}")]
    Dom(String),
}

/// Non-fatal diagnostic from declarative configuration parsing.
///
/// Warnings never abort embed creation; the affected field falls back to
/// its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `data-impulse-params` was present but not a JSON string-to-string
    /// object; the embed proceeds with no custom params.
    InvalidParamsJson(String),
    /// `data-impulse-mode` carried an unrecognized value; the embed falls
    /// back to inline mode.
    UnknownMode(String),
}

impl core::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidParamsJson(detail) => write!(f, "invalid params JSON: {detail}"),
            Self::UnknownMode(raw) => write!(f, "unknown mode `{raw}`, defaulting to inline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_match_contract() {
        assert_eq!(ConfigError::MissingUrl.to_string(), "url is required");
        assert_eq!(
            ConfigError::MissingContainer.to_string(),
            "container is required for inline mode"
        );
        assert_eq!(
            ConfigError::MissingTrigger.to_string(),
            "trigger is required for popup mode"
        );
    }

    #[test]
    fn invalid_url_reports_base_and_cause() {
        let err = EmbedError::InvalidUrl {
            url: "not a url".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        let text = err.to_string();
        assert!(text.contains("not a url"));
        assert!(text.starts_with("invalid embed url"));
    }

    #[test]
    fn warnings_render_human_readable() {
        let warning = ConfigWarning::UnknownMode("banner".to_string());
        assert_eq!(
            warning.to_string(),
            "unknown mode `banner`, defaulting to inline"
        );
    }
}
