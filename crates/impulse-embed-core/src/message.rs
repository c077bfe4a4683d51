#![forbid(unsafe_code)]

//! Cross-document message protocol (embedded page → host).
//!
//! Payloads are JSON-shaped objects with a `type` discriminator and a
//! `data` body. Parsing is intentionally permissive: unrecognized kinds
//! yield `None` so the embedded page's contract can evolve without breaking
//! older embed instances.

use serde_json::Value;

/// The embedded page signalled a form submission.
pub const MESSAGE_SUBMIT: &str = "impulse:form:submit";
/// The embedded page asked a popup host to dismiss it.
pub const MESSAGE_CLOSE: &str = "impulse:form:close";
/// The embedded page reported its content height for inline resizing.
pub const MESSAGE_RESIZE: &str = "impulse:form:resize";

/// A recognized application-level signal from the embedded page.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedMessage {
    /// Form submission with an arbitrary payload.
    Submit(Value),
    /// Dismiss request; meaningful only for popup embeds.
    Close,
    /// New content height in pixels; meaningful only for inline embeds.
    Resize { height: f64 },
}

impl EmbedMessage {
    /// Classify a raw message payload.
    ///
    /// Returns `None` for unknown kinds, non-object payloads, and a resize
    /// without a numeric height (a non-numeric height would only produce an
    /// invalid CSS length the CSSOM discards anyway).
    #[must_use]
    pub fn parse(raw: &Value) -> Option<Self> {
        let kind = raw.get("type")?.as_str()?;
        match kind {
            MESSAGE_SUBMIT => Some(Self::Submit(
                raw.get("data").cloned().unwrap_or(Value::Null),
            )),
            MESSAGE_CLOSE => Some(Self::Close),
            MESSAGE_RESIZE => {
                let height = raw.get("data")?.get("height")?.as_f64()?;
                Some(Self::Resize { height })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_submit_with_payload() {
        let raw = json!({"type": "impulse:form:submit", "data": {"email": "a@b.test"}});
        assert_eq!(
            EmbedMessage::parse(&raw),
            Some(EmbedMessage::Submit(json!({"email": "a@b.test"})))
        );
    }

    #[test]
    fn submit_without_data_carries_null() {
        let raw = json!({"type": "impulse:form:submit"});
        assert_eq!(
            EmbedMessage::parse(&raw),
            Some(EmbedMessage::Submit(Value::Null))
        );
    }

    #[test]
    fn parses_close() {
        let raw = json!({"type": "impulse:form:close"});
        assert_eq!(EmbedMessage::parse(&raw), Some(EmbedMessage::Close));
    }

    #[test]
    fn parses_resize_height() {
        let raw = json!({"type": "impulse:form:resize", "data": {"height": 450}});
        assert_eq!(
            EmbedMessage::parse(&raw),
            Some(EmbedMessage::Resize { height: 450.0 })
        );
    }

    #[test]
    fn resize_without_numeric_height_is_dropped() {
        for data in [json!({}), json!({"height": "450"}), json!(null)] {
            let raw = json!({"type": "impulse:form:resize", "data": data});
            assert_eq!(EmbedMessage::parse(&raw), None);
        }
    }

    #[test]
    fn unknown_kinds_are_silently_ignored() {
        for raw in [
            json!({"type": "impulse:form:future-thing", "data": 1}),
            json!({"type": 42}),
            json!({"data": {"height": 450}}),
            json!("impulse:form:close"),
            json!(null),
        ] {
            assert_eq!(EmbedMessage::parse(&raw), None);
        }
    }
}
