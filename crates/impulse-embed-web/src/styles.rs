#![forbid(unsafe_code)]

//! Shared stylesheet singleton.
//!
//! One `<style>` block per document, keyed by [`STYLE_ELEMENT_ID`], holds
//! the overlay, popup container, close button, and inline container rules.
//! Every embed instance calls [`ensure_global_styles`]; only the first call
//! inserts anything.

/// Id of the singleton `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "impulse-embed-styles";

/// Full-viewport dimmed backdrop for popup mode.
pub const OVERLAY_CLASS: &str = "impulse-popup-overlay";
/// Centered content shell inside the overlay.
pub const POPUP_CONTAINER_CLASS: &str = "impulse-popup-container";
/// Dismiss button in the popup container.
pub const CLOSE_BUTTON_CLASS: &str = "impulse-popup-close";
/// Marker class applied to inline host containers.
pub const INLINE_CONTAINER_CLASS: &str = "impulse-inline-container";
/// Marker class driving the overlay reveal transition.
pub const VISIBLE_CLASS: &str = "visible";

/// Exit transition duration. The deferred close continuation waits exactly
/// this long before tearing down the overlay subtree; keep in sync with the
/// `0.3s` transitions below.
pub const CLOSE_ANIMATION_MS: u32 = 300;

/// Rules inserted once per document.
pub const GLOBAL_STYLES: &str = r#"
    .impulse-popup-overlay {
      position: fixed;
      top: 0;
      left: 0;
      width: 100%;
      height: 100%;
      background-color: rgba(0, 0, 0, 0.5);
      z-index: 999999;
      display: flex;
      align-items: center;
      justify-content: center;
      opacity: 0;
      visibility: hidden;
      transition: opacity 0.3s ease, visibility 0.3s ease;
    }

    .impulse-popup-overlay.visible {
      opacity: 1;
      visibility: visible;
    }

    .impulse-popup-container {
      position: relative;
      background: white;
      border-radius: 8px;
      box-shadow: 0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 10px 10px -5px rgba(0, 0, 0, 0.04);
      max-width: 95vw;
      max-height: 95vh;
      overflow: hidden;
      transform: scale(0.9);
      transition: transform 0.3s ease;
    }

    .impulse-popup-overlay.visible .impulse-popup-container {
      transform: scale(1);
    }

    .impulse-popup-close {
      position: absolute;
      top: 16px;
      right: 16px;
      background: rgba(0, 0, 0, 0.1);
      border: none;
      border-radius: 50%;
      width: 32px;
      height: 32px;
      cursor: pointer;
      z-index: 1000000;
      display: flex;
      align-items: center;
      justify-content: center;
      font-size: 18px;
      color: #666;
      transition: background-color 0.2s ease;
    }

    .impulse-popup-close:hover {
      background: rgba(0, 0, 0, 0.2);
    }

    .impulse-popup-close::before {
      content: "\00d7";
    }

    .impulse-inline-container {
      width: 100%;
      overflow: hidden;
    }
"#;

/// Insert the shared stylesheet if this document does not carry it yet.
#[cfg(target_arch = "wasm32")]
pub fn ensure_global_styles(document: &web_sys::Document) {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return;
    }
    let Ok(style) = document.create_element("style") else {
        return;
    };
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(GLOBAL_STYLES));
    if let Some(head) = document.head() {
        let _ = head.append_child(&style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_covers_every_embed_class() {
        for class in [
            OVERLAY_CLASS,
            POPUP_CONTAINER_CLASS,
            CLOSE_BUTTON_CLASS,
            INLINE_CONTAINER_CLASS,
        ] {
            assert!(
                GLOBAL_STYLES.contains(&format!(".{class}")),
                "missing rule for .{class}"
            );
        }
        assert!(GLOBAL_STYLES.contains(&format!(".{OVERLAY_CLASS}.{VISIBLE_CLASS}")));
    }

    #[test]
    fn transition_duration_matches_close_delay() {
        let seconds = f64::from(CLOSE_ANIMATION_MS) / 1000.0;
        assert!(GLOBAL_STYLES.contains(&format!("{seconds}s ease")));
    }
}
