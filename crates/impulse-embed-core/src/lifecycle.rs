#![forbid(unsafe_code)]

//! Embed lifecycle state machine.
//!
//! The DOM-side manager consults this machine before every side effect and
//! feeds completed transitions back in. Keeping the decisions here makes
//! the tricky windows — the closing animation, a reopen during it, a
//! destroy racing a deferred continuation — natively testable without a
//! document.
//!
//! Phases: `Inline`, `Popup(Closed ⇄ Open → Closing)`, `Destroyed`
//! (absorbing). The closing window is the fixed animation delay between
//! `close()` and its deferred continuation; the overlay stays mounted for
//! exactly that window.

/// Popup presentation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    /// No overlay mounted.
    Closed,
    /// Overlay mounted and revealed (or about to be, pending next paint).
    Open,
    /// Exit transition running; overlay still mounted, teardown scheduled.
    Closing,
}

/// Overall instance phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inline,
    Popup(PopupPhase),
    Destroyed,
}

/// Decision for an `open()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum OpenStep {
    /// Build and append a fresh overlay subtree, then lock scroll and
    /// reveal.
    Mount,
    /// Overlay already mounted (open, or still in its closing window):
    /// lock scroll and reveal it again without creating a second subtree.
    Reveal,
    Ignore,
}

/// Decision for a `close()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CloseStep {
    /// Start (or restart) the exit transition and schedule the deferred
    /// teardown continuation.
    Begin,
    Ignore,
}

/// Decision for the deferred close continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum FinishStep {
    /// Detach the overlay, restore scroll, then report the close.
    Teardown,
    Ignore,
}

/// The lifecycle state of one embed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    #[must_use]
    pub const fn inline() -> Self {
        Self {
            phase: Phase::Inline,
        }
    }

    #[must_use]
    pub const fn popup() -> Self {
        Self {
            phase: Phase::Popup(PopupPhase::Closed),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        matches!(self.phase, Phase::Destroyed)
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.is_destroyed()
    }

    /// An overlay subtree is currently mounted in the document.
    #[must_use]
    pub const fn overlay_mounted(&self) -> bool {
        matches!(
            self.phase,
            Phase::Popup(PopupPhase::Open) | Phase::Popup(PopupPhase::Closing)
        )
    }

    pub fn open(&mut self) -> OpenStep {
        match self.phase {
            Phase::Popup(PopupPhase::Closed) => {
                self.phase = Phase::Popup(PopupPhase::Open);
                OpenStep::Mount
            }
            // A reopen during the closing window reuses the still-mounted
            // overlay; the pending continuation will still tear it down.
            Phase::Popup(PopupPhase::Closing) => {
                self.phase = Phase::Popup(PopupPhase::Open);
                OpenStep::Reveal
            }
            Phase::Popup(PopupPhase::Open) => OpenStep::Reveal,
            Phase::Inline | Phase::Destroyed => OpenStep::Ignore,
        }
    }

    pub fn close(&mut self) -> CloseStep {
        match self.phase {
            Phase::Popup(PopupPhase::Open) | Phase::Popup(PopupPhase::Closing) => {
                self.phase = Phase::Popup(PopupPhase::Closing);
                CloseStep::Begin
            }
            Phase::Popup(PopupPhase::Closed) | Phase::Inline | Phase::Destroyed => {
                CloseStep::Ignore
            }
        }
    }

    /// The deferred continuation body. Only the first continuation after a
    /// completed close tears down; later (duplicate) timers and timers
    /// outliving a destroy are inert.
    pub fn finish_close(&mut self) -> FinishStep {
        match self.phase {
            Phase::Popup(PopupPhase::Closing) | Phase::Popup(PopupPhase::Open) => {
                self.phase = Phase::Popup(PopupPhase::Closed);
                FinishStep::Teardown
            }
            Phase::Popup(PopupPhase::Closed) | Phase::Inline | Phase::Destroyed => {
                FinishStep::Ignore
            }
        }
    }

    /// Absorbing terminal transition. Returns `true` exactly once.
    pub fn destroy(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.phase = Phase::Destroyed;
        true
    }
}
