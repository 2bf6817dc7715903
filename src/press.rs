//! Press/release event pairing.
//!
//! Converts raw send-button edges into deduplicated publish actions. The
//! selection is captured at press time so a mid-press selection change
//! cannot split a press/release pair across two topics.

/// Tracks an outstanding press and the channel number it captured.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PressTracker {
    held: Option<u8>,
}

impl PressTracker {
    pub const fn new() -> Self {
        Self { held: None }
    }

    /// Rising edge: capture the selection carried by this press and return
    /// it for the `pressed` publish. A repeated rising edge without an
    /// intervening release re-captures.
    pub fn begin(&mut self, selection: u8) -> u8 {
        self.held = Some(selection);
        selection
    }

    /// Falling edge: the selection captured at press time, or `None` when
    /// no press is outstanding (spurious release, e.g. at boot).
    pub fn finish(&mut self) -> Option<u8> {
        self.held.take()
    }

    /// True between an emitted `pressed` and its paired `released`;
    /// drives the highlighted number panel.
    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}
