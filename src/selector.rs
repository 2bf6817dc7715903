//! Cyclic channel-number selection.

/// Lowest selectable channel number.
pub const SELECTION_MIN: u8 = 1;
/// Highest selectable channel number.
pub const SELECTION_MAX: u8 = 99;

/// Holds the currently selected channel number, cycling within
/// [`SELECTION_MIN`, `SELECTION_MAX`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selector {
    value: u8,
}

impl Selector {
    pub const fn new() -> Self {
        Self {
            value: SELECTION_MIN,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Step down; 1 wraps to 99.
    pub fn decrement(&mut self) {
        self.value = if self.value <= SELECTION_MIN {
            SELECTION_MAX
        } else {
            self.value - 1
        };
    }

    /// Step up; 99 wraps to 1.
    pub fn increment(&mut self) {
        self.value = if self.value >= SELECTION_MAX {
            SELECTION_MIN
        } else {
            self.value + 1
        };
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}
