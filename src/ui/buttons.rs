//! GPIO button input with polled debouncing.
//!
//! Three physical buttons (active-low, externally pulled up on the board;
//! GPIO37-39 are input-only pads without internal pulls):
//!   - LEFT  (GPIO39) - previous number
//!   - SEND  (GPIO38) - press/release publish
//!   - RIGHT (GPIO37) - next number
//!
//! Each poll samples all three pins, suppresses chatter for
//! `BUTTON_DEBOUNCE_MS` after a level change, and reports the debounced
//! edges for this tick. The send button is the only one whose release edge
//! matters.

use embassy_time::Instant;
use esp_hal::gpio::Input;
use log::debug;

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::io::{ButtonEdgeSource, EdgeSnapshot};

struct Debounced {
    /// Debounced pressed state (true = pressed).
    stable: bool,
    last_change: Instant,
}

impl Debounced {
    fn new() -> Self {
        Self {
            stable: false,
            last_change: Instant::now(),
        }
    }

    /// Feed one raw sample; returns `Some(pressed)` on a debounced edge.
    fn update(&mut self, raw_pressed: bool, now: Instant) -> Option<bool> {
        if raw_pressed == self.stable {
            return None;
        }
        if now.duration_since(self.last_change).as_millis() < BUTTON_DEBOUNCE_MS {
            return None;
        }
        self.stable = raw_pressed;
        self.last_change = now;
        Some(raw_pressed)
    }
}

pub struct PanelButtons<'d> {
    left: Input<'d>,
    send: Input<'d>,
    right: Input<'d>,
    left_state: Debounced,
    send_state: Debounced,
    right_state: Debounced,
}

impl<'d> PanelButtons<'d> {
    pub fn new(left: Input<'d>, send: Input<'d>, right: Input<'d>) -> Self {
        Self {
            left,
            send,
            right,
            left_state: Debounced::new(),
            send_state: Debounced::new(),
            right_state: Debounced::new(),
        }
    }
}

impl ButtonEdgeSource for PanelButtons<'_> {
    fn poll(&mut self) -> EdgeSnapshot {
        let now = Instant::now();
        let mut edges = EdgeSnapshot::default();

        // Active-low: a low pin is a pressed button.
        if self.left_state.update(self.left.is_low(), now) == Some(true) {
            debug!("button: left");
            edges.select_prev = true;
        }
        if self.right_state.update(self.right.is_low(), now) == Some(true) {
            debug!("button: right");
            edges.select_next = true;
        }
        match self.send_state.update(self.send.is_low(), now) {
            Some(true) => {
                debug!("button: send down");
                edges.send_pressed = true;
            }
            Some(false) => {
                debug!("button: send up");
                edges.send_released = true;
            }
            None => {}
        }

        edges
    }
}
