//! MQTT topic and payload derivation.
//!
//! Topics are recomputed at the point of use so they can never go stale
//! relative to the current selection.

use core::fmt::Write;

use heapless::String;

pub const PAYLOAD_PRESSED: &str = "pressed";
pub const PAYLOAD_RELEASED: &str = "released";
pub const PAYLOAD_CONNECTED: &str = "connected";

/// Build the event topic for a channel number:
/// `{prefix}/button/{number}/state`.
pub fn state_topic(prefix: &str, number: u8) -> String<64> {
    let mut topic = String::new();
    let _ = write!(topic, "{}/button/{}/state", prefix, number);
    topic
}

/// Build the status announcement topic: `{prefix}/{device_id}/status`.
pub fn status_topic(prefix: &str, device_id: &str) -> String<64> {
    let mut topic = String::new();
    let _ = write!(topic, "{}/{}/status", prefix, device_id);
    topic
}
