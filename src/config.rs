//! Application-wide constants and compile-time configuration.
//!
//! All network credentials, broker settings, timing parameters and pin
//! assignments live here so they can be tuned in one place.

// WiFi (transport layer)

/// SSID and passphrase of the access point hosting the broker.
/// Replace for your deployment; there is no runtime provisioning.
pub const WIFI_SSID: &str = "panel-net";
pub const WIFI_PASSWORD: &str = "panel-pass";

/// Startup transport bring-up: bounded attempt count and the pacing window
/// of a single attempt. 30 x 500 ms = at most 15 s of blocking boot.
pub const TRANSPORT_STARTUP_ATTEMPTS: u32 = 30;
pub const TRANSPORT_ATTEMPT_WINDOW_MS: u64 = 500;

// MQTT (session layer)

/// Broker address and port. The broker normally runs on the AP host.
pub const MQTT_BROKER_ADDR: core::net::Ipv4Addr = core::net::Ipv4Addr::new(10, 42, 0, 1);
pub const MQTT_BROKER_PORT: u16 = 1883;

pub const MQTT_KEEP_ALIVE_SECS: u16 = 60;

/// Minimum spacing between session connect attempts.
pub const SESSION_RETRY_COOLDOWN_MS: u64 = 5_000;

/// Topic namespace: events go to `{TOPIC_PREFIX}/button/{n}/state`,
/// the status announcement to `{TOPIC_PREFIX}/{DEVICE_ID}/status`.
pub const TOPIC_PREFIX: &str = "panel";
pub const DEVICE_ID: &str = "pad2mqtt-01";

// Control loop

/// Sleep between ticks. Short enough that button edges are never missed,
/// long enough to keep the radio task scheduled.
pub const TICK_INTERVAL_MS: u64 = 10;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

// GPIO pin assignments (M5Stack Core defaults)
//
// These are logical names; the concrete `esp_hal::peripherals::*` pins are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button PREV (left)    → GPIO39
//   Button SEND (middle)  → GPIO38
//   Button NEXT (right)   → GPIO37
//   TFT SPI SCK           → GPIO18
//   TFT SPI MOSI          → GPIO23
//   TFT DC                → GPIO27
//   TFT CS                → GPIO14
//   TFT RST               → GPIO33
//   TFT backlight         → GPIO32
