//! Library interface for pad2mqtt.
//!
//! The core modules (selection, press pairing, link state machine, frame
//! rendering, panel loop) are pure logic over the capability traits in
//! [`io`] and compile for the host, so `cargo test --lib` needs no
//! hardware.
//!
//! The embedded binary in main.rs wires the same core to esp-hal GPIO,
//! esp-radio WiFi, rust-mqtt and the ILI9342C TFT; those platform modules
//! are gated behind the `embedded` feature.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod config;
pub mod error;
pub mod io;
pub mod link;
pub mod panel;
pub mod press;
pub mod selector;
pub mod topic;
pub mod view;

#[cfg(feature = "embedded")]
pub mod net;
#[cfg(feature = "embedded")]
pub mod ui;
