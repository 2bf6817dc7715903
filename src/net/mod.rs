//! Network capability implementations: esp-radio WiFi as the transport,
//! rust-mqtt over an embassy-net TCP socket as the messaging session.

pub mod mqtt;
pub mod wifi;

pub use mqtt::MqttSession;
pub use wifi::WifiLink;
