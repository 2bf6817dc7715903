//! MQTT session over an embassy-net TCP socket.
//!
//! rust-mqtt's client consumes the socket and scratch buffers when the
//! broker handshake starts, so they cannot be recovered after a failure.
//! A session that hits any protocol or socket error marks itself
//! *poisoned*; main tears it down and constructs a fresh one, while the
//! reconnect cooldown lives on in the link manager across replacements.

use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{Duration, Instant};
use log::{debug, warn};
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;

use crate::config::{DEVICE_ID, MQTT_BROKER_ADDR, MQTT_BROKER_PORT, MQTT_KEEP_ALIVE_SECS};
use crate::error::SessionError;
use crate::io::MessagingClient;

const SOCKET_TIMEOUT_SECS: u64 = 10;

fn from_reason(code: ReasonCode) -> SessionError {
    match code {
        ReasonCode::NetworkError | ReasonCode::BuffError => SessionError::Network,
        ReasonCode::BadUserNameOrPassword => SessionError::Refused(0x86),
        ReasonCode::NotAuthorized => SessionError::Refused(0x87),
        ReasonCode::ServerUnavailable => SessionError::Refused(0x88),
        ReasonCode::ServerBusy => SessionError::Refused(0x89),
        _ => SessionError::Refused(0x80),
    }
}

/// [`MessagingClient`] backed by rust-mqtt. Borrows four caller-owned
/// buffers (socket rx/tx plus client write/recv scratch) for its whole
/// lifetime; see the module docs for the replacement protocol.
pub struct MqttSession<'d> {
    stack: Stack<'d>,
    socket: Option<TcpSocket<'d>>,
    client: Option<MqttClient<'d, TcpSocket<'d>, 5, CountingRng>>,
    write_buf: Option<&'d mut [u8]>,
    recv_buf: Option<&'d mut [u8]>,
    last_comms: Instant,
    poisoned: bool,
}

impl<'d> MqttSession<'d> {
    pub fn new(
        stack: Stack<'d>,
        rx_buf: &'d mut [u8],
        tx_buf: &'d mut [u8],
        write_buf: &'d mut [u8],
        recv_buf: &'d mut [u8],
    ) -> Self {
        Self {
            stack,
            socket: Some(TcpSocket::new(stack, rx_buf, tx_buf)),
            client: None,
            write_buf: Some(write_buf),
            recv_buf: Some(recv_buf),
            last_comms: Instant::now(),
            poisoned: false,
        }
    }

    /// True once any error has consumed the socket or buffers. The session
    /// cannot connect again; replace it.
    pub fn poisoned(&self) -> bool {
        self.poisoned
    }
}

impl MessagingClient for MqttSession<'_> {
    async fn open(&mut self) -> Result<(), SessionError> {
        if self.poisoned {
            return Err(SessionError::Network);
        }
        // DHCP readiness folds into session establishment: the transport
        // layer only tracks association.
        if !self.stack.is_link_up() || self.stack.config_v4().is_none() {
            debug!("mqtt open deferred: no ipv4 config yet");
            return Err(SessionError::Network);
        }

        let Some(mut socket) = self.socket.take() else {
            return Err(SessionError::Network);
        };
        socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));
        if let Err(err) = socket.connect((MQTT_BROKER_ADDR, MQTT_BROKER_PORT)).await {
            debug!("broker tcp connect failed: {:?}", err);
            socket.abort();
            // The socket survives a failed connect; keep it for the retry.
            self.socket = Some(socket);
            return Err(SessionError::Network);
        }

        let (Some(write_buf), Some(recv_buf)) = (self.write_buf.take(), self.recv_buf.take())
        else {
            self.poisoned = true;
            return Err(SessionError::Network);
        };
        let write_len = write_buf.len();
        let recv_len = recv_buf.len();

        let mut config: ClientConfig<'_, 5, CountingRng> =
            ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
        config.add_client_id(DEVICE_ID);
        config.add_max_subscribe_qos(QualityOfService::QoS1);
        config.keep_alive = MQTT_KEEP_ALIVE_SECS;
        config.max_packet_size = 256;

        let mut client = MqttClient::new(socket, write_buf, write_len, recv_buf, recv_len, config);
        match client.connect_to_broker().await {
            Ok(()) => {
                self.client = Some(client);
                self.last_comms = Instant::now();
                Ok(())
            }
            Err(code) => {
                warn!("broker handshake failed: {:?}", code);
                self.poisoned = true;
                Err(from_reason(code))
            }
        }
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        let Some(client) = self.client.as_mut() else {
            return Err(SessionError::Closed);
        };
        match client
            .send_message(topic, payload, QualityOfService::QoS0, false)
            .await
        {
            Ok(()) => {
                self.last_comms = Instant::now();
                Ok(())
            }
            Err(code) => {
                self.poisoned = true;
                Err(from_reason(code))
            }
        }
    }

    async fn service(&mut self) -> Result<(), SessionError> {
        let Some(client) = self.client.as_mut() else {
            return Err(SessionError::Closed);
        };
        // Ping at half the keepalive interval so a single missed response
        // still fits inside the broker's window.
        let due = Duration::from_secs(u64::from(MQTT_KEEP_ALIVE_SECS) / 2);
        if Instant::now().duration_since(self.last_comms) < due {
            return Ok(());
        }
        match client.send_ping().await {
            Ok(()) => {
                self.last_comms = Instant::now();
                Ok(())
            }
            Err(code) => {
                self.poisoned = true;
                Err(from_reason(code))
            }
        }
    }
}
