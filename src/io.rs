//! Capability interfaces between the core and the hardware.
//!
//! The platform layer implements these over esp-hal GPIO, esp-radio WiFi,
//! rust-mqtt and the TFT driver; host tests drive the core with the doubles
//! in [`mock`].

use crate::error::SessionError;
use crate::view::DrawOp;

/// One tick's worth of debounced button edges.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EdgeSnapshot {
    /// Rising edge on the left (number down) button.
    pub select_prev: bool,
    /// Rising edge on the right (number up) button.
    pub select_next: bool,
    /// Rising edge on the send button.
    pub send_pressed: bool,
    /// Falling edge on the send button.
    pub send_released: bool,
}

/// Debounced button edge source, polled once per tick.
pub trait ButtonEdgeSource {
    fn poll(&mut self) -> EdgeSnapshot;
}

/// Underlying link connectivity (wireless association), independent of the
/// messaging session on top of it.
pub trait TransportLink {
    /// One bounded association attempt. Implementations pace themselves
    /// (roughly [`crate::config::TRANSPORT_ATTEMPT_WINDOW_MS`] per call).
    async fn attempt(&mut self) -> bool;

    /// Current link status as reported by the radio.
    fn is_up(&self) -> bool;
}

/// Messaging session over an already-associated transport.
pub trait MessagingClient {
    /// Open the session (TCP + protocol handshake).
    async fn open(&mut self) -> Result<(), SessionError>;

    /// Best-effort publish; valid only while the session is up.
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError>;

    /// Keepalive and inbound dispatch; call once per tick while the session
    /// is up. An error means the session dropped.
    async fn service(&mut self) -> Result<(), SessionError>;
}

/// Executes a rendered frame on a concrete display.
pub trait FrameRenderer {
    fn render(&mut self, ops: &[DrawOp]);
}

pub mod mock {
    //! No-hardware doubles used by host tests and early board bring-up.

    use heapless::{Deque, String, Vec};

    use super::{ButtonEdgeSource, EdgeSnapshot, FrameRenderer, MessagingClient, TransportLink};
    use crate::error::SessionError;
    use crate::view::DrawOp;

    /// Replays queued edge snapshots, then reports idle input.
    #[derive(Debug, Default)]
    pub struct QueuedEdges {
        queue: Deque<EdgeSnapshot, 16>,
    }

    impl QueuedEdges {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&mut self, snapshot: EdgeSnapshot) {
            let _ = self.queue.push_back(snapshot);
        }
    }

    impl ButtonEdgeSource for QueuedEdges {
        fn poll(&mut self) -> EdgeSnapshot {
            self.queue.pop_front().unwrap_or_default()
        }
    }

    /// Transport whose association status is scripted by the test.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        pub up: bool,
        pub attempts: u32,
        /// Attempt number (1-based) at which association succeeds;
        /// `None` keeps the link down forever.
        pub succeed_after: Option<u32>,
    }

    impl TransportLink for FakeTransport {
        async fn attempt(&mut self) -> bool {
            self.attempts += 1;
            if let Some(n) = self.succeed_after {
                if self.attempts >= n {
                    self.up = true;
                }
            }
            self.up
        }

        fn is_up(&self) -> bool {
            self.up
        }
    }

    /// Session double recording every publish it accepts.
    #[derive(Debug)]
    pub struct FakeSession {
        /// Whether `open` succeeds.
        pub accept: bool,
        pub open_attempts: u32,
        /// Result returned by each `service` call.
        pub service_result: Result<(), SessionError>,
        pub published: Vec<(String<64>, String<16>), 16>,
    }

    impl Default for FakeSession {
        fn default() -> Self {
            Self {
                accept: true,
                open_attempts: 0,
                service_result: Ok(()),
                published: Vec::new(),
            }
        }
    }

    impl MessagingClient for FakeSession {
        async fn open(&mut self) -> Result<(), SessionError> {
            self.open_attempts += 1;
            if self.accept {
                Ok(())
            } else {
                Err(SessionError::Refused(0x80))
            }
        }

        async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
            let mut t: String<64> = String::new();
            let _ = t.push_str(topic);
            let mut p: String<16> = String::new();
            let _ = p.push_str(core::str::from_utf8(payload).unwrap_or("<binary>"));
            let _ = self.published.push((t, p));
            Ok(())
        }

        async fn service(&mut self) -> Result<(), SessionError> {
            self.service_result
        }
    }

    /// Frame sink counting redraws and keeping the most recent frame.
    #[derive(Debug, Default)]
    pub struct FrameLog {
        pub frames: u32,
        pub last: Vec<DrawOp, 8>,
    }

    impl FrameRenderer for FrameLog {
        fn render(&mut self, ops: &[DrawOp]) {
            self.frames += 1;
            self.last = Vec::from_slice(ops).unwrap_or_default();
        }
    }
}
