//! Two-layer connectivity state machine.
//!
//! Layer one is the wireless transport (association), layer two the
//! messaging session on top of it. Startup blocks on a bounded transport
//! bring-up; afterwards session reconnects are throttled by a fixed
//! cooldown and the transport is only reused if the radio reassociates on
//! its own; there is no automatic transport retry after exhaustion.

use log::{debug, info, warn};

use crate::config::{SESSION_RETRY_COOLDOWN_MS, TRANSPORT_STARTUP_ATTEMPTS};
use crate::error::SessionError;
use crate::io::{MessagingClient, TransportLink};

/// Connectivity state. `SessionUp` implies the transport is up: transport
/// loss is checked before anything else on every poll and forces
/// `Disconnected` immediately, bypassing the cooldown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkState {
    Disconnected,
    TransportUp,
    SessionUp,
}

/// Outcome of one [`LinkManager::poll`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkEvent {
    Unchanged,
    Changed,
    /// The session just came up; the caller should emit the status
    /// announcement publish.
    SessionEstablished,
}

pub struct LinkManager {
    state: LinkState,
    /// `None` means a session attempt is due immediately (initial state,
    /// and reset again by every successful connect).
    last_attempt_ms: Option<u64>,
    last_error: Option<SessionError>,
}

impl LinkManager {
    pub const fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            last_attempt_ms: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_session_up(&self) -> bool {
        self.state == LinkState::SessionUp
    }

    /// Most recent session failure, for local diagnostics.
    pub fn last_error(&self) -> Option<SessionError> {
        self.last_error
    }

    /// Blocking startup transport bring-up, bounded at
    /// [`TRANSPORT_STARTUP_ATTEMPTS`]. `progress` is invoked before each
    /// attempt so the caller can draw a coarse counter. On exhaustion the
    /// panel continues in degraded mode for this boot cycle; the link is
    /// still picked up by [`poll`] if the radio associates later.
    pub async fn bring_up<T: TransportLink>(
        &mut self,
        transport: &mut T,
        mut progress: impl FnMut(u32),
    ) -> bool {
        for attempt in 1..=TRANSPORT_STARTUP_ATTEMPTS {
            progress(attempt);
            if transport.attempt().await {
                info!("transport up after {} attempt(s)", attempt);
                self.state = LinkState::TransportUp;
                return true;
            }
        }
        warn!(
            "transport unavailable after {} attempts; continuing offline",
            TRANSPORT_STARTUP_ATTEMPTS
        );
        false
    }

    /// Per-tick connectivity maintenance: transport loss detection, session
    /// keepalive while up, throttled session connect while down.
    pub async fn poll<T, M>(&mut self, now_ms: u64, transport: &mut T, session: &mut M) -> LinkEvent
    where
        T: TransportLink,
        M: MessagingClient,
    {
        let before = self.state;
        let mut established = false;

        if !transport.is_up() {
            if self.state != LinkState::Disconnected {
                warn!("transport lost");
            }
            self.state = LinkState::Disconnected;
        } else if self.state == LinkState::Disconnected {
            // The radio associated outside our control (e.g. on its own
            // after a degraded boot).
            info!("transport up");
            self.state = LinkState::TransportUp;
        }

        match self.state {
            LinkState::SessionUp => {
                if let Err(err) = session.service().await {
                    warn!("session lost: {}", err);
                    self.last_error = Some(err);
                    self.state = LinkState::TransportUp;
                }
            }
            LinkState::TransportUp => {
                if self.reconnect_due(now_ms) {
                    match session.open().await {
                        Ok(()) => {
                            info!("session up");
                            self.state = LinkState::SessionUp;
                            self.last_attempt_ms = None;
                            self.last_error = None;
                            established = true;
                        }
                        Err(err) => {
                            warn!("session connect failed: {}", err);
                            self.last_attempt_ms = Some(now_ms);
                            self.last_error = Some(err);
                        }
                    }
                }
            }
            LinkState::Disconnected => {}
        }

        if established {
            LinkEvent::SessionEstablished
        } else if self.state != before {
            debug!("link {:?} -> {:?}", before, self.state);
            LinkEvent::Changed
        } else {
            LinkEvent::Unchanged
        }
    }

    fn reconnect_due(&self, now_ms: u64) -> bool {
        match self.last_attempt_ms {
            None => true,
            Some(stamp) => now_ms.saturating_sub(stamp) > SESSION_RETRY_COOLDOWN_MS,
        }
    }
}

impl Default for LinkManager {
    fn default() -> Self {
        Self::new()
    }
}
