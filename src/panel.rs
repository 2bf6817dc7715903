//! The control loop: one state bundle, ticked at a fixed cadence.
//!
//! `Panel` owns selection, press latch and link state, and drives them
//! against the capability interfaces in a fixed intra-tick order so that
//! simultaneous button edges resolve deterministically.

use log::{info, warn};

use crate::config::{DEVICE_ID, TOPIC_PREFIX, TRANSPORT_STARTUP_ATTEMPTS};
use crate::io::{ButtonEdgeSource, FrameRenderer, MessagingClient, TransportLink};
use crate::link::{LinkEvent, LinkManager, LinkState};
use crate::press::PressTracker;
use crate::selector::Selector;
use crate::topic::{self, PAYLOAD_CONNECTED, PAYLOAD_PRESSED, PAYLOAD_RELEASED};
use crate::view::{self, ViewState};

/// The slice of the startup configuration the core consumes.
#[derive(Clone, Copy, Debug)]
pub struct PanelConfig {
    pub topic_prefix: &'static str,
    pub device_id: &'static str,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            topic_prefix: TOPIC_PREFIX,
            device_id: DEVICE_ID,
        }
    }
}

pub struct Panel {
    config: PanelConfig,
    selector: Selector,
    press: PressTracker,
    link: LinkManager,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            selector: Selector::new(),
            press: PressTracker::new(),
            link: LinkManager::new(),
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn selection(&self) -> u8 {
        self.selector.value()
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            selection: self.selector.value(),
            link: self.link.state(),
            send_active: self.press.is_held(),
        }
    }

    /// One-time blocking boot: bounded transport bring-up with a coarse
    /// progress display, then the first full redraw.
    pub async fn startup<T, F>(&mut self, transport: &mut T, display: &mut F) -> bool
    where
        T: TransportLink,
        F: FrameRenderer,
    {
        let up = self
            .link
            .bring_up(transport, |attempt| {
                display.render(&view::render_boot(attempt, TRANSPORT_STARTUP_ATTEMPTS));
            })
            .await;
        display.render(&view::render(&self.view(), self.config.topic_prefix));
        up
    }

    /// One cooperative tick. Fixed order: input snapshot, connectivity
    /// maintenance (reconnect + session service), then decrement,
    /// increment, press and release edges; a single full redraw at the end
    /// if anything changed.
    pub async fn tick<B, T, M, F>(
        &mut self,
        now_ms: u64,
        buttons: &mut B,
        transport: &mut T,
        session: &mut M,
        display: &mut F,
    ) where
        B: ButtonEdgeSource,
        T: TransportLink,
        M: MessagingClient,
        F: FrameRenderer,
    {
        let edges = buttons.poll();
        let mut dirty = false;

        match self.link.poll(now_ms, transport, session).await {
            LinkEvent::Unchanged => {}
            LinkEvent::Changed => dirty = true,
            LinkEvent::SessionEstablished => {
                self.announce(session).await;
                dirty = true;
            }
        }

        if edges.select_prev {
            self.selector.decrement();
            info!("selection: {}", self.selector.value());
            dirty = true;
        }
        if edges.select_next {
            self.selector.increment();
            info!("selection: {}", self.selector.value());
            dirty = true;
        }
        if edges.send_pressed {
            let value = self.press.begin(self.selector.value());
            self.publish_state(session, value, PAYLOAD_PRESSED).await;
            dirty = true;
        }
        if edges.send_released {
            if let Some(value) = self.press.finish() {
                self.publish_state(session, value, PAYLOAD_RELEASED).await;
                dirty = true;
            }
        }

        if dirty {
            display.render(&view::render(&self.view(), self.config.topic_prefix));
        }
    }

    /// Status announcement, once per successful session establishment.
    async fn announce<M: MessagingClient>(&self, session: &mut M) {
        let status = topic::status_topic(self.config.topic_prefix, self.config.device_id);
        match session.publish(&status, PAYLOAD_CONNECTED.as_bytes()).await {
            Ok(()) => info!("{} -> {}", status, PAYLOAD_CONNECTED),
            Err(err) => warn!("status publish failed: {}", err),
        }
    }

    /// Best-effort event publish. Anything sent while the session is down
    /// is dropped on the floor by design; there is no queueing.
    async fn publish_state<M: MessagingClient>(&self, session: &mut M, value: u8, payload: &str) {
        if !self.link.is_session_up() {
            info!("dropped: button {} {} (session down)", value, payload);
            return;
        }
        let state = topic::state_topic(self.config.topic_prefix, value);
        match session.publish(&state, payload.as_bytes()).await {
            Ok(()) => info!("{} -> {}", state, payload),
            Err(err) => warn!("publish failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::io::mock::{FakeSession, FakeTransport, FrameLog, QueuedEdges};
    use crate::io::EdgeSnapshot;
    use crate::view::DrawOp;

    fn fixture() -> (Panel, QueuedEdges, FakeTransport, FakeSession, FrameLog) {
        (
            Panel::new(PanelConfig::default()),
            QueuedEdges::new(),
            FakeTransport::default(),
            FakeSession::default(),
            FrameLog::default(),
        )
    }

    fn connect(
        panel: &mut Panel,
        transport: &mut FakeTransport,
        session: &mut FakeSession,
        display: &mut FrameLog,
    ) {
        transport.up = true;
        let mut idle = QueuedEdges::new();
        block_on(panel.tick(0, &mut idle, transport, session, display));
        assert_eq!(panel.link_state(), LinkState::SessionUp);
        session.published.clear();
    }

    #[test]
    fn idle_tick_does_not_redraw() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        connect(&mut panel, &mut transport, &mut session, &mut display);
        let frames = display.frames;
        block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));
        assert_eq!(display.frames, frames);
    }

    #[test]
    fn session_establishment_announces_status() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        transport.up = true;
        block_on(panel.tick(0, &mut buttons, &mut transport, &mut session, &mut display));
        assert_eq!(session.published.len(), 1);
        let (topic, payload) = &session.published[0];
        assert_eq!(topic.as_str(), "panel/pad2mqtt-01/status");
        assert_eq!(payload.as_str(), "connected");
        // Connectivity changed, so the frame shows the connected badge.
        assert!(display
            .last
            .iter()
            .any(|op| matches!(op, DrawOp::Badge(crate::view::LinkBadge::Connected))));
    }

    #[test]
    fn press_and_release_publish_one_pair() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        connect(&mut panel, &mut transport, &mut session, &mut display);

        buttons.push(EdgeSnapshot {
            send_pressed: true,
            ..Default::default()
        });
        buttons.push(EdgeSnapshot {
            send_released: true,
            ..Default::default()
        });
        block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));
        block_on(panel.tick(20, &mut buttons, &mut transport, &mut session, &mut display));

        assert_eq!(session.published.len(), 2);
        assert_eq!(session.published[0].0.as_str(), "panel/button/1/state");
        assert_eq!(session.published[0].1.as_str(), "pressed");
        assert_eq!(session.published[1].0.as_str(), "panel/button/1/state");
        assert_eq!(session.published[1].1.as_str(), "released");
    }

    #[test]
    fn release_publishes_the_value_captured_at_press_time() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        connect(&mut panel, &mut transport, &mut session, &mut display);

        buttons.push(EdgeSnapshot {
            send_pressed: true,
            ..Default::default()
        });
        buttons.push(EdgeSnapshot {
            select_next: true,
            ..Default::default()
        });
        buttons.push(EdgeSnapshot {
            send_released: true,
            ..Default::default()
        });
        for now in [10, 20, 30] {
            block_on(panel.tick(now, &mut buttons, &mut transport, &mut session, &mut display));
        }

        assert_eq!(panel.selection(), 2);
        assert_eq!(session.published.len(), 2);
        // Both halves of the pair stay on the topic captured at press time.
        assert_eq!(session.published[0].0.as_str(), "panel/button/1/state");
        assert_eq!(session.published[1].0.as_str(), "panel/button/1/state");
    }

    #[test]
    fn spurious_release_publishes_nothing() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        connect(&mut panel, &mut transport, &mut session, &mut display);

        buttons.push(EdgeSnapshot {
            send_released: true,
            ..Default::default()
        });
        block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));
        assert!(session.published.is_empty());
    }

    #[test]
    fn publish_is_gated_on_session_up() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        // Transport up but broker refusing: link stays on TransportUp.
        transport.up = true;
        session.accept = false;
        block_on(panel.tick(0, &mut buttons, &mut transport, &mut session, &mut display));
        assert_eq!(panel.link_state(), LinkState::TransportUp);

        buttons.push(EdgeSnapshot {
            send_pressed: true,
            ..Default::default()
        });
        block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));

        assert!(session.published.is_empty());
        assert_eq!(panel.link_state(), LinkState::TransportUp);
        // The overlay still gives local feedback for the held press.
        assert!(display
            .last
            .iter()
            .any(|op| matches!(op, DrawOp::NumberPanel { active: true, .. })));
    }

    #[test]
    fn simultaneous_edges_resolve_in_fixed_order() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        connect(&mut panel, &mut transport, &mut session, &mut display);

        // Decrement, increment and press arrive within the same tick:
        // 1 -> 99 -> 1, then the press captures 1.
        buttons.push(EdgeSnapshot {
            select_prev: true,
            select_next: true,
            send_pressed: true,
            ..Default::default()
        });
        block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));

        assert_eq!(panel.selection(), 1);
        assert_eq!(session.published.len(), 1);
        assert_eq!(session.published[0].0.as_str(), "panel/button/1/state");
    }

    #[test]
    fn selection_change_triggers_redraw_with_live_topic() {
        let (mut panel, mut buttons, mut transport, mut session, mut display) = fixture();
        connect(&mut panel, &mut transport, &mut session, &mut display);

        buttons.push(EdgeSnapshot {
            select_prev: true,
            ..Default::default()
        });
        let frames = display.frames;
        block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));

        assert_eq!(panel.selection(), 99);
        assert_eq!(display.frames, frames + 1);
        assert!(display.last.iter().any(
            |op| matches!(op, DrawOp::TopicLine(topic) if topic.as_str() == "panel/button/99/state")
        ));
    }
}
