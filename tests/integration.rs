//! End-to-end scenarios over the host-side doubles: boot without network,
//! recover connectivity, and publish a press/release pair.

use embassy_futures::block_on;

use pad2mqtt::config::TRANSPORT_STARTUP_ATTEMPTS;
use pad2mqtt::io::mock::{FakeSession, FakeTransport, FrameLog, QueuedEdges};
use pad2mqtt::io::EdgeSnapshot;
use pad2mqtt::link::LinkState;
use pad2mqtt::panel::{Panel, PanelConfig};
use pad2mqtt::view::{DrawOp, LinkBadge};

fn badge_of(display: &FrameLog) -> Option<LinkBadge> {
    display.last.iter().find_map(|op| match op {
        DrawOp::Badge(badge) => Some(*badge),
        _ => None,
    })
}

fn number_of(display: &FrameLog) -> Option<u8> {
    display.last.iter().find_map(|op| match op {
        DrawOp::NumberPanel { value, .. } => Some(*value),
        _ => None,
    })
}

#[test]
fn offline_boot_then_recovery_then_press_release() {
    let mut panel = Panel::new(PanelConfig::default());
    let mut buttons = QueuedEdges::new();
    let mut transport = FakeTransport::default();
    let mut session = FakeSession::default();
    let mut display = FrameLog::default();

    // Boot with no network in range: bring-up exhausts its attempt limit
    // and the panel comes up in degraded mode showing number 1.
    let up = block_on(panel.startup(&mut transport, &mut display));
    assert!(!up);
    assert_eq!(transport.attempts, TRANSPORT_STARTUP_ATTEMPTS);
    assert_eq!(panel.link_state(), LinkState::Disconnected);
    assert_eq!(badge_of(&display), Some(LinkBadge::TransportDown));
    assert_eq!(number_of(&display), Some(1));

    // Selection still works offline; decrement wraps to 99.
    buttons.push(EdgeSnapshot {
        select_prev: true,
        ..Default::default()
    });
    block_on(panel.tick(0, &mut buttons, &mut transport, &mut session, &mut display));
    assert_eq!(panel.selection(), 99);
    assert_eq!(number_of(&display), Some(99));

    // A press while disconnected is dropped, not queued.
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
    assert!(session.published.is_empty());

    // The radio associates on its own: one tick promotes the transport,
    // the session opens and the status announcement goes out.
    transport.up = true;
    block_on(panel.tick(30, &mut buttons, &mut transport, &mut session, &mut display));
    assert_eq!(panel.link_state(), LinkState::SessionUp);
    assert_eq!(badge_of(&display), Some(LinkBadge::Connected));
    assert_eq!(session.published.len(), 1);
    assert_eq!(session.published[0].0.as_str(), "panel/pad2mqtt-01/status");
    assert_eq!(session.published[0].1.as_str(), "connected");
    session.published.clear();

    // Press/release on the selected number publishes exactly one pair.
    buttons.push(EdgeSnapshot {
        send_pressed: true,
        ..Default::default()
    });
    buttons.push(EdgeSnapshot {
        send_released: true,
        ..Default::default()
    });
    block_on(panel.tick(40, &mut buttons, &mut transport, &mut session, &mut display));
    block_on(panel.tick(50, &mut buttons, &mut transport, &mut session, &mut display));

    assert_eq!(session.published.len(), 2);
    assert_eq!(session.published[0].0.as_str(), "panel/button/99/state");
    assert_eq!(session.published[0].1.as_str(), "pressed");
    assert_eq!(session.published[1].0.as_str(), "panel/button/99/state");
    assert_eq!(session.published[1].1.as_str(), "released");
}

#[test]
fn transport_loss_mid_press_swallows_the_release() {
    let mut panel = Panel::new(PanelConfig::default());
    let mut buttons = QueuedEdges::new();
    let mut transport = FakeTransport {
        up: true,
        ..Default::default()
    };
    let mut session = FakeSession::default();
    let mut display = FrameLog::default();

    block_on(panel.tick(0, &mut buttons, &mut transport, &mut session, &mut display));
    assert_eq!(panel.link_state(), LinkState::SessionUp);
    session.published.clear();

    buttons.push(EdgeSnapshot {
        send_pressed: true,
        ..Default::default()
    });
    block_on(panel.tick(10, &mut buttons, &mut transport, &mut session, &mut display));
    assert_eq!(session.published.len(), 1);
    assert_eq!(session.published[0].1.as_str(), "pressed");

    // Wireless drops before the release: the release half is dropped and
    // the badge falls back immediately.
    transport.up = false;
    buttons.push(EdgeSnapshot {
        send_released: true,
        ..Default::default()
    });
    block_on(panel.tick(20, &mut buttons, &mut transport, &mut session, &mut display));

    assert_eq!(session.published.len(), 1);
    assert_eq!(panel.link_state(), LinkState::Disconnected);
    assert_eq!(badge_of(&display), Some(LinkBadge::TransportDown));
}

#[test]
fn startup_with_network_reports_progress_then_connects() {
    let mut panel = Panel::new(PanelConfig::default());
    let mut transport = FakeTransport {
        succeed_after: Some(5),
        ..Default::default()
    };
    let mut session = FakeSession::default();
    let mut display = FrameLog::default();

    let boot_frames_before = display.frames;
    let up = block_on(panel.startup(&mut transport, &mut display));
    assert!(up);
    // One boot-progress frame per attempt plus the first full redraw.
    assert_eq!(display.frames - boot_frames_before, 5 + 1);
    assert_eq!(panel.link_state(), LinkState::TransportUp);
    assert_eq!(badge_of(&display), Some(LinkBadge::SessionDown));

    let mut buttons = QueuedEdges::new();
    block_on(panel.tick(0, &mut buttons, &mut transport, &mut session, &mut display));
    assert_eq!(panel.link_state(), LinkState::SessionUp);
}
