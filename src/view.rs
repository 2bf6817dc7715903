//! Deterministic frame description.
//!
//! [`render`] is a pure function from panel state to a fixed-order sequence
//! of draw operations; the platform's [`crate::io::FrameRenderer`] turns
//! them into pixels. Frames are produced only on explicit state-change
//! triggers, never on a timer, so the display cannot flicker.

use heapless::Vec;

use crate::link::LinkState;
use crate::topic;

pub const TITLE: &str = "PAD2MQTT";

/// Three-way connectivity badge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkBadge {
    TransportDown,
    SessionDown,
    Connected,
}

impl From<LinkState> for LinkBadge {
    fn from(state: LinkState) -> Self {
        match state {
            LinkState::Disconnected => LinkBadge::TransportDown,
            LinkState::TransportUp => LinkBadge::SessionDown,
            LinkState::SessionUp => LinkBadge::Connected,
        }
    }
}

/// Snapshot of everything the display depends on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ViewState {
    pub selection: u8,
    pub link: LinkState,
    /// True while a press is outstanding; swaps the number panel for its
    /// highlighted variant.
    pub send_active: bool,
}

/// One display primitive. The order within a frame is fixed; `Clear` always
/// comes first so a frame is a full redraw.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrawOp {
    Clear,
    Title(&'static str),
    Badge(LinkBadge),
    /// Left/right navigation affordances.
    NavHints,
    /// Large central panel showing the selection; `active` renders the
    /// highlighted send feedback variant.
    NumberPanel { value: u8, active: bool },
    /// Static labels for the three physical keys.
    KeyLegend,
    /// Live topic string for the current selection.
    TopicLine(heapless::String<64>),
    /// Startup progress counter while the transport is brought up.
    BootProgress { attempt: u32, limit: u32 },
}

/// Full redraw for the normal panel screen.
pub fn render(state: &ViewState, prefix: &str) -> Vec<DrawOp, 8> {
    let mut ops = Vec::new();
    let _ = ops.push(DrawOp::Clear);
    let _ = ops.push(DrawOp::Title(TITLE));
    let _ = ops.push(DrawOp::Badge(state.link.into()));
    let _ = ops.push(DrawOp::NavHints);
    let _ = ops.push(DrawOp::NumberPanel {
        value: state.selection,
        active: state.send_active,
    });
    let _ = ops.push(DrawOp::KeyLegend);
    let _ = ops.push(DrawOp::TopicLine(topic::state_topic(
        prefix,
        state.selection,
    )));
    ops
}

/// Startup screen shown while the transport bring-up loop runs.
pub fn render_boot(attempt: u32, limit: u32) -> Vec<DrawOp, 8> {
    let mut ops = Vec::new();
    let _ = ops.push(DrawOp::Clear);
    let _ = ops.push(DrawOp::Title(TITLE));
    let _ = ops.push(DrawOp::BootProgress { attempt, limit });
    ops
}
