//! Tracker actor message types.

use super::{
    layout::{SlotLayout, SlotRef},
    session::{PresentationMode, SessionId},
    state::TagOutcome,
};
use crate::{
    entities::{CardIdentity, TagId},
    reader::ChannelId,
};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

/// Messages that can be sent to a TrackerActor
#[derive(Debug)]
pub enum TrackerMessage {
    /// A tag was read on one of the input channels
    TagEvent {
        channel: ChannelId,
        tag: TagId,
        response: oneshot::Sender<TagOutcome>,
    },

    /// Commit the current layout and start the next hand
    AdvanceHand {
        response: oneshot::Sender<TrackerResponse>,
    },

    /// Back to hand 1 with a fresh session
    ResetSession {
        response: oneshot::Sender<TrackerResponse>,
    },

    /// Empty every slot without touching the hand counter
    ClearHand {
        response: oneshot::Sender<TrackerResponse>,
    },

    /// Switch how private hands are rendered
    SetPresentationMode {
        mode: PresentationMode,
        response: oneshot::Sender<TrackerResponse>,
    },

    /// Get current table snapshot
    GetSnapshot {
        response: oneshot::Sender<TableSnapshot>,
    },

    /// Subscribe to layout change notifications
    Subscribe {
        sender: mpsc::Sender<LayoutChangeNotification>,
    },
}

/// Notification sent when anything the front end renders has changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutChangeNotification {
    /// A tag filled a slot
    SlotFilled {
        channel: ChannelId,
        tag: TagId,
        slot: SlotRef,
        card: CardIdentity,
    },
    /// Slots were emptied without changing the hand
    HandCleared,
    /// Previous hand was committed
    HandAdvanced { hand_number: u32 },
    /// Session started over at hand 1
    SessionReset,
    /// Presentation mode changed
    ModeChanged(PresentationMode),
}

/// Response from lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerResponse {
    /// Operation succeeded
    Success,

    /// Hand committed under `session_id`; `hand_number` is the new hand
    HandAdvanced {
        session_id: SessionId,
        hand_number: u32,
    },

    /// Operation failed; state is unchanged
    Error(String),
}

impl TrackerResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TrackerResponse::Success | TrackerResponse::HandAdvanced { .. }
        )
    }

    /// Get error message if response is error
    pub fn error_message(&self) -> Option<String> {
        match self {
            TrackerResponse::Error(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

/// Everything the front end needs to draw the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    /// Current hand, starting at 1
    pub hand_number: u32,

    /// Identifier of the session's record file, once a hand was committed
    pub session_id: Option<SessionId>,

    /// How private hands are rendered
    pub mode: PresentationMode,

    /// Slot contents
    pub layout: SlotLayout,
}

impl TableSnapshot {
    pub fn filled_count(&self) -> usize {
        self.layout.filled_count()
    }

    pub fn is_full(&self) -> bool {
        self.layout.is_full()
    }
}
