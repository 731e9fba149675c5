//! Session bookkeeping: hand counter, session identifier, presentation mode.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Groups the persisted hand records of one session.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn from_timestamp(timestamp: DateTime<Local>) -> Self {
        Self(timestamp.format("%Y%m%d_%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// How the front end renders private hands. Slot assignment never looks at
/// this.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Every card is shown.
    #[default]
    Manager,
    /// Private hands are concealed; the board is shown.
    Player,
}

impl PresentationMode {
    pub fn toggled(self) -> Self {
        match self {
            PresentationMode::Manager => PresentationMode::Player,
            PresentationMode::Player => PresentationMode::Manager,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationMode::Manager => write!(f, "manager"),
            PresentationMode::Player => write!(f, "player"),
        }
    }
}

/// Hand counter and lazily created session identifier.
#[derive(Debug, Clone)]
pub struct SessionState {
    hand_number: u32,
    session_id: Option<SessionId>,
    started_at: DateTime<Local>,
}

impl SessionState {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            hand_number: 1,
            session_id: None,
            started_at,
        }
    }

    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Identifier the next record is filed under: the current one, or one
    /// derived from the session start time if no hand has been recorded yet.
    /// Nothing is stored until [`SessionState::advance`].
    pub fn pending_session_id(&self) -> SessionId {
        self.session_id
            .clone()
            .unwrap_or_else(|| SessionId::from_timestamp(self.started_at))
    }

    /// Mark the current hand as recorded under `session_id` and move to the
    /// next hand, returning the new hand number.
    pub fn advance(&mut self, session_id: SessionId) -> u32 {
        self.session_id = Some(session_id);
        self.hand_number += 1;
        self.hand_number
    }

    /// Back to hand 1 with no session identifier. `restarted_at` becomes the
    /// basis of the next identifier.
    pub fn reset(&mut self, restarted_at: DateTime<Local>) {
        self.hand_number = 1;
        self.session_id = None;
        self.started_at = restarted_at;
    }
}
