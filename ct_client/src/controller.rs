//! Turns operator input into tracker requests.
//!
//! Shared by the TUI and the headless loop so both front ends behave the
//! same way, including the confirmation step before a new game.

use crate::{
    commands::{Command, is_confirmation, parse_command},
    render::{CellView, mode_label},
};
use card_tracker::{
    reader::ChannelId,
    table::{
        LayoutChangeNotification, PresentationMode, TagOutcome, TrackerHandle, TrackerResponse,
        TrackerResult,
    },
};

/// Result of one line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Request went through.
    Ack(String),
    /// Needs the operator's attention, e.g. a confirmation prompt.
    Alert(String),
    Error(String),
    /// Nothing to report beyond the layout notification that follows.
    Silent,
    ShowHelp,
    Quit,
}

pub struct Controller {
    tracker: TrackerHandle,
    awaiting_new_game_confirmation: bool,
}

impl Controller {
    pub fn new(tracker: TrackerHandle) -> Self {
        Self {
            tracker,
            awaiting_new_game_confirmation: false,
        }
    }

    pub fn tracker(&self) -> &TrackerHandle {
        &self.tracker
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_new_game_confirmation
    }

    /// Handle one line of operator input.
    pub async fn handle_input(&mut self, input: &str) -> Reply {
        if self.awaiting_new_game_confirmation {
            self.awaiting_new_game_confirmation = false;
            if !is_confirmation(input) {
                return Reply::Ack("New game cancelled".to_string());
            }
            return match self.tracker.reset_session().await {
                Ok(response) => reply_for(response, || "New game started at hand 1".to_string()),
                Err(e) => Reply::Error(e.to_string()),
            };
        }

        match parse_command(input) {
            Ok(command) => self
                .execute(command)
                .await
                .unwrap_or_else(|e| Reply::Error(e.to_string())),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    async fn execute(&mut self, command: Command) -> TrackerResult<Reply> {
        let reply = match command {
            Command::Commit => match self.tracker.advance_hand().await? {
                TrackerResponse::HandAdvanced {
                    session_id,
                    hand_number,
                } => Reply::Ack(format!(
                    "Hand {} saved to session {session_id}, now on hand {hand_number}",
                    hand_number - 1
                )),
                other => reply_for(other, || "Hand saved".to_string()),
            },
            Command::Clear => {
                reply_for(self.tracker.clear_hand().await?, || "Table cleared".to_string())
            }
            Command::NewGame => {
                self.awaiting_new_game_confirmation = true;
                Reply::Alert("Start a new game at hand 1? (y/n)".to_string())
            }
            Command::Mode(requested) => {
                let mode = match requested {
                    Some(mode) => mode,
                    None => self.tracker.get_snapshot().await?.mode.toggled(),
                };
                reply_for(self.tracker.set_presentation_mode(mode).await?, || {
                    mode_label(mode).to_string()
                })
            }
            Command::Tag(tag) => {
                match self.tracker.on_tag_event(ChannelId::keyboard(), tag.clone()).await? {
                    TagOutcome::Placed { .. } => Reply::Silent,
                    TagOutcome::Duplicate => {
                        Reply::Alert(format!("Tag {} is already on the table", tag.as_str()))
                    }
                    TagOutcome::TableFull => {
                        Reply::Alert(format!("Table is full, tag {} ignored", tag.as_str()))
                    }
                }
            }
            Command::Help => Reply::ShowHelp,
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }
}

fn reply_for(response: TrackerResponse, ack: impl FnOnce() -> String) -> Reply {
    match response.error_message() {
        Some(msg) => Reply::Error(msg),
        None => Reply::Ack(ack()),
    }
}

/// History line for a notification. Private cards stay hidden in player mode.
pub fn describe_notification(
    notification: &LayoutChangeNotification,
    mode: PresentationMode,
) -> String {
    match notification {
        LayoutChangeNotification::SlotFilled {
            channel,
            tag,
            slot,
            card,
        } => {
            let cell = CellView::new(slot.region, Some(card), mode);
            format!("{slot} <- {cell} (tag {} on {channel})", tag.as_str())
        }
        LayoutChangeNotification::HandCleared => "Table cleared".to_string(),
        LayoutChangeNotification::HandAdvanced { hand_number } => {
            format!("HAND {hand_number}")
        }
        LayoutChangeNotification::SessionReset => "New session, HAND 1".to_string(),
        LayoutChangeNotification::ModeChanged(mode) => mode_label(*mode).to_string(),
    }
}
