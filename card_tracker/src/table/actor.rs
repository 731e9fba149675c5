//! Tracker actor implementation with async message handling.
//!
//! The actor is the only owner of the table and session state. Every tag
//! event and lifecycle operation is a message handled to completion before
//! the next one is read, which makes the dedup-check, lookup, scan and assign
//! sequence atomic with respect to both readers and the front end.

use super::{
    messages::{LayoutChangeNotification, TableSnapshot, TrackerMessage, TrackerResponse},
    session::{PresentationMode, SessionState},
    state::{TableState, TagOutcome},
};
use crate::{
    entities::TagId,
    history::HandRecorder,
    reader::ChannelId,
    registry::TagRegistry,
};
use chrono::Local;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Default inbox size for the tracker actor
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Errors talking to the tracker actor
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Tracker is closed")]
    Closed,
}

/// Result type for tracker handle operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Tracker actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TrackerHandle {
    sender: mpsc::Sender<TrackerMessage>,
}

impl TrackerHandle {
    /// Create a new tracker handle
    pub fn new(sender: mpsc::Sender<TrackerMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the tracker
    pub async fn send(&self, message: TrackerMessage) -> TrackerResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TrackerError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TrackerMessage,
    ) -> TrackerResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| TrackerError::Closed)
    }

    /// Dispatch a tag read from `channel`
    pub async fn on_tag_event(&self, channel: ChannelId, tag: TagId) -> TrackerResult<TagOutcome> {
        self.request(|response| TrackerMessage::TagEvent {
            channel,
            tag,
            response,
        })
        .await
    }

    /// Commit the current hand and move to the next one
    pub async fn advance_hand(&self) -> TrackerResult<TrackerResponse> {
        self.request(|response| TrackerMessage::AdvanceHand { response })
            .await
    }

    /// Start a new session. Callers are expected to have confirmed this with
    /// the operator; the tracker performs it unconditionally.
    pub async fn reset_session(&self) -> TrackerResult<TrackerResponse> {
        self.request(|response| TrackerMessage::ResetSession { response })
            .await
    }

    /// Empty all slots for a re-deal of the same hand
    pub async fn clear_hand(&self) -> TrackerResult<TrackerResponse> {
        self.request(|response| TrackerMessage::ClearHand { response })
            .await
    }

    pub async fn set_presentation_mode(
        &self,
        mode: PresentationMode,
    ) -> TrackerResult<TrackerResponse> {
        self.request(|response| TrackerMessage::SetPresentationMode { mode, response })
            .await
    }

    pub async fn get_snapshot(&self) -> TrackerResult<TableSnapshot> {
        self.request(|response| TrackerMessage::GetSnapshot { response })
            .await
    }

    /// Subscribe to layout change notifications. Notifications are dropped
    /// for a subscriber whose buffer is full.
    pub async fn subscribe(
        &self,
        capacity: usize,
    ) -> TrackerResult<mpsc::Receiver<LayoutChangeNotification>> {
        let (sender, receiver) = mpsc::channel(capacity);
        self.send(TrackerMessage::Subscribe { sender }).await?;
        Ok(receiver)
    }
}

/// Tracker actor owning the table for the whole session
pub struct TrackerActor {
    /// Slots and tags seen this hand
    table: TableState,

    /// Hand counter and session identifier
    session: SessionState,

    /// How private hands are rendered
    mode: PresentationMode,

    /// Tag to card lookup
    registry: Arc<dyn TagRegistry>,

    /// Where committed hands go
    recorder: Arc<dyn HandRecorder>,

    /// Message inbox
    inbox: mpsc::Receiver<TrackerMessage>,

    /// Subscribers for layout change notifications
    subscribers: Vec<mpsc::Sender<LayoutChangeNotification>>,
}

impl TrackerActor {
    /// Create a new tracker actor
    ///
    /// # Arguments
    ///
    /// * `registry` - Tag registry used to resolve reads
    /// * `recorder` - Hand history sink used on commit
    /// * `capacity` - Inbox size
    ///
    /// # Returns
    ///
    /// * `(TrackerActor, TrackerHandle)` - Actor and handle for sending messages
    pub fn new(
        registry: Arc<dyn TagRegistry>,
        recorder: Arc<dyn HandRecorder>,
        capacity: usize,
    ) -> (Self, TrackerHandle) {
        let (sender, inbox) = mpsc::channel(capacity.max(1));

        let actor = Self {
            table: TableState::new(),
            session: SessionState::new(Local::now()),
            mode: PresentationMode::default(),
            registry,
            recorder,
            inbox,
            subscribers: Vec::new(),
        };

        (actor, TrackerHandle::new(sender))
    }

    /// Spawn the actor on the current runtime and return its handle
    pub fn spawn(
        registry: Arc<dyn TagRegistry>,
        recorder: Arc<dyn HandRecorder>,
        capacity: usize,
    ) -> TrackerHandle {
        let (actor, handle) = Self::new(registry, recorder, capacity);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the tracker event loop until every handle is dropped
    pub async fn run(mut self) {
        log::info!("Tracker starting at hand {}", self.session.hand_number());

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
        }

        log::info!("Tracker stopped at hand {}", self.session.hand_number());
    }

    /// Handle a tracker message
    async fn handle_message(&mut self, message: TrackerMessage) {
        match message {
            TrackerMessage::TagEvent {
                channel,
                tag,
                response,
            } => {
                let result = self.handle_tag_event(channel, tag);
                let _ = response.send(result);
            }

            TrackerMessage::AdvanceHand { response } => {
                let result = self.advance_hand().await;
                let _ = response.send(result);
            }

            TrackerMessage::ResetSession { response } => {
                let result = self.reset_session();
                let _ = response.send(result);
            }

            TrackerMessage::ClearHand { response } => {
                let result = self.clear_hand();
                let _ = response.send(result);
            }

            TrackerMessage::SetPresentationMode { mode, response } => {
                let result = self.set_presentation_mode(mode);
                let _ = response.send(result);
            }

            TrackerMessage::GetSnapshot { response } => {
                let _ = response.send(self.snapshot());
            }

            TrackerMessage::Subscribe { sender } => {
                self.subscribers.push(sender);
            }
        }
    }

    /// Notify all subscribers, dropping closed ones
    fn notify(&mut self, notification: LayoutChangeNotification) {
        self.subscribers
            .retain(|sender| match sender.try_send(notification.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber channel full, dropping notification");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber disconnected, removing");
                    false
                }
            });
    }

    fn handle_tag_event(&mut self, channel: ChannelId, tag: TagId) -> TagOutcome {
        let outcome = self
            .table
            .handle_tag_event(tag.clone(), self.registry.as_ref());

        match &outcome {
            TagOutcome::Placed { slot, card } => {
                log::info!(
                    "Hand {}: {} -> {} from {} (tag {})",
                    self.session.hand_number(),
                    card,
                    slot,
                    channel,
                    tag
                );
                self.notify(LayoutChangeNotification::SlotFilled {
                    channel,
                    tag,
                    slot: *slot,
                    card: *card,
                });
            }
            TagOutcome::Duplicate => {
                log::debug!("Ignoring repeated tag {} from {}", tag, channel);
            }
            TagOutcome::TableFull => {
                log::debug!("Table full, dropping tag {} from {}", tag, channel);
            }
        }

        outcome
    }

    async fn advance_hand(&mut self) -> TrackerResponse {
        let session_id = self.session.pending_session_id();
        let committed = self.session.hand_number();

        if let Err(e) = self
            .recorder
            .append_record(&session_id, committed, self.table.current_layout())
            .await
        {
            log::error!("Failed to record hand {}: {}", committed, e);
            return TrackerResponse::Error(e.to_string());
        }

        let hand_number = self.session.advance(session_id.clone());
        self.table.clear_for_new_hand();
        log::info!(
            "Hand {} committed to session {}, now on hand {}",
            committed,
            session_id,
            hand_number
        );

        self.notify(LayoutChangeNotification::HandAdvanced { hand_number });
        TrackerResponse::HandAdvanced {
            session_id,
            hand_number,
        }
    }

    fn reset_session(&mut self) -> TrackerResponse {
        self.session.reset(Local::now());
        self.table.clear_for_new_hand();
        log::info!("Session reset");

        self.notify(LayoutChangeNotification::SessionReset);
        TrackerResponse::Success
    }

    fn clear_hand(&mut self) -> TrackerResponse {
        self.table.clear_for_new_hand();
        log::info!("Hand {} cleared", self.session.hand_number());

        self.notify(LayoutChangeNotification::HandCleared);
        TrackerResponse::Success
    }

    fn set_presentation_mode(&mut self, mode: PresentationMode) -> TrackerResponse {
        if self.mode != mode {
            self.mode = mode;
            log::info!("Presentation mode set to {}", mode);
            self.notify(LayoutChangeNotification::ModeChanged(mode));
        }
        TrackerResponse::Success
    }

    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            hand_number: self.session.hand_number(),
            session_id: self.session.session_id().cloned(),
            mode: self.mode,
            layout: self.table.current_layout().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        history::{HistoryError, HistoryResult, InMemoryHandLog},
        registry::TagDatabase,
        table::{
            layout::{Region, SlotLayout, SlotRef},
            session::SessionId,
        },
    };
    use async_trait::async_trait;

    struct FailingRecorder;

    #[async_trait]
    impl HandRecorder for FailingRecorder {
        async fn append_record(
            &self,
            _session_id: &SessionId,
            _hand_number: u32,
            _layout: &SlotLayout,
        ) -> HistoryResult<()> {
            Err(HistoryError::Rejected("disk full".to_string()))
        }
    }

    fn tag(s: &str) -> TagId {
        TagId::new(s).unwrap()
    }

    fn registry() -> Arc<dyn TagRegistry> {
        Arc::new(TagDatabase::from_json_str(r#"{"A1":"As","B2":"Kh"}"#).unwrap())
    }

    #[tokio::test]
    async fn test_tag_event_updates_snapshot() {
        let handle = TrackerActor::spawn(registry(), Arc::new(InMemoryHandLog::new()), 8);

        let outcome = handle
            .on_tag_event(ChannelId::new("left"), tag("A1"))
            .await
            .unwrap();
        assert!(outcome.is_placed());

        let snapshot = handle.get_snapshot().await.unwrap();
        assert_eq!(snapshot.hand_number, 1);
        assert_eq!(snapshot.filled_count(), 1);
        assert_eq!(snapshot.layout.region_codes(Region::P1), "As ?");
    }

    #[tokio::test]
    async fn test_subscriber_sees_slot_fill() {
        let handle = TrackerActor::spawn(registry(), Arc::new(InMemoryHandLog::new()), 8);
        let mut notifications = handle.subscribe(8).await.unwrap();

        handle
            .on_tag_event(ChannelId::new("right"), tag("B2"))
            .await
            .unwrap();

        match notifications.recv().await.unwrap() {
            LayoutChangeNotification::SlotFilled { slot, channel, .. } => {
                assert_eq!(slot, SlotRef::new(Region::P1, 0));
                assert_eq!(channel, ChannelId::new("right"));
            }
            other => panic!("unexpected notification {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_does_not_notify() {
        let handle = TrackerActor::spawn(registry(), Arc::new(InMemoryHandLog::new()), 8);
        let mut notifications = handle.subscribe(8).await.unwrap();

        handle
            .on_tag_event(ChannelId::new("left"), tag("A1"))
            .await
            .unwrap();
        let outcome = handle
            .on_tag_event(ChannelId::new("right"), tag("A1"))
            .await
            .unwrap();
        assert_eq!(outcome, TagOutcome::Duplicate);

        handle.clear_hand().await.unwrap();

        assert!(matches!(
            notifications.recv().await,
            Some(LayoutChangeNotification::SlotFilled { .. })
        ));
        assert_eq!(
            notifications.recv().await,
            Some(LayoutChangeNotification::HandCleared)
        );
    }

    #[tokio::test]
    async fn test_failed_record_keeps_hand() {
        let handle = TrackerActor::spawn(registry(), Arc::new(FailingRecorder), 8);
        handle
            .on_tag_event(ChannelId::new("left"), tag("A1"))
            .await
            .unwrap();

        let response = handle.advance_hand().await.unwrap();
        assert!(!response.is_success());
        assert!(response.error_message().unwrap().contains("disk full"));

        let snapshot = handle.get_snapshot().await.unwrap();
        assert_eq!(snapshot.hand_number, 1);
        assert_eq!(snapshot.filled_count(), 1);
        assert!(snapshot.session_id.is_none());
    }

    #[tokio::test]
    async fn test_mode_change_notifies_once() {
        let handle = TrackerActor::spawn(registry(), Arc::new(InMemoryHandLog::new()), 8);
        let mut notifications = handle.subscribe(8).await.unwrap();

        handle
            .set_presentation_mode(PresentationMode::Player)
            .await
            .unwrap();
        handle
            .set_presentation_mode(PresentationMode::Player)
            .await
            .unwrap();
        handle.clear_hand().await.unwrap();

        assert_eq!(
            notifications.recv().await,
            Some(LayoutChangeNotification::ModeChanged(
                PresentationMode::Player
            ))
        );
        assert_eq!(
            notifications.recv().await,
            Some(LayoutChangeNotification::HandCleared)
        );
        assert_eq!(
            handle.get_snapshot().await.unwrap().mode,
            PresentationMode::Player
        );
    }

    #[tokio::test]
    async fn test_handle_reports_closed_actor() {
        let (actor, handle) =
            TrackerActor::new(registry(), Arc::new(InMemoryHandLog::new()), 8);
        drop(actor);

        let err = handle.get_snapshot().await.unwrap_err();
        assert!(matches!(err, TrackerError::Closed));
    }
}
