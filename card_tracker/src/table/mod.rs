//! Table module: slot layout, tag dispatch, and session lifecycle.
//!
//! This module implements:
//! - SlotLayout: the nine fixed slots (P1 ×2, P2 ×2, BOARD ×5)
//! - TableState: dedup of tag reads and first-empty-slot assignment
//! - SessionState: hand counter and session identifier
//! - TrackerActor: async actor owning all of the above
//!
//! ## Architecture
//!
//! The tracker runs in a single Tokio task with an mpsc message inbox. Both
//! channel readers and the front end talk to it through a cloneable
//! TrackerHandle, so tag dispatch and lifecycle operations never interleave.
//!
//! ## Example
//!
//! ```
//! use card_tracker::{
//!     entities::TagId,
//!     history::InMemoryHandLog,
//!     reader::ChannelId,
//!     registry::TagDatabase,
//!     table::TrackerActor,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = TagDatabase::from_json_str(r#"{"A1": "As"}"#).unwrap();
//!     let handle = TrackerActor::spawn(Arc::new(registry), Arc::new(InMemoryHandLog::new()), 100);
//!
//!     let tag = TagId::new("A1").unwrap();
//!     handle.on_tag_event(ChannelId::new("left"), tag).await.unwrap();
//!
//!     let snapshot = handle.get_snapshot().await.unwrap();
//!     assert_eq!(snapshot.filled_count(), 1);
//! }
//! ```

pub mod actor;
pub mod layout;
pub mod messages;
pub mod session;
pub mod state;

pub use actor::{DEFAULT_INBOX_CAPACITY, TrackerActor, TrackerError, TrackerHandle, TrackerResult};
pub use layout::{FILL_ORDER, Region, SLOT_COUNT, SlotLayout, SlotRef};
pub use messages::{LayoutChangeNotification, TableSnapshot, TrackerMessage, TrackerResponse};
pub use session::{PresentationMode, SessionId, SessionState};
pub use state::{TableState, TagOutcome};
