//! # Card Tracker
//!
//! Tracks physical playing cards at a poker table from RFID tag reads.
//!
//! Two serial readers deliver tag identifiers, one per line. Each identifier
//! is resolved to a card through a registry and dropped into the next empty
//! slot of a fixed layout: two cards for each of two players, then a
//! five-card board. Repeated reads of the same tag within a hand are ignored.
//!
//! ## Core Modules
//!
//! - [`entities`]: Cards, card identities and tag identifiers
//! - [`registry`]: Tag to card lookup
//! - [`table`]: Slot layout, dispatch, session lifecycle and the tracker actor
//! - [`reader`]: Line-delimited channel readers
//! - [`history`]: Append-only record of committed hands
//!
//! ## Example
//!
//! ```
//! use card_tracker::{TableState, TagDatabase, entities::TagId, table::Region};
//!
//! let registry = TagDatabase::from_json_str(r#"{"A1": "As", "B2": "Kh"}"#).unwrap();
//! let mut table = TableState::new();
//!
//! for raw in ["A1", "B2", "A1"] {
//!     table.handle_tag_event(TagId::new(raw).unwrap(), &registry);
//! }
//! assert_eq!(table.current_layout().region_codes(Region::P1), "As Kh");
//! ```

pub mod entities;
pub mod history;
pub mod reader;
pub mod registry;
pub mod table;

pub use entities::{Card, CardIdentity, Suit, TagId};
pub use history::{FileHandLog, HandRecorder, InMemoryHandLog};
pub use reader::{ChannelEvent, ChannelEventKind, ChannelId, StreamReader};
pub use registry::{TagDatabase, TagRegistry};
pub use table::{
    PresentationMode, SlotLayout, TableSnapshot, TableState, TagOutcome, TrackerActor,
    TrackerHandle,
};
