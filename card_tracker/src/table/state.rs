//! Table state and tag dispatch.

use super::layout::{SlotLayout, SlotRef};
use crate::{
    entities::{CardIdentity, TagId},
    registry::TagRegistry,
};
use serde::Serialize;
use std::collections::HashSet;

/// Result of dispatching a single tag read.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagOutcome {
    /// The tag's card was written into a slot.
    Placed { slot: SlotRef, card: CardIdentity },
    /// The tag was already consumed this hand.
    Duplicate,
    /// Every slot is taken; the read is dropped.
    TableFull,
}

impl TagOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, TagOutcome::Placed { .. })
    }
}

/// Slot layout plus the set of tags consumed in the current hand.
#[derive(Debug, Default)]
pub struct TableState {
    layout: SlotLayout,
    seen: HashSet<TagId>,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dedup, resolve, and place one tag. At most one slot changes per call.
    ///
    /// A tag dropped because the table is full is not remembered, so it can
    /// still be placed after the next clear.
    pub fn handle_tag_event(&mut self, tag: TagId, registry: &dyn TagRegistry) -> TagOutcome {
        if self.seen.contains(&tag) {
            return TagOutcome::Duplicate;
        }

        let card = CardIdentity::from(registry.lookup(&tag));

        let Some(slot) = self.layout.first_empty() else {
            return TagOutcome::TableFull;
        };

        if self.layout.fill(slot, card) {
            self.seen.insert(tag);
            TagOutcome::Placed { slot, card }
        } else {
            TagOutcome::TableFull
        }
    }

    pub fn current_layout(&self) -> &SlotLayout {
        &self.layout
    }

    pub fn clear_for_new_hand(&mut self) {
        self.layout = SlotLayout::new();
        self.seen.clear();
    }

    pub fn is_full(&self) -> bool {
        self.layout.is_full()
    }

    pub fn has_seen(&self, tag: &TagId) -> bool {
        self.seen.contains(tag)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
