//! Fixed slot layout: two private hands of two cards and a five-card board.

use crate::entities::CardIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named group of slots on the table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    P1,
    P2,
    Board,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::P1, Region::P2, Region::Board];

    pub const fn capacity(&self) -> usize {
        match self {
            Region::P1 | Region::P2 => 2,
            Region::Board => 5,
        }
    }

    /// Private hands are the regions hidden in player mode.
    pub const fn is_private(&self) -> bool {
        matches!(self, Region::P1 | Region::P2)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::P1 => write!(f, "P1"),
            Region::P2 => write!(f, "P2"),
            Region::Board => write!(f, "BOARD"),
        }
    }
}

/// Position of a single slot within the layout.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SlotRef {
    pub region: Region,
    pub index: usize,
}

impl SlotRef {
    pub const fn new(region: Region, index: usize) -> Self {
        Self { region, index }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.region, self.index)
    }
}

pub const SLOT_COUNT: usize = 9;

/// Order in which empty slots are filled as tags arrive.
pub const FILL_ORDER: [SlotRef; SLOT_COUNT] = [
    SlotRef::new(Region::P1, 0),
    SlotRef::new(Region::P1, 1),
    SlotRef::new(Region::P2, 0),
    SlotRef::new(Region::P2, 1),
    SlotRef::new(Region::Board, 0),
    SlotRef::new(Region::Board, 1),
    SlotRef::new(Region::Board, 2),
    SlotRef::new(Region::Board, 3),
    SlotRef::new(Region::Board, 4),
];

pub type Slot = Option<CardIdentity>;

/// The nine table slots. The shape is fixed; only slot contents change.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SlotLayout {
    p1: [Slot; 2],
    p2: [Slot; 2],
    board: [Slot; 5],
}

impl SlotLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, region: Region) -> &[Slot] {
        match region {
            Region::P1 => &self.p1,
            Region::P2 => &self.p2,
            Region::Board => &self.board,
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut [Slot] {
        match region {
            Region::P1 => &mut self.p1,
            Region::P2 => &mut self.p2,
            Region::Board => &mut self.board,
        }
    }

    pub fn get(&self, slot: SlotRef) -> Option<&CardIdentity> {
        self.region(slot.region)
            .get(slot.index)
            .and_then(Option::as_ref)
    }

    /// First empty slot in fill order, if any.
    pub fn first_empty(&self) -> Option<SlotRef> {
        FILL_ORDER
            .into_iter()
            .find(|&slot| self.get(slot).is_none())
    }

    /// Write a card into an empty slot. Returns `false` and leaves the layout
    /// untouched if the slot is already occupied.
    pub(crate) fn fill(&mut self, slot: SlotRef, card: CardIdentity) -> bool {
        match self.region_mut(slot.region).get_mut(slot.index) {
            Some(entry @ None) => {
                *entry = Some(card);
                true
            }
            _ => false,
        }
    }

    pub fn filled_count(&self) -> usize {
        FILL_ORDER
            .into_iter()
            .filter(|&slot| self.get(slot).is_some())
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.filled_count() == SLOT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Cards in fill order, `None` for empty slots.
    pub fn iter(&self) -> impl Iterator<Item = (SlotRef, Option<&CardIdentity>)> + '_ {
        FILL_ORDER.into_iter().map(|slot| (slot, self.get(slot)))
    }

    /// Space separated card codes for one region, `?` for empty slots.
    pub fn region_codes(&self, region: Region) -> String {
        self.region(region)
            .iter()
            .map(|slot| slot.map_or_else(|| "?".to_string(), |card| card.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SlotLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = Region::ALL
            .iter()
            .map(|region| format!("{region}: {}", self.region_codes(*region)))
            .collect::<Vec<_>>()
            .join(" | ");
        write!(f, "{repr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Card, Suit};

    #[test]
    fn test_layout_has_nine_slots() {
        let total: usize = Region::ALL.iter().map(Region::capacity).sum();
        assert_eq!(total, SLOT_COUNT);
        assert_eq!(FILL_ORDER.len(), SLOT_COUNT);
    }

    #[test]
    fn test_new_layout_is_empty() {
        let layout = SlotLayout::new();
        assert!(layout.is_empty());
        assert!(!layout.is_full());
        assert_eq!(layout.first_empty(), Some(SlotRef::new(Region::P1, 0)));
    }

    #[test]
    fn test_fill_refuses_occupied_slot() {
        let mut layout = SlotLayout::new();
        let slot = SlotRef::new(Region::P2, 1);
        let ace = CardIdentity::Known(Card(14, Suit::Spade));

        assert!(layout.fill(slot, ace));
        assert!(!layout.fill(slot, CardIdentity::Unknown));
        assert_eq!(layout.get(slot), Some(&ace));
    }

    #[test]
    fn test_fill_out_of_range_index() {
        let mut layout = SlotLayout::new();
        assert!(!layout.fill(SlotRef::new(Region::P1, 2), CardIdentity::Unknown));
        assert!(layout.is_empty());
    }

    #[test]
    fn test_first_empty_skips_filled_slots() {
        let mut layout = SlotLayout::new();
        layout.fill(SlotRef::new(Region::P1, 0), CardIdentity::Unknown);
        layout.fill(SlotRef::new(Region::P1, 1), CardIdentity::Unknown);
        assert_eq!(layout.first_empty(), Some(SlotRef::new(Region::P2, 0)));
    }

    #[test]
    fn test_full_layout() {
        let mut layout = SlotLayout::new();
        for slot in FILL_ORDER {
            assert!(layout.fill(slot, CardIdentity::Unknown));
        }
        assert!(layout.is_full());
        assert_eq!(layout.first_empty(), None);
    }

    #[test]
    fn test_display_uses_placeholders() {
        let mut layout = SlotLayout::new();
        layout.fill(
            SlotRef::new(Region::Board, 0),
            CardIdentity::Known(Card(10, Suit::Spade)),
        );
        assert_eq!(layout.region_codes(Region::Board), "Ts ? ? ? ?");
        assert_eq!(
            layout.to_string(),
            "P1: ? ? | P2: ? ? | BOARD: Ts ? ? ? ?"
        );
    }
}
