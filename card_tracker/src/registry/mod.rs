//! Tag registry mapping raw RFID identifiers to cards.
//!
//! The registry is loaded once at startup and is read-only afterwards. A tag
//! missing from the registry is not an error: it resolves to
//! [`CardIdentity::Unknown`](crate::entities::CardIdentity::Unknown) and still
//! takes a slot on the table.
//!
//! ## Example
//!
//! ```
//! use card_tracker::entities::{Card, Suit, TagId};
//! use card_tracker::registry::{TagDatabase, TagRegistry};
//!
//! let registry = TagDatabase::from_json_str(r#"{ "A1": "As", "B2": "Kh" }"#).unwrap();
//!
//! let tag = TagId::new("A1").unwrap();
//! assert_eq!(registry.lookup(&tag), Some(Card(14, Suit::Spade)));
//! assert_eq!(registry.lookup(&TagId::new("ZZ").unwrap()), None);
//! ```

pub mod errors;

pub use errors::{RegistryError, RegistryResult};

use crate::entities::{Card, TagId};
use std::{collections::HashMap, path::Path};

/// Lookup contract consumed by the tracker.
///
/// Implementations must be pure and deterministic for the lifetime of the
/// process.
pub trait TagRegistry: Send + Sync {
    /// Resolve a tag to a card, or `None` if the tag is not registered.
    fn lookup(&self, tag: &TagId) -> Option<Card>;
}

/// In-memory registry backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct TagDatabase {
    cards: HashMap<TagId, Card>,
}

impl TagDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `"tag": "card code"` pairs.
    pub fn from_json_str(json: &str) -> RegistryResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut cards = HashMap::with_capacity(raw.len());

        for (tag, value) in raw {
            let card = value
                .parse::<Card>()
                .map_err(|source| RegistryError::InvalidCard {
                    tag: tag.clone(),
                    value: value.clone(),
                    source,
                })?;
            let tag = TagId::new(&tag).ok_or(RegistryError::BlankTag)?;
            if cards.contains_key(&tag) {
                return Err(RegistryError::DuplicateTag(tag.to_string()));
            }
            cards.insert(tag, card);
        }

        Ok(Self { cards })
    }

    /// Load a registry file from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} tag(s) from registry {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Register a tag, replacing any previous card for it.
    pub fn insert(&mut self, tag: TagId, card: Card) -> Option<Card> {
        self.cards.insert(tag, card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl TagRegistry for TagDatabase {
    fn lookup(&self, tag: &TagId) -> Option<Card> {
        self.cards.get(tag).copied()
    }
}

impl FromIterator<(TagId, Card)> for TagDatabase {
    fn from_iter<I: IntoIterator<Item = (TagId, Card)>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Suit;

    fn tag(s: &str) -> TagId {
        TagId::new(s).unwrap()
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let registry = TagDatabase::from_json_str(r#"{"A1": "As", "C3": "Qd"}"#).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(&tag("A1")), Some(Card(14, Suit::Spade)));
        assert_eq!(registry.lookup(&tag("C3")), Some(Card(12, Suit::Diamond)));
        assert_eq!(registry.lookup(&tag("B2")), None);
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let registry = TagDatabase::from_json_str(r#"{"A1": "As"}"#).unwrap();
        let first = registry.lookup(&tag("A1"));
        for _ in 0..10 {
            assert_eq!(registry.lookup(&tag("A1")), first);
        }
    }

    #[test]
    fn test_tags_are_trimmed_on_load() {
        let registry = TagDatabase::from_json_str(r#"{" A1 ": "As"}"#).unwrap();
        assert_eq!(registry.lookup(&tag("A1")), Some(Card(14, Suit::Spade)));
    }

    #[test]
    fn test_invalid_card_names_the_tag() {
        let err = TagDatabase::from_json_str(r#"{"A1": "Zz"}"#).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCard { ref tag, .. } if tag == "A1"));
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn test_blank_tag_is_rejected() {
        let err = TagDatabase::from_json_str(r#"{"  ": "As"}"#).unwrap_err();
        assert!(matches!(err, RegistryError::BlankTag));
    }

    #[test]
    fn test_tags_equal_after_trimming_are_rejected() {
        let err = TagDatabase::from_json_str(r#"{"A1": "As", " A1 ": "Kh"}"#).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTag(ref tag) if tag == "A1"));
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn test_malformed_json() {
        let err = TagDatabase::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, RegistryError::Malformed(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TagDatabase::from_json_file("/definitely/not/here/tags.json").unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn test_from_iterator() {
        let registry: TagDatabase = [(tag("X"), Card(2, Suit::Club))].into_iter().collect();
        assert_eq!(registry.lookup(&tag("X")), Some(Card(2, Suit::Club)));
        assert!(!registry.is_empty());
    }
}
