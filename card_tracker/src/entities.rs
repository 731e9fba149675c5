use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    /// Single-letter code used by the registry file.
    pub fn code(&self) -> char {
        match self {
            Self::Club => 'c',
            Self::Spade => 's',
            Self::Diamond => 'd',
            Self::Heart => 'h',
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (two=2u8 ... ace=14u8) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    pub fn value(&self) -> Value {
        self.0
    }

    pub fn suit(&self) -> Suit {
        self.1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => 'A',
            13 => 'K',
            12 => 'Q',
            11 => 'J',
            10 => 'T',
            v @ 2..=9 => char::from(b'0' + v),
            _ => '?',
        };
        write!(f, "{value}{}", self.1.code())
    }
}

/// Errors raised while parsing a card code such as `As` or `Td`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("Empty card code")]
    Empty,

    #[error("Invalid rank '{0}'")]
    InvalidRank(String),

    #[error("Invalid suit '{0}'")]
    InvalidSuit(String),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let mut chars = code.chars();
        let suit_char = chars.next_back().ok_or(CardParseError::Empty)?;
        let rank = chars.as_str();
        if rank.is_empty() {
            return Err(CardParseError::InvalidRank(code.to_string()));
        }

        let value = match rank.to_ascii_uppercase().as_str() {
            "A" => 14,
            "K" => 13,
            "Q" => 12,
            "J" => 11,
            "T" | "10" => 10,
            digit => match digit.parse::<Value>() {
                Ok(v @ 2..=9) => v,
                _ => return Err(CardParseError::InvalidRank(rank.to_string())),
            },
        };

        let suit = match suit_char.to_ascii_lowercase() {
            'c' => Suit::Club,
            's' => Suit::Spade,
            'd' => Suit::Diamond,
            'h' => Suit::Heart,
            other => return Err(CardParseError::InvalidSuit(other.to_string())),
        };

        Ok(Self(value, suit))
    }
}

/// What a tag resolved to. A tag missing from the registry still occupies
/// a slot, shown as `?`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "kind", content = "card", rename_all = "snake_case")]
pub enum CardIdentity {
    Known(Card),
    Unknown,
}

impl CardIdentity {
    pub fn card(&self) -> Option<Card> {
        match self {
            Self::Known(card) => Some(*card),
            Self::Unknown => None,
        }
    }
}

impl From<Option<Card>> for CardIdentity {
    fn from(value: Option<Card>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Known(card) => fmt::Display::fmt(card, f),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Raw identifier read from an RFID tag. Never empty, never padded.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TagId(String);

impl TagId {
    /// Trims surrounding whitespace, returning `None` for a blank token.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_display_out_of_range_value() {
        assert_eq!(Card(1, Suit::Spade).to_string(), "?s");
        assert_eq!(Card(0, Suit::Club).to_string(), "?c");
        assert_eq!(Card(255, Suit::Heart).to_string(), "?h");
        assert_eq!(Card(9, Suit::Diamond).to_string(), "9d");
    }

    #[test]
    fn test_card_parse_face_cards() {
        assert_eq!("As".parse::<Card>().unwrap(), Card(14, Suit::Spade));
        assert_eq!("Kh".parse::<Card>().unwrap(), Card(13, Suit::Heart));
        assert_eq!("Qd".parse::<Card>().unwrap(), Card(12, Suit::Diamond));
        assert_eq!("Jc".parse::<Card>().unwrap(), Card(11, Suit::Club));
    }

    #[test]
    fn test_card_parse_ten_spellings() {
        assert_eq!("Ts".parse::<Card>().unwrap(), Card(10, Suit::Spade));
        assert_eq!("10s".parse::<Card>().unwrap(), Card(10, Suit::Spade));
    }

    #[test]
    fn test_card_parse_is_case_insensitive() {
        assert_eq!("aS".parse::<Card>().unwrap(), Card(14, Suit::Spade));
        assert_eq!(" 9H ".parse::<Card>().unwrap(), Card(9, Suit::Heart));
    }

    #[test]
    fn test_card_parse_rejects_garbage() {
        assert_eq!("".parse::<Card>(), Err(CardParseError::Empty));
        assert!(matches!(
            "s".parse::<Card>(),
            Err(CardParseError::InvalidRank(_))
        ));
        assert!(matches!(
            "1s".parse::<Card>(),
            Err(CardParseError::InvalidRank(_))
        ));
        assert!(matches!(
            "Ax".parse::<Card>(),
            Err(CardParseError::InvalidSuit(_))
        ));
    }

    #[test]
    fn test_card_display_round_trips_codes() {
        for code in ["As", "Kh", "Qd", "Jc", "Ts", "9h", "8c", "2d"] {
            assert_eq!(code.parse::<Card>().unwrap().to_string(), code);
        }
    }

    #[test]
    fn test_unknown_identity_displays_placeholder() {
        assert_eq!(CardIdentity::Unknown.to_string(), "?");
        assert_eq!(CardIdentity::from(None).to_string(), "?");
        assert_eq!(
            CardIdentity::from(Some(Card(14, Suit::Spade))).to_string(),
            "As"
        );
    }

    #[test]
    fn test_tag_id_trims_and_rejects_blank() {
        assert_eq!(TagId::new("  04A1B2\r").unwrap().as_str(), "04A1B2");
        assert!(TagId::new("").is_none());
        assert!(TagId::new(" \t\r").is_none());
    }
}
