//! Tag probe output, used while building a registry file.

use card_tracker::entities::{Card, TagId};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// One probe line: `<YYYY-mm-dd HH:MM:SS> - <card> (<tag>)`, or
/// `... - unregistered card (<tag>)` when the registry has no entry.
pub fn format_probe_line<Tz>(timestamp: DateTime<Tz>, tag: &TagId, card: Option<Card>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let card = card.map_or_else(|| "unregistered card".to_string(), |card| card.to_string());
    format!(
        "{} - {card} ({})",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        tag.as_str()
    )
}
