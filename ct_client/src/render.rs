//! How slots look on screen, shared by the TUI and the headless loop.

use card_tracker::{
    entities::{Card, CardIdentity, Suit},
    table::{PresentationMode, Region, SlotLayout, TableSnapshot},
};
use ratatui::{
    style::{Style, Stylize},
    text::Span,
};
use std::fmt;

/// Shown for a filled private slot in player mode.
pub const CONCEALED: &str = "〇";

/// What a single slot displays.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellView {
    Empty,
    Concealed,
    Unknown,
    Card(Card),
}

impl CellView {
    pub fn new(region: Region, slot: Option<&CardIdentity>, mode: PresentationMode) -> Self {
        match slot {
            None => CellView::Empty,
            Some(_) if mode == PresentationMode::Player && region.is_private() => {
                CellView::Concealed
            }
            Some(CardIdentity::Unknown) => CellView::Unknown,
            Some(CardIdentity::Known(card)) => CellView::Card(*card),
        }
    }
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellView::Empty | CellView::Unknown => write!(f, "?"),
            CellView::Concealed => write!(f, "{CONCEALED}"),
            CellView::Card(card) => fmt::Display::fmt(card, f),
        }
    }
}

/// Cells of one region, in slot order.
pub fn region_cells(layout: &SlotLayout, region: Region, mode: PresentationMode) -> Vec<CellView> {
    layout
        .region(region)
        .iter()
        .map(|slot| CellView::new(region, slot.as_ref(), mode))
        .collect()
}

pub fn mode_label(mode: PresentationMode) -> &'static str {
    match mode {
        PresentationMode::Manager => "Manager Mode",
        PresentationMode::Player => "Player Mode",
    }
}

/// Plain text rendering of a snapshot, e.g.
///
/// ```text
/// Manager Mode | HAND 3
/// P1: As Kh
/// P2: ? ?
/// BOARD: ? ? ? ? ?
/// ```
pub fn snapshot_text(snapshot: &TableSnapshot) -> String {
    let mut text = format!(
        "{} | HAND {}\n",
        mode_label(snapshot.mode),
        snapshot.hand_number
    );
    for region in Region::ALL {
        let cells: Vec<String> = region_cells(&snapshot.layout, region, snapshot.mode)
            .iter()
            .map(ToString::to_string)
            .collect();
        text.push_str(&format!("{region}: {}\n", cells.join(" ")));
    }
    text
}

/// Styled span for a cell. Hearts red, clubs green, diamonds blue.
pub fn cell_span(cell: CellView) -> Span<'static> {
    let repr = cell.to_string();
    match cell {
        CellView::Card(Card(_, Suit::Club)) => Span::styled(repr, Style::default().light_green()),
        CellView::Card(Card(_, Suit::Diamond)) => Span::styled(repr, Style::default().light_blue()),
        CellView::Card(Card(_, Suit::Heart)) => Span::styled(repr, Style::default().light_red()),
        CellView::Card(Card(_, Suit::Spade)) => Span::raw(repr),
        CellView::Concealed => Span::styled(repr, Style::default().bold()),
        CellView::Empty | CellView::Unknown => Span::styled(repr, Style::default().dark_gray()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_tracker::{registry::TagDatabase, table::TableState};

    fn layout_with(tags: &[&str]) -> SlotLayout {
        let registry =
            TagDatabase::from_json_str(r#"{"A":"As","B":"Kh","C":"2c","D":"Td"}"#).unwrap();
        let mut state = TableState::new();
        for tag in tags {
            state.handle_tag_event(card_tracker::entities::TagId::new(tag).unwrap(), &registry);
        }
        state.current_layout().clone()
    }

    fn snapshot(layout: SlotLayout, mode: PresentationMode) -> TableSnapshot {
        TableSnapshot {
            hand_number: 3,
            session_id: None,
            mode,
            layout,
        }
    }

    #[test]
    fn test_manager_mode_shows_everything() {
        let text = snapshot_text(&snapshot(
            layout_with(&["A", "B", "C", "X", "D"]),
            PresentationMode::Manager,
        ));
        assert_eq!(
            text,
            "Manager Mode | HAND 3\nP1: As Kh\nP2: 2c ?\nBOARD: Td ? ? ? ?\n"
        );
    }

    #[test]
    fn test_player_mode_conceals_private_hands() {
        let text = snapshot_text(&snapshot(
            layout_with(&["A", "B", "C", "X", "D"]),
            PresentationMode::Player,
        ));
        assert_eq!(
            text,
            "Player Mode | HAND 3\nP1: 〇 〇\nP2: 〇 〇\nBOARD: Td ? ? ? ?\n"
        );
    }

    #[test]
    fn test_player_mode_leaves_empty_slots_visible() {
        let layout = layout_with(&["A"]);
        let cells = region_cells(&layout, Region::P1, PresentationMode::Player);
        assert_eq!(cells, vec![CellView::Concealed, CellView::Empty]);
        assert_eq!(cells[1].to_string(), "?");
    }

    #[test]
    fn test_unknown_card_renders_as_question_mark() {
        let cell = CellView::new(
            Region::Board,
            Some(&CardIdentity::Unknown),
            PresentationMode::Player,
        );
        assert_eq!(cell, CellView::Unknown);
        assert_eq!(cell.to_string(), "?");
    }

    #[test]
    fn test_cell_span_colours() {
        let heart = cell_span(CellView::Card(Card(14, Suit::Heart)));
        assert_eq!(heart.style, Style::default().light_red());
        let spade = cell_span(CellView::Card(Card(14, Suit::Spade)));
        assert_eq!(spade.style, Style::default());
        assert_eq!(spade.content, "As");
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(mode_label(PresentationMode::Manager), "Manager Mode");
        assert_eq!(mode_label(PresentationMode::Player), "Player Mode");
    }
}
