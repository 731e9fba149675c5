use ratatui::widgets::{ListItem, ListState, ScrollbarState};
use std::collections::VecDeque;

/// Bounded list rendered bottom-to-top: index 0 is the newest item and
/// sits at the bottom of the widget.
pub struct ScrollableList {
    max_items: usize,
    pub list_items: VecDeque<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            list_items: VecDeque::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.push_front(item);
        if self.list_items.len() > self.max_items {
            self.list_items.pop_back();
        }
        // Keep the selected item in place when something new arrives.
        if let Some(idx) = self.list_state.selected()
            && idx > 0
        {
            self.select((idx + 1).min(self.list_items.len() - 1));
        } else {
            self.select(0);
        }
    }

    fn select(&mut self, idx: usize) {
        self.list_state.select(Some(idx));
        let len = self.list_items.len();
        self.scroll_state = ScrollbarState::new(len).position(len.saturating_sub(idx + 1));
    }

    /// Scroll towards older items.
    pub fn move_up(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0);
        if idx + 1 < self.list_items.len() {
            self.select(idx + 1);
        }
    }

    /// Scroll towards newer items.
    pub fn move_down(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0);
        self.select(idx.saturating_sub(1));
    }

    /// Jump to the oldest item.
    pub fn jump_to_first(&mut self) {
        self.select(self.list_items.len().saturating_sub(1));
    }

    /// Jump to the newest item.
    pub fn jump_to_last(&mut self) {
        self.select(0);
    }
}

/// Single-line text input with a character cursor.
#[derive(Default)]
pub struct UserInput {
    pub value: String,
    /// Cursor position in characters, not bytes
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.char_idx)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.char_idx += 1;
    }

    pub fn backspace(&mut self) {
        if self.char_idx > 0 {
            self.char_idx -= 1;
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.char_idx < self.char_count() {
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.char_count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.char_count();
    }

    /// Take the current value and clear the input.
    pub fn submit(&mut self) -> String {
        self.char_idx = 0;
        std::mem::take(&mut self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_input_editing() {
        let mut input = UserInput::new();
        for c in "tg 〇1".chars() {
            input.input(c);
        }
        input.jump_to_first();
        input.move_right();
        input.input('a');
        assert_eq!(input.value, "tag 〇1");

        input.jump_to_last();
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "tag 1");
        input.delete();
        assert_eq!(input.value, "tag ");

        assert_eq!(input.submit(), "tag ");
        assert_eq!(input.value, "");
        assert_eq!(input.char_idx, 0);
    }

    #[test]
    fn test_scrollable_list_is_bounded() {
        let mut list = ScrollableList::new(3);
        for i in 0..5 {
            list.push(ListItem::new(i.to_string()));
        }
        assert_eq!(list.list_items.len(), 3);
        assert_eq!(list.list_state.selected(), Some(0));
    }

    #[test]
    fn test_scrollable_list_navigation() {
        let mut list = ScrollableList::new(10);
        for i in 0..4 {
            list.push(ListItem::new(i.to_string()));
        }
        list.move_up();
        list.move_up();
        assert_eq!(list.list_state.selected(), Some(2));
        list.jump_to_first();
        assert_eq!(list.list_state.selected(), Some(3));
        list.move_up();
        assert_eq!(list.list_state.selected(), Some(3));
        list.jump_to_last();
        list.move_down();
        assert_eq!(list.list_state.selected(), Some(0));
    }
}
