//! Terminal front end for the card tracker.
//!
//! Shows the three table regions, a history of placements, lifecycle
//! actions and channel problems, and an input box for operator commands.

use crate::{
    controller::{Controller, Reply, describe_notification},
    render::{cell_span, mode_label, region_cells},
};
use anyhow::Result;
use card_tracker::{
    reader::{ChannelEvent, ChannelEventKind, ChannelId},
    table::{LayoutChangeNotification, PresentationMode, Region, SLOT_COUNT, TableSnapshot},
};
use chrono::{DateTime, Local};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Alignment, Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span, Text},
    widgets::{
        Block, Cell, Clear, List, ListDirection, ListItem, Padding, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, Table, block,
    },
};
use std::time::Duration;
use tokio::sync::mpsc;

mod widgets;

use widgets::{ScrollableList, UserInput};

pub const HELP: &str = "\
commit | save
        Record the current hand and start the next one.
clear | reset
        Empty the table without recording it. The hand number stays.
new-game
        Start over at hand 1 in a new log file. Asks for confirmation.
mode [manager|player]
        Set the presentation mode, or toggle it without an argument.
        Player mode hides both private hands.
tag <id>
        Enter a tag by hand, as if it was read by an antenna.
help
        Show this list.
";
const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Clone)]
enum RecordKind {
    Ack,
    Alert,
    Error,
    Table,
    You,
}

/// A timestamped history line with an importance label to help direct
/// operator attention.
#[derive(Clone)]
struct Record {
    datetime: DateTime<Local>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Local::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Ack => "ACK".light_blue(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Table => "TABLE".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

/// Last known state of an input channel.
struct ChannelStatus {
    channel: ChannelId,
    healthy: bool,
    detail: String,
}

impl ChannelStatus {
    fn apply(&mut self, kind: &ChannelEventKind) {
        self.healthy = match kind {
            ChannelEventKind::Opened => true,
            // A bad line says nothing about the device itself.
            ChannelEventKind::DecodeError(_) => self.healthy,
            ChannelEventKind::Unavailable(_)
            | ChannelEventKind::ReadError(_)
            | ChannelEventKind::Closed => false,
        };
        self.detail = match kind {
            ChannelEventKind::Opened => "reading",
            ChannelEventKind::Unavailable(_) => "unavailable",
            ChannelEventKind::DecodeError(_) => "decode error",
            ChannelEventKind::ReadError(_) => "read error, retrying",
            ChannelEventKind::Closed => "closed",
        }
        .to_string();
    }
}

/// TUI App state
pub struct TuiApp {
    controller: Controller,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
    /// Current value of the input box
    user_input: UserInput,
    channels: Vec<ChannelStatus>,
    /// Current table snapshot
    snapshot: TableSnapshot,
}

impl TuiApp {
    pub fn new(controller: Controller, channels: Vec<ChannelId>, snapshot: TableSnapshot) -> Self {
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        help_handle.push("".into());
        for line in HELP.lines() {
            help_handle.push(line.into());
        }
        help_handle.push("".into());
        help_handle.jump_to_first();

        let channels = channels
            .into_iter()
            .map(|channel| ChannelStatus {
                channel,
                healthy: true,
                detail: "starting".to_string(),
            })
            .collect();

        Self {
            controller,
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            user_input: UserInput::new(),
            channels,
            snapshot,
        }
    }

    fn add_log(&mut self, kind: RecordKind, content: String) {
        self.log_handle.push(Record::new(kind, content).into());
    }

    /// Run one line of input through the controller. Returns false once
    /// the operator asked to quit.
    async fn handle_command(&mut self, user_input: &str) -> bool {
        if user_input.trim().is_empty() {
            return true;
        }
        self.add_log(RecordKind::You, user_input.to_string());

        match self.controller.handle_input(user_input).await {
            Reply::Ack(msg) => self.add_log(RecordKind::Ack, msg),
            Reply::Alert(msg) => self.add_log(RecordKind::Alert, msg),
            Reply::Error(msg) => self.add_log(RecordKind::Error, msg),
            Reply::Silent => {}
            Reply::ShowHelp => self.show_help_menu = true,
            Reply::Quit => return false,
        }
        true
    }

    async fn handle_notification(&mut self, notification: LayoutChangeNotification) {
        if let LayoutChangeNotification::ModeChanged(mode) = notification {
            self.snapshot.mode = mode;
        }
        let content = describe_notification(&notification, self.snapshot.mode);
        self.add_log(RecordKind::Table, content);

        match self.controller.tracker().get_snapshot().await {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(e) => self.add_log(RecordKind::Error, e.to_string()),
        }
    }

    fn handle_channel_event(&mut self, event: ChannelEvent) {
        if let Some(status) = self
            .channels
            .iter_mut()
            .find(|status| status.channel == event.channel)
        {
            status.apply(&event.kind);
        }

        let kind = match &event.kind {
            ChannelEventKind::Opened => RecordKind::Ack,
            ChannelEventKind::DecodeError(_) => RecordKind::Alert,
            _ => RecordKind::Error,
        };
        self.add_log(kind, event.to_string());
    }

    /// Render the table regions
    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let rows = Region::ALL.into_iter().map(|region| {
            let mut cells = vec![Cell::new(
                Text::from(region.to_string()).alignment(Alignment::Left),
            )];
            cells.extend(
                region_cells(&self.snapshot.layout, region, self.snapshot.mode)
                    .into_iter()
                    .map(|cell| {
                        Cell::new(Text::from(cell_span(cell)).alignment(Alignment::Center))
                    }),
            );
            Row::new(cells).height(2)
        });

        let mode_title = match self.snapshot.mode {
            PresentationMode::Manager => {
                format!(" {}  ", mode_label(self.snapshot.mode)).light_green()
            }
            PresentationMode::Player => {
                format!(" {}  ", mode_label(self.snapshot.mode)).light_magenta()
            }
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(4),
            ],
        )
        .block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title_top(mode_title)
                .title_top(
                    Line::from(format!(" HAND {}  ", self.snapshot.hand_number).bold())
                        .right_aligned(),
                )
                .title_bottom(format!(
                    " {}/{} slots  ",
                    self.snapshot.filled_count(),
                    SLOT_COUNT
                )),
        );
        frame.render_widget(table, area);
    }

    /// Render the channel status table
    fn draw_channels(&self, frame: &mut Frame, area: Rect) {
        let rows = self.channels.iter().map(|status| {
            let marker = if status.healthy {
                "●".green()
            } else {
                "●".red()
            };
            Row::new(vec![
                Cell::new(Line::from(vec![marker, " ".into(), status.channel.to_string().into()])),
                Cell::new(Text::from(status.detail.clone()).alignment(Alignment::Right)),
            ])
        });
        let channels = Table::new(rows, [Constraint::Fill(2), Constraint::Fill(1)]).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" channels  "),
        );
        frame.render_widget(channels, area);
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the user input area
    fn draw_user_input(&self, frame: &mut Frame, area: Rect) {
        let title = if self.controller.is_awaiting_confirmation() {
            " confirm new game (y/n)  ".light_magenta()
        } else {
            " command  ".light_green()
        };
        let user_input = Paragraph::new(self.user_input.value.as_str())
            .style(Style::default())
            .block(block::Block::bordered().title(title));
        frame.render_widget(user_input, area);
        frame.set_cursor_position(Position::new(
            area.x + self.user_input.char_idx as u16 + 1,
            area.y + 1,
        ));
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help_message = vec![
            "press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to run a command, or press ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        frame.render_widget(Paragraph::new(Line::from(help_message)), area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(20)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(80)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" commands  "));
        frame.render_stateful_widget(
            help_items,
            help_menu_area,
            &mut self.help_handle.list_state,
        );

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            help_menu_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.help_handle.scroll_state,
        );
    }

    fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Length(10), // Table
            Constraint::Min(4),     // History
            Constraint::Length(3),  // User input area
            Constraint::Length(1),  // Help bar
        ]);
        let [view_area, log_area, user_input_area, help_area] = window.areas(frame.area());

        let [table_area, channel_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(view_area);

        self.draw_table(frame, table_area);
        self.draw_channels(frame, channel_area);
        self.draw_log(frame, log_area);
        self.draw_user_input(frame, user_input_area);
        self.draw_help_bar(frame, help_area);

        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application until the operator exits
    pub async fn run(
        mut self,
        mut terminal: DefaultTerminal,
        mut notifications: mpsc::Receiver<LayoutChangeNotification>,
        mut channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
            {
                match modifiers {
                    KeyModifiers::CONTROL => match code {
                        KeyCode::Home => self.log_handle.jump_to_first(),
                        KeyCode::End => self.log_handle.jump_to_last(),
                        _ => {}
                    },
                    KeyModifiers::NONE | KeyModifiers::SHIFT => match code {
                        KeyCode::Enter => {
                            let user_input = self.user_input.submit();
                            if !self.handle_command(&user_input).await {
                                return Ok(());
                            }
                        }
                        KeyCode::Char(to_insert) => self.user_input.input(to_insert),
                        KeyCode::Backspace => self.user_input.backspace(),
                        KeyCode::Delete => self.user_input.delete(),
                        KeyCode::Left => self.user_input.move_left(),
                        KeyCode::Right => self.user_input.move_right(),
                        KeyCode::Up => {
                            if self.show_help_menu {
                                self.help_handle.move_up();
                            } else {
                                self.log_handle.move_up();
                            }
                        }
                        KeyCode::Down => {
                            if self.show_help_menu {
                                self.help_handle.move_down();
                            } else {
                                self.log_handle.move_down();
                            }
                        }
                        KeyCode::Home => self.user_input.jump_to_first(),
                        KeyCode::End => self.user_input.jump_to_last(),
                        KeyCode::Tab => self.show_help_menu = !self.show_help_menu,
                        KeyCode::Esc => return Ok(()),
                        _ => {}
                    },
                    _ => {}
                }
            }

            while let Ok(notification) = notifications.try_recv() {
                self.handle_notification(notification).await;
            }

            while let Ok(event) = channel_events.try_recv() {
                self.handle_channel_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> ChannelStatus {
        ChannelStatus {
            channel: ChannelId::new("left"),
            healthy: false,
            detail: "waiting".to_string(),
        }
    }

    #[test]
    fn test_decode_error_keeps_unhealthy_channel_unhealthy() {
        let mut status = status();
        status.apply(&ChannelEventKind::ReadError("device hiccup".to_string()));
        status.apply(&ChannelEventKind::DecodeError("invalid utf-8".to_string()));
        assert!(!status.healthy);
        assert_eq!(status.detail, "decode error");
    }

    #[test]
    fn test_decode_error_keeps_healthy_channel_healthy() {
        let mut status = status();
        status.apply(&ChannelEventKind::Opened);
        status.apply(&ChannelEventKind::DecodeError("invalid utf-8".to_string()));
        assert!(status.healthy);
    }

    #[test]
    fn test_closed_channel_is_unhealthy() {
        let mut status = status();
        status.apply(&ChannelEventKind::Opened);
        status.apply(&ChannelEventKind::Closed);
        assert!(!status.healthy);
        assert_eq!(status.detail, "closed");
    }
}
