//! Line-oriented front end for running without a terminal UI.
//!
//! Commands are read from `input`, one per line, and every table change is
//! written to `output` as a text block or a JSON snapshot.

use crate::{
    controller::{Controller, Reply, describe_notification},
    render::snapshot_text,
    tui_app::HELP,
};
use anyhow::{Context, Result};
use card_tracker::{
    reader::ChannelEvent,
    table::{LayoutChangeNotification, PresentationMode, TableSnapshot},
};
use std::io::Write;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};

/// How snapshots are printed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

struct Printer<'a, W: Write> {
    output: &'a mut W,
    format: OutputFormat,
    mode: PresentationMode,
}

impl<W: Write> Printer<'_, W> {
    fn line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").context("Failed to write output")
    }

    fn snapshot(&mut self, snapshot: &TableSnapshot) -> Result<()> {
        self.mode = snapshot.mode;
        match self.format {
            OutputFormat::Text => {
                write!(self.output, "{}", snapshot_text(snapshot)).context("Failed to write output")
            }
            OutputFormat::Json => {
                let json = serde_json::to_string(snapshot)?;
                self.line(&json)
            }
        }
    }

    fn reply(&mut self, reply: &Reply) -> Result<()> {
        match reply {
            Reply::Ack(msg) => self.line(msg),
            Reply::Alert(msg) => self.line(&format!("! {msg}")),
            Reply::Error(msg) => self.line(&format!("error: {msg}")),
            Reply::ShowHelp => write!(self.output, "{HELP}").context("Failed to write output"),
            Reply::Silent | Reply::Quit => Ok(()),
        }
    }
}

/// Print `first` and any notifications already queued behind it, then the
/// resulting table once.
async fn print_changes<W: Write>(
    first: Option<LayoutChangeNotification>,
    controller: &Controller,
    notifications: &mut mpsc::Receiver<LayoutChangeNotification>,
    printer: &mut Printer<'_, W>,
) -> Result<()> {
    let mut changed = false;
    let mut next = first;
    while let Some(notification) = next.take().or_else(|| notifications.try_recv().ok()) {
        if printer.format == OutputFormat::Text {
            if let LayoutChangeNotification::ModeChanged(mode) = notification {
                printer.mode = mode;
            }
            let line = describe_notification(&notification, printer.mode);
            printer.line(&line)?;
        }
        changed = true;
    }
    if changed {
        let snapshot = controller.tracker().get_snapshot().await?;
        printer.snapshot(&snapshot)?;
    }
    Ok(())
}

/// Run until `input` ends, the operator quits or the tracker goes away.
pub async fn run<R, W>(
    mut controller: Controller,
    mut notifications: mpsc::Receiver<LayoutChangeNotification>,
    mut channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let initial = controller.tracker().get_snapshot().await?;
    let mut printer = Printer {
        output,
        format,
        mode: initial.mode,
    };
    printer.snapshot(&initial)?;

    let mut lines = input.lines();

    loop {
        tokio::select! {
            biased;

            Some(event) = channel_events.recv() => {
                printer.line(&event.to_string())?;
            }

            Some(notification) = notifications.recv() => {
                print_changes(Some(notification), &controller, &mut notifications, &mut printer)
                    .await?;
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let reply = controller.handle_input(&line).await;
                printer.reply(&reply)?;
                if reply == Reply::Quit {
                    break;
                }
                print_changes(None, &controller, &mut notifications, &mut printer).await?;
            }
        }
    }

    Ok(())
}
