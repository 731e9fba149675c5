//! Line-delimited tag readers, one per input channel.
//!
//! Each physical reader delivers one tag identifier per line. A
//! [`StreamReader`] decodes lines from its channel and forwards every tag to
//! the tracker with no buffering in between. Problems on a channel are
//! reported as [`ChannelEvent`]s and never stop the other channel.
//!
//! ## Example
//!
//! ```no_run
//! use card_tracker::{
//!     history::InMemoryHandLog,
//!     reader::{ChannelId, StreamReader},
//!     registry::TagDatabase,
//!     table::TrackerActor,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = TrackerActor::spawn(
//!         Arc::new(TagDatabase::new()),
//!         Arc::new(InMemoryHandLog::new()),
//!         100,
//!     );
//!     let (events, _rx) = tokio::sync::mpsc::unbounded_channel();
//!
//!     for (name, path) in [("left", "/dev/ttyACM0"), ("right", "/dev/ttyACM1")] {
//!         let reader = StreamReader::new(ChannelId::new(name), handle.clone(), events.clone());
//!         tokio::spawn(reader.run_device(path));
//!     }
//! }
//! ```

pub mod errors;

pub use errors::{ReaderError, ReaderResult};

use crate::{entities::TagId, table::TrackerHandle};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, time::Duration};
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

/// Pause after a failed read before trying the same channel again.
pub const READ_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Name of an input channel, e.g. `left` or the device path.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Channel used for tags typed in by the operator.
    pub fn keyboard() -> Self {
        Self::new("keyboard")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What happened on a channel, for the operator and the log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChannelEventKind {
    Opened,
    /// Device could not be opened. Reported once; the channel is abandoned.
    Unavailable(String),
    /// A line could not be decoded and was skipped.
    DecodeError(String),
    /// A read failed; the reader keeps trying.
    ReadError(String),
    /// The device reached end of input.
    Closed,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelEvent {
    pub channel: ChannelId,
    pub kind: ChannelEventKind,
}

impl fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ChannelEventKind::Opened => write!(f, "channel {} opened", self.channel),
            ChannelEventKind::Unavailable(reason) => {
                write!(f, "channel {} unavailable: {reason}", self.channel)
            }
            ChannelEventKind::DecodeError(reason) => {
                write!(f, "channel {} decode error: {reason}", self.channel)
            }
            ChannelEventKind::ReadError(reason) => {
                write!(f, "channel {} read error: {reason}", self.channel)
            }
            ChannelEventKind::Closed => write!(f, "channel {} closed", self.channel),
        }
    }
}

/// One line's worth of input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineRead {
    Tag(TagId),
    /// Whitespace-only line, ignored.
    Blank,
    Eof,
}

/// Read and decode one line from `source`, reusing `buf` between calls.
pub async fn read_line<R>(source: &mut R, buf: &mut Vec<u8>) -> ReaderResult<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if source.read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Eof);
    }
    decode_line(buf)
}

/// Decode a raw line into a tag. Surrounding whitespace, including `\r\n`,
/// is trimmed.
pub fn decode_line(bytes: &[u8]) -> ReaderResult<LineRead> {
    let line = std::str::from_utf8(bytes)?;
    Ok(TagId::new(line).map_or(LineRead::Blank, LineRead::Tag))
}

/// Why a reader stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReaderExit {
    Unavailable,
    EndOfInput,
    TrackerClosed,
}

/// Reader task for a single channel.
pub struct StreamReader {
    channel: ChannelId,
    tracker: TrackerHandle,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

impl StreamReader {
    pub fn new(
        channel: ChannelId,
        tracker: TrackerHandle,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Self {
        Self {
            channel,
            tracker,
            events,
        }
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    fn report(&self, kind: ChannelEventKind) {
        let event = ChannelEvent {
            channel: self.channel.clone(),
            kind,
        };
        match event.kind {
            ChannelEventKind::Opened | ChannelEventKind::Closed => log::info!("{}", event),
            _ => log::warn!("{}", event),
        }
        // Nobody listening is fine; the log line above still records it.
        let _ = self.events.send(event);
    }

    /// Open a device path and read from it until end of input.
    pub async fn run_device(self, path: impl AsRef<Path>) -> ReaderExit {
        let path = path.as_ref();
        let file = match File::open(path).await {
            Ok(file) => file,
            Err(source) => {
                let err = ReaderError::Unavailable {
                    path: path.to_path_buf(),
                    source,
                };
                self.report(ChannelEventKind::Unavailable(err.to_string()));
                return ReaderExit::Unavailable;
            }
        };

        self.report(ChannelEventKind::Opened);
        self.run(BufReader::new(file)).await
    }

    /// Forward every tag from `source` to the tracker.
    pub async fn run<R>(self, mut source: R) -> ReaderExit
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            match read_line(&mut source, &mut buf).await {
                Ok(LineRead::Tag(tag)) => {
                    if self
                        .tracker
                        .on_tag_event(self.channel.clone(), tag)
                        .await
                        .is_err()
                    {
                        log::debug!("Tracker closed, stopping reader {}", self.channel);
                        return ReaderExit::TrackerClosed;
                    }
                }
                Ok(LineRead::Blank) => {}
                Ok(LineRead::Eof) => {
                    self.report(ChannelEventKind::Closed);
                    return ReaderExit::EndOfInput;
                }
                Err(ReaderError::Read(e)) => {
                    self.report(ChannelEventKind::ReadError(e.to_string()));
                    tokio::time::sleep(READ_RETRY_DELAY).await;
                }
                Err(e) => {
                    self.report(ChannelEventKind::DecodeError(e.to_string()));
                }
            }
        }
    }
}
