//! Append-only hand history.
//!
//! Committing a hand appends its final layout under the session identifier.
//! Records are never read back by the tracker.
//!
//! [`FileHandLog`] writes one text file per session:
//!
//! ```text
//! HAND 1
//! P1: As Kh
//! P2: Qd Jc
//! BOARD: Ts 9h 8c ? ?
//!
//! ```

pub mod errors;

pub use errors::{HistoryError, HistoryResult};

use crate::table::{
    layout::{Region, SlotLayout},
    session::SessionId,
};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// Trait for hand history sinks
#[async_trait]
pub trait HandRecorder: Send + Sync {
    /// Append the layout of a finished hand
    async fn append_record(
        &self,
        session_id: &SessionId,
        hand_number: u32,
        layout: &SlotLayout,
    ) -> HistoryResult<()>;
}

/// A committed hand as kept by [`InMemoryHandLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandRecord {
    pub session_id: SessionId,
    pub hand_number: u32,
    pub layout: SlotLayout,
    pub recorded_at: DateTime<Local>,
}

/// Render one hand in the text log format.
pub fn format_record(hand_number: u32, layout: &SlotLayout) -> String {
    let mut block = format!("HAND {hand_number}\n");
    for region in Region::ALL {
        block.push_str(&format!("{region}: {}\n", layout.region_codes(region)));
    }
    block.push('\n');
    block
}

/// Text file hand log, one file per session under a directory.
#[derive(Debug, Clone)]
pub struct FileHandLog {
    dir: PathBuf,
}

impl FileHandLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that records for `session_id` are appended to.
    pub fn path_for(&self, session_id: &SessionId) -> PathBuf {
        self.dir.join(format!("log_{session_id}.txt"))
    }
}

#[async_trait]
impl HandRecorder for FileHandLog {
    async fn append_record(
        &self,
        session_id: &SessionId,
        hand_number: u32,
        layout: &SlotLayout,
    ) -> HistoryResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| HistoryError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(session_id);
        let append_err = |source| HistoryError::Append {
            path: path.clone(),
            source,
        };

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(append_err)?;
        file.write_all(format_record(hand_number, layout).as_bytes())
            .await
            .map_err(append_err)?;
        file.flush().await.map_err(append_err)?;

        log::debug!("Hand {} appended to {}", hand_number, path.display());
        Ok(())
    }
}

/// Hand log kept in memory, for tests and runs without a log directory.
#[derive(Debug, Default)]
pub struct InMemoryHandLog {
    records: Mutex<Vec<HandRecord>>,
}

impl InMemoryHandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<HandRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl HandRecorder for InMemoryHandLog {
    async fn append_record(
        &self,
        session_id: &SessionId,
        hand_number: u32,
        layout: &SlotLayout,
    ) -> HistoryResult<()> {
        self.records.lock().await.push(HandRecord {
            session_id: session_id.clone(),
            hand_number,
            layout: layout.clone(),
            recorded_at: Local::now(),
        });
        Ok(())
    }
}
