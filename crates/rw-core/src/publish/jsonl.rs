use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use orion_error::prelude::*;
use orion_error::ErrorOweBase;
use serde::{Deserialize, Serialize};

use super::FeedSubscriber;
use crate::error::{CoreReason, CoreResult};
use crate::incident::Incident;
use crate::window::Snapshot;

/// One serialized snapshot, as written by [`JsonlSnapshotSink`].
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotLine<T> {
    pub seq: u64,
    pub published_at: DateTime<Utc>,
    pub active: usize,
    pub incidents: T,
}

/// Appends every snapshot as one JSON line to a file.
pub struct JsonlSnapshotSink {
    name: String,
    writer: BufWriter<File>,
}

impl JsonlSnapshotSink {
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .owe(CoreReason::Snapshot)
                .position(parent.display().to_string())?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .owe(CoreReason::Snapshot)
            .position(path.display().to_string())?;
        Ok(Self {
            name: format!("jsonl:{}", path.display()),
            writer: BufWriter::new(file),
        })
    }
}

impl FeedSubscriber for JsonlSnapshotSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn publish(&mut self, snapshot: &Snapshot) -> CoreResult<()> {
        let line = SnapshotLine {
            seq: snapshot.seq,
            published_at: snapshot.published_at,
            active: snapshot.len(),
            incidents: snapshot.working_set.incidents(),
        };
        let json = serde_json::to_string(&line).owe(CoreReason::Snapshot)?;
        self.writer
            .write_all(json.as_bytes())
            .owe(CoreReason::Snapshot)?;
        self.writer.write_all(b"\n").owe(CoreReason::Snapshot)?;
        self.writer.flush().owe(CoreReason::Snapshot)?;
        Ok(())
    }

    fn close(&mut self) -> CoreResult<()> {
        self.writer.flush().owe(CoreReason::Snapshot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
