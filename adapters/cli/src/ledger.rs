//! Append-only JSON-lines points ledger backed by a writer thread.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufWriter, Write},
    path::Path,
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
    time::{SystemTime, UNIX_EPOCH},
};

use heritage_map_core::AwardRequest;
use heritage_map_system_scoring::{LedgerError, PointsLedger};
use serde::Serialize;
use tracing::{debug, warn};

/// One line of the ledger file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LedgerRecord {
    user: String,
    #[serde(flatten)]
    award: AwardRequest,
    recorded_at: u64,
}

/// Ledger that queues awards for a background thread appending them to a file.
///
/// `record` only sends on a channel, so the game loop never waits on disk.
/// Dropping the ledger closes the queue and waits for pending lines.
#[derive(Debug)]
pub(crate) struct JsonLinesLedger {
    user: String,
    sender: Option<Sender<LedgerRecord>>,
    writer: Option<JoinHandle<()>>,
}

impl JsonLinesLedger {
    /// Opens (or creates) the ledger file and starts the writer thread.
    pub(crate) fn open(path: &Path, user: impl Into<String>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (sender, receiver) = mpsc::channel();
        let writer = thread::Builder::new()
            .name("ledger-writer".to_owned())
            .spawn(move || write_records(file, receiver))?;

        Ok(Self {
            user: user.into(),
            sender: Some(sender),
            writer: Some(writer),
        })
    }
}

impl PointsLedger for JsonLinesLedger {
    fn record(&mut self, award: &AwardRequest) -> Result<(), LedgerError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| LedgerError::Unavailable("ledger closed".to_owned()))?;
        let record = LedgerRecord {
            user: self.user.clone(),
            award: award.clone(),
            recorded_at: unix_seconds(),
        };
        sender
            .send(record)
            .map_err(|_| LedgerError::Unavailable("ledger writer stopped".to_owned()))
    }
}

impl Drop for JsonLinesLedger {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                warn!("ledger writer panicked");
            }
        }
    }
}

fn write_records(file: File, receiver: Receiver<LedgerRecord>) {
    let mut out = BufWriter::new(file);
    for record in receiver {
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "could not encode ledger record");
                continue;
            }
        };
        if let Err(error) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(%error, user = %record.user, "could not append ledger record");
            continue;
        }
        debug!(user = %record.user, points = record.award.points, "ledger record written");
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
