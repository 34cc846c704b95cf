//! Dead letter queue
//!
//! Append-only JSONL log of permanently failed deliveries, one entry per
//! (record, sink) pair. Never read back by the running process. A directory
//! that cannot be prepared at startup disables dead-lettering for the run
//! instead of failing it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use contracts::ProcessingResult;
use serde_json::json;
use tracing::{debug, error, info};

const DLQ_FILE_NAME: &str = "failed-records.jsonl";

pub struct DeadLetterQueue {
    file_path: PathBuf,
    enabled: bool,
    // Writes are whole-line appends; the lock keeps entries uninterleaved
    write_lock: Mutex<()>,
}

impl DeadLetterQueue {
    /// Prepare the dead-letter directory. Never fails: a directory error
    /// disables dead-lettering for the run.
    pub fn new(path: impl AsRef<Path>, enabled: bool) -> Self {
        let dir = path.as_ref().to_path_buf();
        let enabled = if enabled {
            match std::fs::create_dir_all(&dir) {
                Ok(()) => {
                    info!(path = %dir.display(), "dead letter queue initialized");
                    true
                }
                Err(e) => {
                    error!(path = %dir.display(), error = %e, "failed to create dead letter directory, disabling");
                    false
                }
            }
        } else {
            false
        };

        Self {
            file_path: dir.join(DLQ_FILE_NAME),
            enabled,
            write_lock: Mutex::new(()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one entry for a permanently failed delivery. Write errors are
    /// logged and swallowed; the failure is already counted in metrics.
    pub fn write_failed(&self, result: &ProcessingResult) {
        if !self.enabled {
            return;
        }

        let entry = json!({
            "recordId": result.record.id,
            "sinkName": result.sink_name,
            "errorMessage": result.error,
            "retryCount": result.record.retry_count,
            "failedAt": Utc::now().to_rfc3339(),
            "originalData": result.record.fields,
        });

        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!(record_id = %result.record.id, error = %e, "failed to serialize dead letter entry");
                return;
            }
        };

        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .and_then(|mut file| writeln!(file, "{line}"));

        match written {
            Ok(()) => debug!(record_id = %result.record.id, "wrote failed record to dead letter queue"),
            Err(e) => error!(error = %e, "failed to write to dead letter queue"),
        }
    }
}
