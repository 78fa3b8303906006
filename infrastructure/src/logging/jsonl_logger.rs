//! JSONL file writer for session transcripts.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying the event
//! `type`, a `timestamp` and a per-file `seq` number, followed by the event
//! payload. The file is opened in append mode so several runs can share one
//! transcript.

use conductor_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex`. Every line is flushed as it is written.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = Map::new();
    map.insert("type".into(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".into(), Value::String(timestamp));
    map.insert("seq".into(), Value::from(seq));
    match event.payload {
        Value::Object(payload) => {
            for (key, value) in payload {
                map.entry(key).or_insert(value);
            }
        }
        other => {
            map.insert("data".into(), other);
        }
    }
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let line = record(event, sink.seq).to_string();

        if let Err(e) = writeln!(sink.writer, "{line}").and_then(|_| sink.writer.flush()) {
            warn!(
                "Could not write conversation log {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
