use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

/// Appends every exchange with the cloud API to an NDJSON file.
pub(crate) struct MessageLogger {
    file: File,
}

impl MessageLogger {
    pub fn new(path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self { file })
    }

    pub fn log_request(&mut self, method: &str, path: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "method": method,
            "path": path,
        });
        self.write_line(&entry);
    }

    pub fn log_command(&mut self, device_id: &str, body: &Value) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "device": device_id,
            "body": body,
        });
        self.write_line(&entry);
    }

    pub fn log_response(&mut self, path: &str, status: u16, body: &Value) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "resp",
            "path": path,
            "status": status,
            "body": body,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
