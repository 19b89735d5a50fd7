use crate::route::Route;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of what happened in one session.
pub struct SessionLog {
    pub path: Option<PathBuf>,
    session_id: String,
    file: Option<File>,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl SessionLog {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            session_id: session_id.to_string(),
            file: Some(file),
        })
    }

    /// A log that records nothing, for `session.enabled = false`.
    pub fn disabled(session_id: &str) -> Self {
        Self {
            path: None,
            session_id: session_id.to_string(),
            file: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, base_url: &str) -> Result<()> {
        self.log(
            "session_start",
            serde_json::json!({ "base_url": base_url }),
        )
    }

    pub fn navigate(&mut self, route: &Route) -> Result<()> {
        self.log(
            "navigate",
            serde_json::json!({ "route": route.to_string() }),
        )
    }

    pub fn users_loaded(&mut self, count: usize) -> Result<()> {
        self.log("users_loaded", serde_json::json!({ "count": count }))
    }

    pub fn user_loaded(&mut self, id: &str) -> Result<()> {
        self.log("user_loaded", serde_json::json!({ "id": id }))
    }

    pub fn user_created(&mut self, id: u64, username: &str) -> Result<()> {
        self.log(
            "user_created",
            serde_json::json!({ "id": id, "username": username }),
        )
    }

    pub fn user_updated(&mut self, id: u64) -> Result<()> {
        self.log("user_updated", serde_json::json!({ "id": id }))
    }

    pub fn user_deleted(&mut self, id: u64) -> Result<()> {
        self.log("user_deleted", serde_json::json!({ "id": id }))
    }

    pub fn delete_cancelled(&mut self, id: u64) -> Result<()> {
        self.log("delete_cancelled", serde_json::json!({ "id": id }))
    }

    /// Log the fields that failed validation (keys only, never values)
    pub fn validation_failed(&mut self, fields: &[&str]) -> Result<()> {
        self.log(
            "validation_failed",
            serde_json::json!({ "fields": fields }),
        )
    }

    /// Log a failed call to the remote service
    pub fn request_failed(&mut self, op: &str, error: &str) -> Result<()> {
        self.log(
            "request_failed",
            serde_json::json!({
                "op": op,
                "error": error,
            }),
        )
    }
}
