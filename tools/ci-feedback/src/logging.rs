use crate::errors::CiFeedbackError;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_DISK_BUDGET_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_LOG_PATH: &str = ".cache/ci-feedback/run.jsonl";

#[derive(Debug, Clone)]
pub struct JsonlLogger {
    pub path: PathBuf,
    pub max_payload_bytes: usize,
    pub budget_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub level: &'a str,
    pub event_type: &'a str,
    pub payload: Value,
}

impl JsonlLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_payload_bytes: 4096,
            budget_bytes: DEFAULT_DISK_BUDGET_BYTES,
        }
    }

    pub fn append(&self, event: &LogEvent<'_>) -> Result<(), CiFeedbackError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CiFeedbackError::Io(e.to_string()))?;
        }
        self.reset_if_over_budget()?;
        let truncated = truncate_json(event.payload.clone(), self.max_payload_bytes);
        let line = serde_json::to_string(&LogEvent {
            level: event.level,
            event_type: event.event_type,
            payload: truncated,
        })
        .map_err(|e| CiFeedbackError::Io(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CiFeedbackError::Io(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| CiFeedbackError::Io(e.to_string()))?;
        file.write_all(b"\n")
            .map_err(|e| CiFeedbackError::Io(e.to_string()))?;
        Ok(())
    }

    // One small log per CI run; starting fresh once the budget is blown is
    // cheaper than walking file ages.
    fn reset_if_over_budget(&self) -> Result<(), CiFeedbackError> {
        let Ok(meta) = fs::metadata(&self.path) else {
            return Ok(());
        };
        if meta.len() > self.budget_bytes {
            fs::remove_file(&self.path).map_err(|e| CiFeedbackError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

/// Best-effort structured logging for orchestration milestones. Reporting
/// must never fail because its own log could not be written.
pub fn append_run_log(level: &str, event_type: &str, payload: Value) {
    let logger = JsonlLogger::new(DEFAULT_LOG_PATH);
    let _ = logger.append(&LogEvent {
        level,
        event_type,
        payload,
    });
}

fn truncate_json(value: Value, max_bytes: usize) -> Value {
    let rendered = serde_json::to_string(&value).unwrap_or_default();
    if rendered.len() <= max_bytes {
        return value;
    }
    let mut truncated = rendered;
    truncated.truncate(max_bytes.saturating_sub(3));
    Value::String(format!("{truncated}..."))
}
