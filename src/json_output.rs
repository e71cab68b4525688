//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico.
//! Ogni messaggio è una riga JSON su stdout.
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio batch (directory, numero file)
//! - `file_complete`: Fine elaborazione di un file
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore che interrompe l'operazione

use crate::optimizer::{FileReport, FileStatus};
use crate::progress::OptimizationStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        root: PathBuf,
        recursive: bool,
        total_files: usize,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        format: String,
        status: String,
        original_size: u64,
        optimized_size: Option<u64>,
        reduction_percent: Option<f64>,
        error: Option<String>,
    },

    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_optimized: usize,
        files_skipped: usize,
        errors: usize,
        total_bytes_saved: u64,
        average_reduction: f64,
        duration_seconds: f64,
    },

    #[serde(rename = "error")]
    Error { message: String },
}

impl JsonMessage {
    pub fn start(root: PathBuf, recursive: bool, total_files: usize) -> Self {
        Self::Start {
            root,
            recursive,
            total_files,
        }
    }

    pub fn file_complete(file: &FileReport) -> Self {
        let (optimized_size, error) = match &file.status {
            FileStatus::Optimized { optimized_size } => (Some(*optimized_size), None),
            FileStatus::Failed { error } => (None, Some(error.clone())),
            FileStatus::Planned | FileStatus::Skipped => (None, None),
        };

        Self::FileComplete {
            path: file.path.clone(),
            format: file.format.to_string(),
            status: file.status.label().to_string(),
            original_size: file.original_size,
            optimized_size,
            reduction_percent: file.reduction_percent(),
            error,
        }
    }

    pub fn complete(stats: &OptimizationStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_optimized: stats.files_optimized,
            files_skipped: stats.files_skipped,
            errors: stats.errors,
            total_bytes_saved: stats.total_bytes_saved,
            average_reduction: stats.overall_reduction_percent(),
            duration_seconds,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Print the message as one JSON line on stdout
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to serialize JSON message: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ImageFormat;

    #[test]
    fn test_file_complete_message() {
        let file = FileReport {
            path: PathBuf::from("/img/a.png"),
            format: ImageFormat::Png,
            original_size: 1000,
            status: FileStatus::Optimized { optimized_size: 800 },
        };

        let json = serde_json::to_value(JsonMessage::file_complete(&file)).unwrap();
        assert_eq!(json["type"], "file_complete");
        assert_eq!(json["format"], "PNG");
        assert_eq!(json["status"], "optimized");
        assert_eq!(json["optimized_size"], 800);
        assert_eq!(json["reduction_percent"], 20.0);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_failed_file_carries_error() {
        let file = FileReport {
            path: PathBuf::from("/img/b.jpg"),
            format: ImageFormat::Jpeg,
            original_size: 10,
            status: FileStatus::Failed {
                error: "Dependency missing: jpegoptim".to_string(),
            },
        };

        match JsonMessage::file_complete(&file) {
            JsonMessage::FileComplete { status, error, optimized_size, .. } => {
                assert_eq!(status, "failed");
                assert_eq!(error.as_deref(), Some("Dependency missing: jpegoptim"));
                assert!(optimized_size.is_none());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_start_message_serialization() {
        let message = JsonMessage::start(PathBuf::from("/img"), true, 3);
        let line = serde_json::to_string(&message).unwrap();
        assert_eq!(line, r#"{"type":"start","root":"/img","recursive":true,"total_files":3}"#);

        let parsed: JsonMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, message);
    }
}
