//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione dell'esecuzione batch e della CLI.
//!
//! ## Parametri di configurazione:
//! - `recursive`: Discende nelle sottodirectory (default: false)
//! - `workers`: Numero di file ottimizzati in parallelo (default: 1, sequenziale)
//! - `keep_going`: Continua il batch dopo un errore e lo registra nel report (default: false)
//! - `dry_run`: Verifica le dipendenze senza eseguire i tool (default: false)
//! - `json_output`: Output JSON per uso programmatico (default: false)
//! - `format_hint`: Forza il formato per un singolo file (default: None)
//!
//! ## Validazione:
//! - Controlla che workers sia > 0
//! - Controlla che format_hint sia png, jpg o jpeg
//!
//! Il core della libreria non legge file di configurazione: `from_file` è
//! usato solo dalla CLI.
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     recursive: true,
//!     workers: 4,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::OptimizeError;
use crate::formats::ImageFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for image optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Walk subdirectories too
    pub recursive: bool,
    /// Number of files optimized concurrently
    pub workers: usize,
    /// Record per-file failures instead of aborting the batch
    pub keep_going: bool,
    /// Dry run - check requirements but never run the optimizers
    pub dry_run: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Explicit format for single-file runs
    pub format_hint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursive: false,
            workers: 1,
            keep_going: false,
            dry_run: false,
            json_output: false,
            format_hint: None,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.workers == 0 {
            return Err(OptimizeError::Validation(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if let Some(ref hint) = self.format_hint {
            if !ImageFormat::from_extension(hint).is_known() {
                return Err(OptimizeError::Validation(format!(
                    "Unsupported format hint '{}', expected png, jpg or jpeg",
                    hint
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
