//! # Shio Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! Ottimizzazione lossless di immagini PNG e JPEG tramite tool esterni
//! (`optipng`, `jpegoptim`) che riscrivono i file in place.
//!
//! ## Architettura dei moduli:
//! - `formats`: Risoluzione formato e tabella dei comandi esterni
//! - `tool_resolver`: Verifica disponibilità dei tool
//! - `image_processor`: Esecuzione del tool su un file
//! - `file_manager`: Discovery immagini e utilità sui file
//! - `optimizer`: Ottimizzazione singolo file e orchestrazione batch
//! - `config`: Configurazione batch e CLI
//! - `error`: Tipi di errore custom
//! - `progress`, `json_output`: Progress bar, statistiche e output JSON
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use shio::{optimize_directory, optimize_file, is_supported};
//!
//! if is_supported("logo.png", None).await {
//!     optimize_file("logo.png", None).await?;
//! }
//! let report = optimize_directory("assets/", true).await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod formats;
pub mod image_processor;
pub mod json_output;
pub mod optimizer;
pub mod progress;
pub mod tool_resolver;

pub use config::Config;
pub use error::OptimizeError;
pub use formats::{ImageFormat, ImageTask};
pub use optimizer::{BatchOptimizer, BatchReport, FileReport, FileStatus, Outcome, TaskOptimizer};

use std::path::Path;

/// Optimize one file in place.
///
/// Unknown formats succeed without running anything. A missing optimizer
/// gives `OptimizeError::MissingDependency`.
pub async fn optimize_file(
    path: impl AsRef<Path>,
    format_hint: Option<&str>,
) -> Result<Outcome, OptimizeError> {
    let task = ImageTask::new(path.as_ref(), format_hint);
    TaskOptimizer::new().optimize(&task).await
}

/// Whether the optimizer needed for this file can be run
pub async fn is_supported(path: impl AsRef<Path>, format_hint: Option<&str>) -> bool {
    let task = ImageTask::new(path.as_ref(), format_hint);
    TaskOptimizer::new().requirements_satisfied(&task).await
}

/// Optimize every PNG/JPEG in a directory, stopping at the first failure
pub async fn optimize_directory(
    path: impl AsRef<Path>,
    recursive: bool,
) -> Result<BatchReport, OptimizeError> {
    let config = Config {
        recursive,
        ..Default::default()
    };
    BatchOptimizer::new(config)?.run(path.as_ref()).await
}
