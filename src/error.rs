//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore dell'applicazione.
//!
//! ## Categorie di errori:
//! - `InvalidDirectory`: la directory del batch non esiste o non è una directory
//! - `MissingDependency`: tool esterno mancante (optipng, jpegoptim)
//! - `Io`: errori di I/O durante la lettura dei metadata
//! - `Validation`: errori di validazione della configurazione
//!
//! Un formato sconosciuto NON è un errore: il file viene semplicemente saltato.
//!
//! ## Esempio:
//! ```rust,ignore
//! if !probe.is_available(ImageFormat::Png).await {
//!     return Err(OptimizeError::MissingDependency("optipng".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for image optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("Directory \"{}\" doesn't exist or is not a directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Validation(String),
}

impl OptimizeError {
    /// Name of the missing binary, if this is a dependency error
    pub fn missing_tool(&self) -> Option<&str> {
        match self {
            Self::MissingDependency(tool) => Some(tool),
            _ => None,
        }
    }
}
