//! # Image Processing Module
//!
//! Questo modulo esegue il tool esterno di ottimizzazione su un singolo file.
//!
//! ## Architettura Zero-Dependency
//!
//! Nessuna decodifica in memoria: l'ottimizzazione è delegata interamente a
//! tool esterni specializzati, che riscrivono il file **in place**:
//!
//! - **PNG**: `optipng -quiet <path>`
//! - **JPEG**: `jpegoptim <path>`
//! - **Altri**: nessuna operazione
//!
//! ## Error Handling
//!
//! L'invocazione è fire-and-forget: stdout, stderr ed exit status vengono
//! scartati. Errori di spawn ed exit code non zero vengono solo loggati.
//! La verifica delle dipendenze avviene prima, in `TaskOptimizer`.

use crate::formats::ImageTask;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs the external optimizer for one task
#[allow(async_fn_in_trait)]
pub trait OptimizerInvoker {
    /// Optimize the task's file in place. Failures are not reported.
    async fn invoke(&self, task: &ImageTask);
}

/// Invoker that spawns the real optimizer binaries
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl OptimizerInvoker for ImageProcessor {
    async fn invoke(&self, task: &ImageTask) {
        let Some(command) = task.format().optimizer() else {
            debug!("No optimizer for {}, leaving untouched", task.path().display());
            return;
        };

        let args = command.command_args(task.path());
        debug!("Running {} {:?}", command.binary, args);

        let start_time = std::time::Instant::now();
        let result = Command::new(command.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        let elapsed = start_time.elapsed();

        match result {
            Ok(status) if status.success() => {
                debug!("{} optimized with {} in {:?}", task.path().display(), command.binary, elapsed);
            }
            Ok(status) => {
                warn!("{} exited with {} on {}", command.binary, status, task.path().display());
            }
            Err(e) => {
                warn!("Failed to run {} on {}: {}", command.binary, task.path().display(), e);
            }
        }
    }
}
