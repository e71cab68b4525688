//! # Batch Optimizer Module
//!
//! Orchestratore del batch: discovery → ottimizzazione per file → report.
//!
//! ## Flusso di esecuzione:
//! 1. **File discovery**: `FileManager::image_entries` (fallisce con `InvalidDirectory`)
//! 2. **Processing**: ogni file diventa un `ImageTask` e passa a `TaskOptimizer`
//! 3. **Tracking**: dimensioni prima/dopo, progress bar, messaggi JSON
//!
//! ## Gestione errori:
//! - Default (fail-fast): il primo errore ferma il dispatch e viene restituito.
//!   I file già processati restano ottimizzati.
//! - `keep_going`: ogni errore viene registrato nel report e il batch continua.
//!
//! ## Concorrenza:
//! Fino a `config.workers` file in parallelo (default 1, sequenziale).
//! I risultati mantengono l'ordine di traversal.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    formats::{ImageFormat, ImageTask},
    image_processor::{ImageProcessor, OptimizerInvoker},
    json_output::JsonMessage,
    optimizer::task_optimizer::TaskOptimizer,
    progress::{OptimizationStats, ProgressManager},
    tool_resolver::{ToolProbe, ToolResolver},
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

/// What happened to one file of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Optimized { optimized_size: u64 },
    /// Dry run: requirements satisfied, optimizer not run
    Planned,
    Skipped,
    Failed { error: String },
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Optimized { .. } => "optimized",
            Self::Planned => "planned",
            Self::Skipped => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub original_size: u64,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    fn failed(task: &ImageTask, original_size: u64, error: &OptimizeError) -> Self {
        Self {
            path: task.path().to_path_buf(),
            format: task.format(),
            original_size,
            status: FileStatus::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn reduction_percent(&self) -> Option<f64> {
        match self.status {
            FileStatus::Optimized { optimized_size } => Some(FileManager::calculate_reduction(
                self.original_size,
                optimized_size,
            )),
            _ => None,
        }
    }

    fn progress_message(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match &self.status {
            FileStatus::Optimized { .. } => format!(
                "✅ {}: {:.1}% saved",
                name,
                self.reduction_percent().unwrap_or_default()
            ),
            FileStatus::Planned => format!("📋 {}: would optimize", name),
            FileStatus::Skipped => format!("⏩ {}: skipped", name),
            FileStatus::Failed { error } => format!("❌ {}: {}", name, error),
        }
    }
}

/// Result of a whole batch, in traversal order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn stats(&self) -> OptimizationStats {
        let mut stats = OptimizationStats::new();
        for file in &self.files {
            match file.status {
                FileStatus::Optimized { optimized_size } => {
                    stats.add_optimized(file.original_size, optimized_size)
                }
                FileStatus::Planned | FileStatus::Skipped => stats.add_skipped(file.original_size),
                FileStatus::Failed { .. } => stats.add_error(),
            }
        }
        stats
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Batch orchestrator
pub struct BatchOptimizer<P = ToolResolver, I = ImageProcessor> {
    config: Config,
    task_optimizer: TaskOptimizer<P, I>,
    show_progress: bool,
}

impl BatchOptimizer {
    /// Create a batch optimizer backed by the real binaries
    pub fn new(config: Config) -> Result<Self, OptimizeError> {
        Self::with_optimizer(config, TaskOptimizer::new())
    }
}

impl<P: ToolProbe, I: OptimizerInvoker> BatchOptimizer<P, I> {
    pub fn with_optimizer(
        config: Config,
        task_optimizer: TaskOptimizer<P, I>,
    ) -> Result<Self, OptimizeError> {
        config.validate()?;
        Ok(Self {
            config,
            task_optimizer,
            show_progress: false,
        })
    }

    /// Draw an `indicatif` progress bar while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Optimize every image under `root`
    pub async fn run(&self, root: &Path) -> Result<BatchReport, OptimizeError> {
        info!(
            "Starting image optimization in: {} ({})",
            root.display(),
            if self.config.recursive { "recursive" } else { "top level only" }
        );

        let files = FileManager::find_images(root, self.config.recursive)?;
        info!("Found {} images to process", files.len());

        if self.config.json_output {
            JsonMessage::start(root.to_path_buf(), self.config.recursive, files.len()).emit();
        }
        if self.config.dry_run {
            info!("🧪 Dry run mode: No files will be modified");
        }

        let mut report = BatchReport {
            root: root.to_path_buf(),
            files: Vec::with_capacity(files.len()),
        };
        if files.is_empty() {
            return Ok(report);
        }

        let progress = self
            .show_progress
            .then(|| ProgressManager::new(files.len() as u64));

        let abort = AtomicBool::new(false);
        let mut first_error = None;

        let mut results = stream::iter(files)
            .map(|path| self.process_file(path, &abort))
            .buffered(self.config.workers);

        while let Some(result) = results.next().await {
            // Not attempted because an earlier file failed
            let Some((task, original_size, result)) = result else {
                continue;
            };

            let file = match result {
                Ok(file) => file,
                Err(e) if self.config.keep_going => {
                    warn!("Failed to optimize {}: {}", task.path().display(), e);
                    FileReport::failed(&task, original_size, &e)
                }
                Err(e) => {
                    error!("Aborting batch at {}: {}", task.path().display(), e);
                    abort.store(true, Ordering::SeqCst);
                    first_error.get_or_insert(e);
                    continue;
                }
            };

            if let Some(ref progress) = progress {
                progress.update(&file.progress_message());
            }
            if self.config.json_output {
                JsonMessage::file_complete(&file).emit();
            }
            report.files.push(file);
        }

        if let Some(ref progress) = progress {
            progress.finish(&report.stats().format_summary());
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("{}", report.stats().format_summary());
                Ok(report)
            }
        }
    }

    async fn process_file(
        &self,
        path: PathBuf,
        abort: &AtomicBool,
    ) -> Option<(ImageTask, u64, Result<FileReport, OptimizeError>)> {
        if abort.load(Ordering::SeqCst) {
            debug!("Not attempting {} after earlier failure", path.display());
            return None;
        }

        let task = ImageTask::new(path, None);
        let original_size = match FileManager::file_size(task.path()).await {
            Ok(size) => size,
            Err(e) => return Some((task, 0, Err(e))),
        };
        let result = self
            .task_optimizer
            .file_report(&task, original_size, self.config.dry_run)
            .await;
        Some((task, original_size, result))
    }
}
