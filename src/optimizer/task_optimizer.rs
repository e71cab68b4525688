//! # Task Optimizer Module
//!
//! Ottimizzazione di un singolo file: verifica delle dipendenze, poi
//! invocazione del tool esterno.
//!
//! Stati: `Start → RequirementChecked → {Invoked | Skipped}`.

use crate::{
    error::OptimizeError,
    file_manager::FileManager,
    formats::{ImageFormat, ImageTask},
    image_processor::{ImageProcessor, OptimizerInvoker},
    optimizer::batch_optimizer::{FileReport, FileStatus},
    tool_resolver::{ToolProbe, ToolResolver},
};
use serde::Serialize;
use tracing::debug;

/// Terminal state of a single-file run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The optimizer ran on the file
    Optimized,
    /// Unknown format, nothing was run
    Skipped,
}

/// Worker per l'ottimizzazione di singoli file
#[derive(Debug, Clone, Default)]
pub struct TaskOptimizer<P = ToolResolver, I = ImageProcessor> {
    probe: P,
    invoker: I,
}

impl TaskOptimizer {
    /// Optimizer backed by the real binaries
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ToolProbe, I: OptimizerInvoker> TaskOptimizer<P, I> {
    pub fn with_parts(probe: P, invoker: I) -> Self {
        Self { probe, invoker }
    }

    /// The binary required for `format` that cannot be run, if any
    pub async fn missing_tool(&self, format: ImageFormat) -> Option<&'static str> {
        let command = format.optimizer()?;
        if self.probe.is_available(format).await {
            None
        } else {
            Some(command.binary)
        }
    }

    /// Pre-flight query; never fails and never runs the optimizer
    pub async fn requirements_satisfied(&self, task: &ImageTask) -> bool {
        self.missing_tool(task.format()).await.is_none()
    }

    pub async fn check_requirements(&self, task: &ImageTask) -> Result<(), OptimizeError> {
        match self.missing_tool(task.format()).await {
            Some(tool) => Err(OptimizeError::MissingDependency(tool.to_string())),
            None => Ok(()),
        }
    }

    /// Optimize one file in place
    pub async fn optimize(&self, task: &ImageTask) -> Result<Outcome, OptimizeError> {
        self.check_requirements(task).await?;

        if !task.format().is_known() {
            debug!("Skipping {} (unknown format)", task.path().display());
            return Ok(Outcome::Skipped);
        }

        self.invoker.invoke(task).await;
        Ok(Outcome::Optimized)
    }

    /// Optimize `task`, or on a dry run only check it, and describe the result.
    ///
    /// A dry run reports unknown formats as `Skipped`, since nothing would
    /// run on them.
    pub async fn file_report(
        &self,
        task: &ImageTask,
        original_size: u64,
        dry_run: bool,
    ) -> Result<FileReport, OptimizeError> {
        let status = if dry_run {
            if task.format().is_known() {
                self.check_requirements(task).await?;
                FileStatus::Planned
            } else {
                FileStatus::Skipped
            }
        } else {
            match self.optimize(task).await? {
                Outcome::Optimized => FileStatus::Optimized {
                    optimized_size: FileManager::file_size(task.path()).await?,
                },
                Outcome::Skipped => FileStatus::Skipped,
            }
        };

        Ok(FileReport {
            path: task.path().to_path_buf(),
            format: task.format(),
            original_size,
            status,
        })
    }
}
