//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `batch_optimizer`: Orchestratore del batch su una directory
//! - `task_optimizer`: Worker per singoli file

pub mod batch_optimizer;
pub mod task_optimizer;

pub use batch_optimizer::{BatchOptimizer, BatchReport, FileReport, FileStatus};
pub use task_optimizer::{Outcome, TaskOptimizer};
