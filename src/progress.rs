//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce la progress bar e le statistiche di un batch.
//!
//! ## Componenti principali:
//! - `ProgressManager`: progress bar `indicatif` con un tick per file
//! - `OptimizationStats`: statistiche cumulative del batch
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_optimized**: File su cui è stato eseguito l'ottimizzatore
//! - **files_skipped**: File non toccati (dry run, formato sconosciuto)
//! - **total_bytes_saved**: Byte totali risparmiati
//! - **total_original_size**: Dimensione totale file originali
//! - **errors**: Numero di errori durante processing
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:04] [========================================] 12/12 (100%) ✅ photo.png: 18.4% saved
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a batch
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        // Keeps indicatif's default style if the template is rejected
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for optimization results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub files_optimized: usize,
    pub files_skipped: usize,
    pub total_bytes_saved: u64,
    pub total_original_size: u64,
    pub errors: usize,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_optimized(&mut self, original_size: u64, new_size: u64) {
        self.files_processed += 1;
        self.files_optimized += 1;
        self.total_original_size += original_size;
        self.total_bytes_saved += original_size.saturating_sub(new_size);
    }

    pub fn add_skipped(&mut self, original_size: u64) {
        self.files_processed += 1;
        self.files_skipped += 1;
        self.total_original_size += original_size;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(
            self.total_original_size,
            self.total_original_size - self.total_bytes_saved,
        )
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Optimized: {} | Skipped: {} | Errors: {} | Total saved: {} ({:.2}%)",
            self.files_processed,
            self.files_optimized,
            self.files_skipped,
            self.errors,
            FileManager::format_size(self.total_bytes_saved),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let mut stats = OptimizationStats::new();
        stats.add_optimized(1000, 750);
        stats.add_optimized(1000, 1000);
        stats.add_skipped(2000);
        stats.add_error();

        assert_eq!(stats.files_processed, 4);
        assert_eq!(stats.files_optimized, 2);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_bytes_saved, 250);
        assert_eq!(stats.total_original_size, 4000);
        assert!((stats.overall_reduction_percent() - 6.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grown_file_saves_nothing() {
        let mut stats = OptimizationStats::new();
        stats.add_optimized(100, 120);
        assert_eq!(stats.total_bytes_saved, 0);
    }

    #[test]
    fn test_summary_format() {
        let mut stats = OptimizationStats::new();
        stats.add_optimized(2048, 1024);

        assert_eq!(
            stats.format_summary(),
            "Processed: 1 files | Optimized: 1 | Skipped: 0 | Errors: 0 | Total saved: 1.00 KB (50.00%)"
        );
    }

    #[test]
    fn test_empty_stats_have_no_reduction() {
        assert_eq!(OptimizationStats::new().overall_reduction_percent(), 0.0);
    }
}
