//! # File Management Module
//!
//! Questo modulo gestisce la discovery delle immagini e le utilità sui file.
//!
//! ## Responsabilità:
//! - Discovery di immagini in una directory, ricorsiva o solo primo livello
//! - Filtro per estensione condiviso con la risoluzione del formato
//! - Dimensione dei file per le statistiche
//! - Formattazione human-readable delle dimensioni
//!
//! ## Traversal:
//! Un solo `WalkDir`, parametrizzato dalla profondità:
//! - non ricorsivo: `max_depth(1)`, solo le entry immediate
//! - ricorsivo: profondità illimitata
//!
//! Le directory vengono attraversate ma mai restituite. L'ordine è quello
//! del filesystem, non ordinato.
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_images(Path::new("/path/to/images"), true)?;
//! for file in files {
//!     optimizer.optimize(&ImageTask::new(file, None)).await?;
//! }
//! ```

use crate::error::OptimizeError;
use crate::formats::ImageFormat;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Lazily list the PNG/JPEG files under `root`.
    ///
    /// Fails with `InvalidDirectory` before traversing anything if `root`
    /// is missing or not a directory.
    pub fn image_entries(
        root: &Path,
        recursive: bool,
    ) -> Result<impl Iterator<Item = PathBuf>, OptimizeError> {
        if !root.is_dir() {
            return Err(OptimizeError::InvalidDirectory(root.to_path_buf()));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };

        let entries = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(Self::is_regular_file)
            .filter(|entry| Self::is_supported_format(entry.path()))
            .map(DirEntry::into_path);

        Ok(entries)
    }

    /// Find all supported images in a directory
    pub fn find_images(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, OptimizeError> {
        Ok(Self::image_entries(root, recursive)?.collect())
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        ImageFormat::from_path(path).is_known()
    }

    // Symlinks count when they point at a regular file
    fn is_regular_file(entry: &DirEntry) -> bool {
        entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
    }

    /// Size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64, OptimizeError> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.png"), b"png").unwrap();
        fs::write(root.join("b.PNG"), b"png").unwrap();
        fs::write(root.join("c.txt"), b"text").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("d.jpg"), b"jpg").unwrap();
        temp_dir
    }

    fn relative_set(root: &Path, files: Vec<PathBuf>) -> HashSet<PathBuf> {
        files
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect()
    }

    #[test]
    fn test_non_recursive_scan() {
        let temp_dir = sample_tree();
        let files = FileManager::find_images(temp_dir.path(), false).unwrap();

        let expected: HashSet<PathBuf> = ["a.png", "b.PNG"].iter().map(PathBuf::from).collect();
        assert_eq!(relative_set(temp_dir.path(), files), expected);
    }

    #[test]
    fn test_recursive_scan() {
        let temp_dir = sample_tree();
        let files = FileManager::find_images(temp_dir.path(), true).unwrap();

        let expected: HashSet<PathBuf> = ["a.png", "b.PNG", "sub/d.jpg"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(relative_set(temp_dir.path(), files), expected);
    }

    #[test]
    fn test_directories_with_image_names_are_not_returned() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("album.jpeg")).unwrap();
        fs::write(temp_dir.path().join("album.jpeg").join("inner.JPEG"), b"jpg").unwrap();

        let files = FileManager::find_images(temp_dir.path(), true).unwrap();
        assert_eq!(
            relative_set(temp_dir.path(), files),
            HashSet::from([PathBuf::from("album.jpeg/inner.JPEG")])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("real.bin"), b"png").unwrap();
        fs::create_dir(root.join("d")).unwrap();
        fs::write(root.join("d").join("in.jpg"), b"jpg").unwrap();

        symlink(root.join("real.bin"), root.join("link.png")).unwrap();
        symlink(root.join("d"), root.join("dirlink")).unwrap();
        symlink(root.join("missing.png"), root.join("dangling.png")).unwrap();

        let files = FileManager::find_images(root, true).unwrap();
        assert_eq!(
            relative_set(root, files),
            HashSet::from([PathBuf::from("d/in.jpg"), PathBuf::from("link.png")])
        );
    }

    #[test]
    fn test_missing_directory_is_invalid() {
        let result = FileManager::find_images(Path::new("/does/not/exist"), false);
        assert!(matches!(result, Err(OptimizeError::InvalidDirectory(_))));
    }

    #[test]
    fn test_file_root_is_invalid() {
        let temp_dir = sample_tree();
        let result = FileManager::find_images(&temp_dir.path().join("a.png"), true);
        assert!(matches!(result, Err(OptimizeError::InvalidDirectory(_))));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
        assert_eq!(FileManager::calculate_reduction(200, 150), 25.0);
    }
}
