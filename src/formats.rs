//! # Image Formats Module
//!
//! Questo modulo classifica le immagini e associa ad ogni formato il suo
//! ottimizzatore esterno.
//!
//! ## Responsabilità:
//! - Risoluzione del formato da hint esplicito o estensione (case-insensitive)
//! - Tabella unica formato → comando esterno (`optipng`, `jpegoptim`)
//! - Definizione di `ImageTask`, l'unità di lavoro per un singolo file
//!
//! ## Formati supportati:
//! | Formato | Estensioni    | Tool        | Probe           | Comando                  |
//! |---------|---------------|-------------|-----------------|--------------------------|
//! | PNG     | png           | optipng     | `optipng -v`    | `optipng -quiet <path>`  |
//! | JPEG    | jpg, jpeg     | jpegoptim   | `jpegoptim -V`  | `jpegoptim <path>`       |
//! | Altri   | -             | -           | -               | nessuna operazione       |

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// External command used to optimize one format in place
#[derive(Debug, PartialEq, Eq)]
pub struct OptimizerCommand {
    /// Binary looked up on PATH
    pub binary: &'static str,
    /// Flag used by the availability probe
    pub version_flag: &'static str,
    /// Arguments placed before the target path
    pub args: &'static [&'static str],
}

impl OptimizerCommand {
    /// Full argument list for optimizing `path`
    pub fn command_args(&self, path: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(path.as_os_str().to_os_string()))
            .collect()
    }
}

static OPTIPNG: OptimizerCommand = OptimizerCommand {
    binary: "optipng",
    version_flag: "-v",
    args: &["-quiet"],
};

// jpegoptim spells its version flag in upper case
static JPEGOPTIM: OptimizerCommand = OptimizerCommand {
    binary: "jpegoptim",
    version_flag: "-V",
    args: &[],
};

/// Image format as far as optimization is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Unknown,
}

impl ImageFormat {
    /// Map a bare extension or hint (`"PNG"`, `"jpg"`, ...) to a format
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            _ => Self::Unknown,
        }
    }

    /// Derive the format from the text after the last `.` of the file name.
    ///
    /// Names without a dot are `Unknown`. A bare `.png` counts as PNG.
    pub fn from_path(path: &Path) -> Self {
        let Some(name) = path.file_name() else {
            return Self::Unknown;
        };
        match name.to_string_lossy().rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unknown,
        }
    }

    /// Resolve a format, letting a non-empty hint override the extension
    pub fn resolve(path: &Path, hint: Option<&str>) -> Self {
        match hint {
            Some(hint) if !hint.is_empty() => Self::from_extension(hint),
            _ => Self::from_path(path),
        }
    }

    /// The optimizer for this format, `None` for unknown formats
    pub fn optimizer(self) -> Option<&'static OptimizerCommand> {
        match self {
            Self::Png => Some(&OPTIPNG),
            Self::Jpeg => Some(&JPEGOPTIM),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A single file selected for optimization.
///
/// The format is resolved once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    path: PathBuf,
    format: ImageFormat,
}

impl ImageTask {
    pub fn new(path: impl Into<PathBuf>, hint: Option<&str>) -> Self {
        let path = path.into();
        let format = ImageFormat::resolve(&path, hint);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension_any_case() {
        for name in ["a.png", "a.PNG", "dir/b.Png"] {
            assert_eq!(ImageFormat::from_path(Path::new(name)), ImageFormat::Png, "{name}");
        }
        for name in ["a.jpg", "a.JPEG", "x/y.JpG", "photo.jpeg"] {
            assert_eq!(ImageFormat::from_path(Path::new(name)), ImageFormat::Jpeg, "{name}");
        }
        for name in ["a.gif", "a.txt", "archive.png.bak", "a.webp"] {
            assert_eq!(ImageFormat::from_path(Path::new(name)), ImageFormat::Unknown, "{name}");
        }
    }

    #[test]
    fn test_format_without_dot_is_unknown() {
        assert_eq!(ImageFormat::from_path(Path::new("README")), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_path(Path::new("some.dir/png")), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_path(Path::new("")), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_path(Path::new("/")), ImageFormat::Unknown);
    }

    #[test]
    fn test_dotfile_uses_text_after_dot() {
        assert_eq!(ImageFormat::from_path(Path::new(".png")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("trailing.")), ImageFormat::Unknown);
    }

    #[test]
    fn test_hint_overrides_extension() {
        let path = Path::new("picture.png");
        assert_eq!(ImageFormat::resolve(path, Some("jpg")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::resolve(path, Some("JPEG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::resolve(path, Some("gif")), ImageFormat::Unknown);
        assert_eq!(ImageFormat::resolve(Path::new("noext"), Some("Png")), ImageFormat::Png);
        // empty hint falls back to the extension
        assert_eq!(ImageFormat::resolve(path, Some("")), ImageFormat::Png);
        assert_eq!(ImageFormat::resolve(path, None), ImageFormat::Png);
    }

    #[test]
    fn test_optimizer_table() {
        let png = ImageFormat::Png.optimizer().unwrap();
        assert_eq!(png.binary, "optipng");
        assert_eq!(png.version_flag, "-v");
        assert_eq!(
            png.command_args(Path::new("/tmp/a.png")),
            vec![OsString::from("-quiet"), OsString::from("/tmp/a.png")]
        );

        let jpeg = ImageFormat::Jpeg.optimizer().unwrap();
        assert_eq!(jpeg.binary, "jpegoptim");
        assert_eq!(jpeg.version_flag, "-V");
        assert_eq!(
            jpeg.command_args(Path::new("b c.jpg")),
            vec![OsString::from("b c.jpg")]
        );

        assert!(ImageFormat::Unknown.optimizer().is_none());
    }

    #[test]
    fn test_image_task_resolves_eagerly() {
        let task = ImageTask::new("photos/IMG_001.JPG", None);
        assert_eq!(task.format(), ImageFormat::Jpeg);
        assert_eq!(task.path(), Path::new("photos/IMG_001.JPG"));

        let task = ImageTask::new("photos/IMG_001.JPG", Some("png"));
        assert_eq!(task.format(), ImageFormat::Png);
    }
}
