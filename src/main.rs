//! # Shio - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Unione di file di configurazione e flag CLI
//! - Dispatch su singolo file o directory
//!
//! ## Esempio di utilizzo:
//! ```bash
//! shio ./assets --recursive --workers 4
//! shio logo.png
//! shio --check-tools
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shio::file_manager::FileManager;
use shio::json_output::JsonMessage;
use shio::tool_resolver::{install_instructions, ToolResolver};
use shio::{BatchOptimizer, Config, FileStatus, ImageTask, OptimizeError, TaskOptimizer};

#[derive(Parser)]
#[command(name = "shio")]
#[command(about = "Losslessly optimize PNG and JPEG images in place with optipng and jpegoptim")]
struct Args {
    /// Image file or directory to optimize
    #[arg(required_unless_present = "check_tools")]
    path: Option<PathBuf>,

    /// Force the image format (png, jpg, jpeg) instead of using the extension.
    /// Single files only; rejected for directories
    #[arg(short, long)]
    format: Option<String>,

    /// Also optimize images in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Number of images optimized in parallel. Without --keep-going a failure
    /// aborts the batch and per-file results of in-flight images are not reported
    #[arg(short, long)]
    workers: Option<usize>,

    /// Keep going after a failed image and report all failures at the end
    #[arg(long)]
    keep_going: bool,

    /// Dry run - check tools and list images without modifying them
    #[arg(long)]
    dry_run: bool,

    /// Output progress and results as JSON lines
    #[arg(long)]
    json: bool,

    /// Report which optimizers are installed and exit
    #[arg(long)]
    check_tools: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    async fn load_config(&self) -> Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::from_file(path).await?,
            None => Config::default(),
        };

        config.recursive |= self.recursive;
        config.keep_going |= self.keep_going;
        config.dry_run |= self.dry_run;
        config.json_output |= self.json;
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.format.is_some() {
            config.format_hint = self.format.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for JSON output
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.check_tools {
        print!("{}", ToolResolver::new().get_tools_report().await);
        return Ok(());
    }

    let config = args.load_config().await?;
    let Some(path) = args.path else {
        return Err(anyhow::anyhow!("No path given"));
    };

    let started = Instant::now();
    let result = run(&path, &config).await;

    if let Err(ref e) = result {
        if config.json_output {
            JsonMessage::error(e.to_string()).emit();
        }
        return result;
    }

    info!("Done in {:.2?}", started.elapsed());
    Ok(())
}

/// A regular file is optimized alone, anything else is treated as a batch root
async fn run(path: &Path, config: &Config) -> Result<()> {
    if path.is_file() {
        return run_single(path, config).await;
    }
    if let Some(ref hint) = config.format_hint {
        anyhow::bail!(
            "--format {} applies to single files only, {} is not a file",
            hint,
            path.display()
        );
    }
    run_batch(path, config).await
}

async fn run_single(path: &Path, config: &Config) -> Result<()> {
    let task = ImageTask::new(path, config.format_hint.as_deref());
    let optimizer = TaskOptimizer::new();
    let original_size = FileManager::file_size(path).await?;

    let file = optimizer
        .file_report(&task, original_size, config.dry_run)
        .await
        .map_err(explain)?;

    if config.json_output {
        JsonMessage::file_complete(&file).emit();
        return Ok(());
    }

    match file.status {
        FileStatus::Optimized { optimized_size } => info!(
            "✅ {}: {} → {} ({:.2}% saved)",
            path.display(),
            FileManager::format_size(original_size),
            FileManager::format_size(optimized_size),
            file.reduction_percent().unwrap_or_default()
        ),
        FileStatus::Planned => info!("📋 {}: would optimize as {}", path.display(), task.format()),
        _ => info!("⏩ {}: not a PNG or JPEG image, left untouched", path.display()),
    }
    Ok(())
}

async fn run_batch(path: &Path, config: &Config) -> Result<()> {
    let started = Instant::now();
    let optimizer = BatchOptimizer::new(config.clone())?.with_progress(!config.json_output);
    let report = optimizer.run(path).await.map_err(explain)?;
    let stats = report.stats();

    if config.json_output {
        JsonMessage::complete(&stats, started.elapsed().as_secs_f64()).emit();
    }

    for failure in report.failures() {
        if let FileStatus::Failed { ref error } = failure.status {
            tracing::warn!("❌ {}: {}", failure.path.display(), error);
        }
    }

    if stats.errors > 0 {
        anyhow::bail!("{} of {} images failed", stats.errors, stats.files_processed);
    }
    Ok(())
}

/// Attach install instructions to dependency errors
fn explain(err: OptimizeError) -> anyhow::Error {
    match err.missing_tool() {
        Some(tool) => anyhow::anyhow!(
            "{}\nPlease install {} first: {}",
            err,
            tool,
            install_instructions(tool)
        ),
        None => err.into(),
    }
}
