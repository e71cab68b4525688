//! # Tool Availability
//!
//! Probes whether the external optimizer for a format can be started.
//! A probe runs the tool's version flag (`optipng -v`, `jpegoptim -V`);
//! spawning at all counts as available, whatever the exit code.

use crate::formats::ImageFormat;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Answers "can the optimizer for this format be run?"
#[allow(async_fn_in_trait)]
pub trait ToolProbe {
    /// Never fails; a missing binary is simply `false`.
    async fn is_available(&self, format: ImageFormat) -> bool;
}

/// Probe backed by the real binaries on PATH
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolResolver;

impl ToolResolver {
    pub fn new() -> Self {
        Self
    }

    /// Spawn `binary flag` and report whether the process could be started
    pub async fn probe(&self, binary: &str, flag: &str) -> bool {
        let result = Command::new(binary)
            .arg(flag)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(status) => {
                debug!("Probe {} {} exited with {}", binary, flag, status);
                true
            }
            Err(e) => {
                debug!("Probe {} {} failed to spawn: {}", binary, flag, e);
                false
            }
        }
    }

    /// Get a report of tool availability
    pub async fn get_tools_report(&self) -> String {
        let mut report = String::from("Tool Availability:\n");

        for format in [ImageFormat::Png, ImageFormat::Jpeg] {
            let Some(command) = format.optimizer() else {
                continue;
            };
            if self.is_available(format).await {
                report.push_str(&format!("  ✅ {} ({})\n", command.binary, format));
            } else {
                report.push_str(&format!(
                    "  ❌ {} ({}) - install with: {}\n",
                    command.binary,
                    format,
                    install_instructions(command.binary)
                ));
            }
        }

        report
    }
}

impl ToolProbe for ToolResolver {
    async fn is_available(&self, format: ImageFormat) -> bool {
        match format.optimizer() {
            Some(command) => self.probe(command.binary, command.version_flag).await,
            None => true,
        }
    }
}

/// Get installation instructions for a tool on Linux
pub fn install_instructions(tool_name: &str) -> String {
    match tool_name {
        "optipng" => "sudo apt-get install optipng".to_string(),
        "jpegoptim" => "sudo apt-get install jpegoptim".to_string(),
        _ => format!("sudo apt-get install {}", tool_name),
    }
}
