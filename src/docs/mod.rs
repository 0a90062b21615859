use crate::error::CliError;
use indicatif::ProgressBar;
use log::{debug, info};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

const BUILD_TARGET: &str = "deploy";

/// Outcome of one document build: exit status plus captured output, so the
/// caller can show the tool's own diagnostics on failure.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// External document build, invoked before any release step runs.
#[cfg_attr(test, mockall::automock)]
pub trait DocsBuilder {
    fn build(&self) -> Result<BuildReport, CliError>;
}

/// Runs `make deploy` in the configured docs directory.
pub struct MakeDocsBuilder {
    dir: PathBuf,
}

impl MakeDocsBuilder {
    pub fn new(dir: PathBuf) -> Self {
        MakeDocsBuilder { dir }
    }
}

impl DocsBuilder for MakeDocsBuilder {
    fn build(&self) -> Result<BuildReport, CliError> {
        let makefile = self.dir.join("Makefile");
        if !makefile.exists() {
            return Err(CliError::DocsBuildFailed(format!(
                "Makefile not found at {}",
                makefile.display()
            )));
        }

        info!("📄 Building document in {}", self.dir.display());
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("make deploy");
        spinner.enable_steady_tick(Duration::from_millis(120));

        let output = Command::new("make")
            .arg(BUILD_TARGET)
            .current_dir(&self.dir)
            .output();
        spinner.finish_and_clear();

        let output = output.map_err(|e| {
            CliError::DocsBuildFailed(format!("could not run make: {}", e))
        })?;

        let report = BuildReport {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "Document build finished (success: {}, {} bytes of stdout)",
            report.success,
            report.stdout.len()
        );
        Ok(report)
    }
}
