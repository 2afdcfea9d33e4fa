//! Model runner that shells out to an external NAME launcher.
//!
//! The launcher receives the run configuration as JSON on stdin and must
//! print `{"outdir": ..., "archive": ..., "mapfile": ...}` on stdout.
//! Relative paths in that reply are resolved against the job directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use name_process::{ModelRunResult, ModelRunner, RunConfiguration};
use wps_common::WpsError;

use crate::config::RunnerConfig;

/// Runs the configured executable once per request.
#[derive(Debug, Clone)]
pub struct CommandModelRunner {
    command: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandModelRunner {
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

fn failure(message: impl Into<String>) -> WpsError {
    WpsError::CollaboratorFailure(message.into())
}

fn resolve(workdir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        workdir.join(path)
    }
}

#[async_trait]
impl ModelRunner for CommandModelRunner {
    #[instrument(skip(self, config, workdir), fields(command = %self.command.display(), workdir = %workdir.display()))]
    async fn run(
        &self,
        config: &RunConfiguration,
        workdir: &Path,
    ) -> Result<ModelRunResult, WpsError> {
        let input = serde_json::to_vec(config)
            .map_err(|e| failure(format!("Failed to encode run configuration: {}", e)))?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .current_dir(workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| failure(format!("Failed to start {}: {}", self.command.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&input).await {
                Ok(()) => {}
                // Launcher exited without reading stdin; its exit status decides.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("Model runner closed stdin early");
                }
                Err(e) => return Err(failure(format!("Failed to send configuration: {}", e))),
            }
        }

        debug!("Model run started");

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| failure(format!("Model run timed out after {:?}", self.timeout)))?
            .map_err(|e| failure(format!("Model run failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "Model run exited with error");
            return Err(failure(format!(
                "Model run exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let result: ModelRunResult = serde_json::from_slice(&output.stdout)
            .map_err(|e| failure(format!("Unexpected model runner output: {}", e)))?;

        info!(outdir = %result.outdir.display(), "Model run finished");

        Ok(ModelRunResult {
            outdir: resolve(workdir, result.outdir),
            archive_base: resolve(workdir, result.archive_base),
            mapfile: resolve(workdir, result.mapfile),
        })
    }
}
