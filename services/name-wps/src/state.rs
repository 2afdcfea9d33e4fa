//! Application state for the WPS service.

use std::sync::Arc;
use tracing::{info, warn};

use name_process::{JsonInputFileGenerator, NameProcess, ValidationMode};

use crate::command_runner::CommandModelRunner;
use crate::config::ServiceConfig;
use crate::tracker::JobTracker;

/// Shared application state.
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Processes offered by this service.
    pub processes: Vec<NameProcess>,

    /// Active and recent jobs.
    pub tracker: JobTracker,
}

impl AppState {
    /// Build the standard process set from configuration.
    pub fn from_config(config: ServiceConfig) -> Self {
        let mode = if config.strict_validation {
            ValidationMode::Strict
        } else {
            ValidationMode::Permissive
        };

        let mut processes =
            vec![NameProcess::basic(Arc::new(JsonInputFileGenerator)).with_validation_mode(mode)];

        match &config.runner {
            Some(runner) => {
                info!(command = %runner.command.display(), "Model runner configured");
                processes.push(
                    NameProcess::advanced(Arc::new(CommandModelRunner::from_config(runner)))
                        .with_validation_mode(mode),
                );
            }
            None => warn!("No model runner configured, advanced process disabled"),
        }

        Self::with_processes(config, processes)
    }

    /// Build state around an explicit process set.
    pub fn with_processes(config: ServiceConfig, processes: Vec<NameProcess>) -> Self {
        Self {
            config,
            processes,
            tracker: JobTracker::default(),
        }
    }

    /// Find a process by identifier (case-insensitive).
    pub fn find_process(&self, identifier: &str) -> Option<&NameProcess> {
        self.processes
            .iter()
            .find(|p| p.identifier().eq_ignore_ascii_case(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;

    #[test]
    fn test_without_runner_only_basic() {
        let state = AppState::from_config(ServiceConfig::default());
        assert_eq!(state.processes.len(), 1);
        assert!(state.find_process("RunName").is_some());
        assert!(state.find_process("runnameadvanced").is_none());
    }

    #[test]
    fn test_with_runner_offers_advanced() {
        let config = ServiceConfig {
            runner: Some(RunnerConfig {
                command: "/opt/name/run.sh".into(),
                args: Vec::new(),
                timeout_secs: 10,
            }),
            ..ServiceConfig::default()
        };
        let state = AppState::from_config(config);
        assert_eq!(state.processes.len(), 2);
        assert!(state.find_process("runnameadvanced").is_some());
    }
}
