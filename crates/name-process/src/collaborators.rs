//! Capabilities the processes call out to: the input-file generator and
//! the model runner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wps_common::WpsError;

use crate::assembler::RunConfiguration;

/// Renders a run configuration into a model input document.
pub trait InputFileGenerator: Send + Sync {
    fn generate(&self, config: &RunConfiguration) -> Result<String, WpsError>;
}

/// Writes the configuration as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonInputFileGenerator;

impl InputFileGenerator for JsonInputFileGenerator {
    fn generate(&self, config: &RunConfiguration) -> Result<String, WpsError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| WpsError::CollaboratorFailure(format!("Failed to render input file: {}", e)))
    }
}

/// What a completed model run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRunResult {
    /// Directory holding the run outputs.
    pub outdir: PathBuf,
    /// Zipped results, without the ".zip" suffix.
    #[serde(rename = "archive")]
    pub archive_base: PathBuf,
    /// Preview image.
    pub mapfile: PathBuf,
}

/// Runs the NAME model for a configuration.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    async fn run(&self, config: &RunConfiguration, workdir: &Path)
        -> Result<ModelRunResult, WpsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_generator_renders_object() {
        let doc = JsonInputFileGenerator
            .generate(&RunConfiguration::default())
            .unwrap();
        assert_eq!(doc, "{}");
    }

    #[test]
    fn test_run_result_wire_names() {
        let json = r#"{"outdir": "/runs/1", "archive": "/runs/1/out", "mapfile": "/runs/1/map.png"}"#;
        let result: ModelRunResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.archive_base, PathBuf::from("/runs/1/out"));
    }
}
