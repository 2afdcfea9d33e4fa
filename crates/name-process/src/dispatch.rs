//! Output dispatch: what happens to an assembled configuration.
//!
//! Each process variant owns one dispatcher. Dispatchers hold no state
//! between requests; each call does exactly one write or one model run.

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use wps_common::WpsError;

use crate::assembler::RunConfiguration;
use crate::collaborators::{InputFileGenerator, ModelRunner};

/// Name of the document written by the file-emission variant.
pub const INPUT_FILE_NAME: &str = "out.txt";

/// Declared output of a process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDescriptor {
    pub identifier: &'static str,
    pub title: &'static str,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'static str>,
    pub as_reference: bool,
}

/// Value placed in a named output slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputValue {
    Literal { data: String },
    Reference { href: String, mime_type: String },
}

/// One filled output slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutput {
    pub identifier: String,
    #[serde(flatten)]
    pub value: OutputValue,
}

impl ProcessOutput {
    pub fn literal(identifier: &str, data: impl Into<String>) -> Self {
        Self {
            identifier: identifier.to_string(),
            value: OutputValue::Literal { data: data.into() },
        }
    }

    pub fn reference(identifier: &str, href: impl Into<String>, mime_type: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            value: OutputValue::Reference {
                href: href.into(),
                mime_type: mime_type.to_string(),
            },
        }
    }
}

/// Consumes a completed configuration and fills the response outputs.
#[async_trait]
pub trait OutputDispatcher: Send + Sync {
    /// Outputs this dispatcher fills, for process descriptions.
    fn output_descriptors(&self) -> Vec<OutputDescriptor>;

    async fn dispatch(
        &self,
        config: &RunConfiguration,
        workdir: &Path,
    ) -> Result<Vec<ProcessOutput>, WpsError>;
}

/// Collaborator errors are always reported as collaborator failures.
fn collaborator_failure(err: WpsError) -> WpsError {
    match err {
        WpsError::CollaboratorFailure(_) => err,
        other => WpsError::CollaboratorFailure(other.to_string()),
    }
}

/// Renders the configuration to a document and reports it as the sole output.
pub struct FileEmissionDispatcher {
    generator: Arc<dyn InputFileGenerator>,
}

impl FileEmissionDispatcher {
    pub const OUTPUT: &'static str = "output";

    pub fn new(generator: Arc<dyn InputFileGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl OutputDispatcher for FileEmissionDispatcher {
    fn output_descriptors(&self) -> Vec<OutputDescriptor> {
        vec![OutputDescriptor {
            identifier: Self::OUTPUT,
            title: "params",
            abstract_: Some("Input parameters in JSON format"),
            mime_type: Some("text/plain"),
            as_reference: true,
        }]
    }

    #[instrument(skip_all, fields(workdir = %workdir.display()))]
    async fn dispatch(
        &self,
        config: &RunConfiguration,
        workdir: &Path,
    ) -> Result<Vec<ProcessOutput>, WpsError> {
        let document = self.generator.generate(config).map_err(collaborator_failure)?;

        let path = workdir.join(INPUT_FILE_NAME);
        tokio::fs::write(&path, document.as_bytes())
            .await
            .map_err(|e| {
                WpsError::CollaboratorFailure(format!(
                    "Failed to write {}: {}",
                    path.display(),
                    e
                ))
            })?;

        info!(path = %path.display(), bytes = document.len(), "Wrote model input file");

        Ok(vec![ProcessOutput::reference(
            Self::OUTPUT,
            path.display().to_string(),
            "text/plain",
        )])
    }
}

/// Runs the model and maps its three results onto named outputs.
pub struct ModelInvocationDispatcher {
    runner: Arc<dyn ModelRunner>,
}

impl ModelInvocationDispatcher {
    pub const FILE_DIR: &'static str = "FileDir";
    pub const FILE_CONTENTS: &'static str = "FileContents";
    pub const EXAMPLE_PLOT: &'static str = "ExamplePlot";

    pub fn new(runner: Arc<dyn ModelRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl OutputDispatcher for ModelInvocationDispatcher {
    fn output_descriptors(&self) -> Vec<OutputDescriptor> {
        vec![
            OutputDescriptor {
                identifier: Self::FILE_DIR,
                title: "Output Directory",
                abstract_: Some("Location of the model run outputs"),
                mime_type: None,
                as_reference: false,
            },
            OutputDescriptor {
                identifier: Self::FILE_CONTENTS,
                title: "Output Files",
                abstract_: Some("Zip file of the model run outputs"),
                mime_type: Some("application/zip"),
                as_reference: true,
            },
            OutputDescriptor {
                identifier: Self::EXAMPLE_PLOT,
                title: "Example Plot",
                abstract_: Some("Example plot of the run results"),
                mime_type: Some("image/png"),
                as_reference: true,
            },
        ]
    }

    #[instrument(skip_all, fields(workdir = %workdir.display()))]
    async fn dispatch(
        &self,
        config: &RunConfiguration,
        workdir: &Path,
    ) -> Result<Vec<ProcessOutput>, WpsError> {
        let result = self
            .runner
            .run(config, workdir)
            .await
            .map_err(collaborator_failure)?;

        info!(
            outdir = %result.outdir.display(),
            archive = %result.archive_base.display(),
            mapfile = %result.mapfile.display(),
            "Model run completed"
        );

        Ok(vec![
            ProcessOutput::literal(Self::FILE_DIR, result.outdir.display().to_string()),
            ProcessOutput::reference(
                Self::FILE_CONTENTS,
                format!("{}.zip", result.archive_base.display()),
                "application/zip",
            ),
            ProcessOutput::reference(
                Self::EXAMPLE_PLOT,
                result.mapfile.display().to_string(),
                "image/png",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_failure_wraps_other_errors() {
        let err = collaborator_failure(WpsError::InternalError("disk".into()));
        assert!(matches!(err, WpsError::CollaboratorFailure(ref m) if m.contains("disk")));

        let err = collaborator_failure(WpsError::CollaboratorFailure("model".into()));
        assert_eq!(err, WpsError::CollaboratorFailure("model".into()));
    }

    #[test]
    fn test_output_serialization() {
        let output = ProcessOutput::reference("FileContents", "/runs/out.zip", "application/zip");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["identifier"], "FileContents");
        assert_eq!(json["kind"], "reference");
        assert_eq!(json["href"], "/runs/out.zip");
    }
}
