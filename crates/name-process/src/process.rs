//! The NAME processes: schema, assembly and dispatch wired together.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};
use wps_common::WpsError;

use crate::assembler::{ParameterAssembler, RunConfiguration, ValidationMode};
use crate::collaborators::{InputFileGenerator, ModelRunner};
use crate::dispatch::{
    FileEmissionDispatcher, ModelInvocationDispatcher, OutputDescriptor, OutputDispatcher,
    ProcessOutput,
};
use crate::params::RawParameterSet;
use crate::schema::{ParameterDescriptor, ProcessSchema};
use crate::status::{JobStatus, StatusReporter, StatusUpdate};

/// Short listing entry for capabilities documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSummary {
    pub identifier: &'static str,
    pub title: &'static str,
    #[serde(rename = "abstract")]
    pub abstract_: &'static str,
    pub version: &'static str,
}

/// Full description of a process's inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessDescription {
    #[serde(flatten)]
    pub summary: ProcessSummary,
    pub inputs: Vec<ParameterDescriptor>,
    pub outputs: Vec<OutputDescriptor>,
    pub store_supported: bool,
    pub status_supported: bool,
}

/// Successful execute response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteResponse {
    pub job_id: String,
    pub process: String,
    pub status: JobStatus,
    pub percent: u8,
    pub outputs: Vec<ProcessOutput>,
}

/// A web-callable NAME run.
pub struct NameProcess {
    summary: ProcessSummary,
    schema: ProcessSchema,
    dispatcher: Arc<dyn OutputDispatcher>,
    mode: ValidationMode,
}

impl NameProcess {
    /// Identifier of the file-emitting variant.
    pub const BASIC: &'static str = "runname";
    /// Identifier of the model-running variant.
    pub const ADVANCED: &'static str = "runnameadvanced";

    pub fn new(
        summary: ProcessSummary,
        schema: ProcessSchema,
        dispatcher: Arc<dyn OutputDispatcher>,
    ) -> Self {
        Self {
            summary,
            schema,
            dispatcher,
            mode: ValidationMode::Permissive,
        }
    }

    /// Validates the inputs and writes them out as a model input file.
    pub fn basic(generator: Arc<dyn InputFileGenerator>) -> Self {
        Self::new(
            ProcessSummary {
                identifier: Self::BASIC,
                title: "Run NAME-on-JASMIN",
                abstract_: "Passes input arguments onto NAME",
                version: "0.1",
            },
            ProcessSchema::basic(),
            Arc::new(FileEmissionDispatcher::new(generator)),
        )
    }

    /// Validates the inputs and runs the model with them.
    pub fn advanced(runner: Arc<dyn ModelRunner>) -> Self {
        Self::new(
            ProcessSummary {
                identifier: Self::ADVANCED,
                title: "Run NAME-on-JASMIN advanced",
                abstract_: "Runs NAME and returns the output directory, a zip of the outputs and an example plot",
                version: "0.1",
            },
            ProcessSchema::advanced(),
            Arc::new(ModelInvocationDispatcher::new(runner)),
        )
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn identifier(&self) -> &'static str {
        self.summary.identifier
    }

    pub fn summary(&self) -> &ProcessSummary {
        &self.summary
    }

    pub fn schema(&self) -> &ProcessSchema {
        &self.schema
    }

    pub fn describe(&self) -> ProcessDescription {
        ProcessDescription {
            summary: self.summary.clone(),
            inputs: self.schema.parameters.clone(),
            outputs: self.dispatcher.output_descriptors(),
            store_supported: true,
            status_supported: true,
        }
    }

    /// Coerce raw `(name, value)` pairs against this process's schema.
    pub fn decode<K, V>(&self, submitted: &[(K, V)]) -> Result<RawParameterSet, WpsError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.schema.decode(submitted)
    }

    /// Assemble without dispatching.
    pub fn assemble(&self, params: &RawParameterSet) -> Result<RunConfiguration, WpsError> {
        ParameterAssembler::new(&self.schema)
            .with_mode(self.mode)
            .assemble(params)
    }

    /// Run one request to completion.
    ///
    /// Status is reported at entry and at the terminal state only. Nothing
    /// is dispatched unless assembly succeeds.
    pub async fn execute(
        &self,
        job_id: &str,
        params: &RawParameterSet,
        workdir: &Path,
        reporter: &dyn StatusReporter,
    ) -> Result<ExecuteResponse, WpsError> {
        reporter
            .report(job_id, StatusUpdate::received(self.identifier()))
            .await;

        match self.run(job_id, params, workdir).await {
            Ok(outputs) => {
                info!(
                    job_id = %job_id,
                    process = self.identifier(),
                    outputs = outputs.len(),
                    "Process completed"
                );
                let done = StatusUpdate::done();
                let response = ExecuteResponse {
                    job_id: job_id.to_string(),
                    process: self.identifier().to_string(),
                    status: done.status,
                    percent: done.percent,
                    outputs,
                };
                reporter.report(job_id, done).await;
                Ok(response)
            }
            Err(e) => {
                error!(job_id = %job_id, process = self.identifier(), error = %e, "Process failed");
                reporter.report(job_id, StatusUpdate::failed(&e)).await;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        job_id: &str,
        params: &RawParameterSet,
        workdir: &Path,
    ) -> Result<Vec<ProcessOutput>, WpsError> {
        let status = JobStatus::Received.advance(JobStatus::Assembling)?;
        debug!(job_id = %job_id, status = %status, "Assembling configuration");

        let config = self
            .assemble(params)
            .map_err(|e| fail(job_id, status, e))?;
        let status = status
            .advance(JobStatus::Assembled)?
            .advance(JobStatus::Dispatching)?;
        debug!(job_id = %job_id, status = %status, "Dispatching configuration");

        let outputs = self
            .dispatcher
            .dispatch(&config, workdir)
            .await
            .map_err(|e| fail(job_id, status, e))?;
        status.advance(JobStatus::Done)?;
        Ok(outputs)
    }
}

/// Move a job from `status` to `Failed`, keeping the error that caused it.
fn fail(job_id: &str, status: JobStatus, err: WpsError) -> WpsError {
    match status.advance(JobStatus::Failed) {
        Ok(failed) => {
            debug!(job_id = %job_id, from = %status, status = %failed, error = %err, "Job failed");
            err
        }
        Err(transition) => transition,
    }
}
