//! WPS KVP endpoint: GetCapabilities, DescribeProcess and Execute.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use name_process::{OutputValue, ProcessDescription, ProcessSummary, StatusReporter, StatusUpdate};
use wps_common::WpsError;

use crate::kvp::{KvpRequest, WpsOperation};
use crate::state::AppState;

/// Exception report returned for any failed request.
#[derive(Debug, Serialize)]
pub struct ExceptionReport {
    #[serde(rename = "exceptionCode")]
    pub exception_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    pub text: String,
}

impl From<&WpsError> for ExceptionReport {
    fn from(err: &WpsError) -> Self {
        Self {
            exception_code: err.wps_exception_code().to_string(),
            locator: err.locator().map(str::to_string),
            text: err.to_string(),
        }
    }
}

/// Capabilities document.
#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub service: &'static str,
    pub version: &'static str,
    pub title: &'static str,
    pub processes: Vec<ProcessSummary>,
}

/// DescribeProcess response.
#[derive(Debug, Serialize)]
pub struct ProcessDescriptions {
    pub processes: Vec<ProcessDescription>,
}

pub fn error_response(err: &WpsError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ExceptionReport::from(err))).into_response()
}

/// GET /wps
pub async fn wps_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let request = KvpRequest::new(query);

    let result = match request.operation() {
        Ok(WpsOperation::GetCapabilities) => Ok(get_capabilities(&state)),
        Ok(WpsOperation::DescribeProcess) => describe_process(&state, &request),
        Ok(WpsOperation::Execute) => execute(&state, &request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, code = e.wps_exception_code(), "WPS request rejected");
            error_response(&e)
        }
    }
}

fn get_capabilities(state: &AppState) -> Response {
    Json(Capabilities {
        service: "WPS",
        version: "1.0.0",
        title: "NAME Web Processing Service",
        processes: state.processes.iter().map(|p| p.summary().clone()).collect(),
    })
    .into_response()
}

fn describe_process(state: &AppState, request: &KvpRequest) -> Result<Response, WpsError> {
    let identifiers = request.identifiers()?;

    let processes = if identifiers.iter().any(|id| id.eq_ignore_ascii_case("all")) {
        state.processes.iter().map(|p| p.describe()).collect()
    } else {
        identifiers
            .iter()
            .map(|id| {
                state
                    .find_process(id)
                    .map(|p| p.describe())
                    .ok_or_else(|| WpsError::ProcessNotFound(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Json(ProcessDescriptions { processes }).into_response())
}

async fn execute(state: &AppState, request: &KvpRequest) -> Result<Response, WpsError> {
    let identifiers = request.identifiers()?;
    let identifier = identifiers
        .first()
        .ok_or_else(|| WpsError::MissingParameter("identifier".to_string()))?;
    let process = state
        .find_process(identifier)
        .ok_or_else(|| WpsError::ProcessNotFound(identifier.to_string()))?;

    let job_id = Uuid::new_v4().to_string();
    state.tracker.start(&job_id, process.identifier()).await;

    let params = match request
        .data_inputs()
        .and_then(|inputs| process.decode(&inputs))
    {
        Ok(params) => params,
        Err(e) => {
            state
                .tracker
                .report(&job_id, StatusUpdate::failed(&e))
                .await;
            return Err(e);
        }
    };

    let workdir = state.config.output_dir.join(&job_id);
    if let Err(e) = tokio::fs::create_dir_all(&workdir).await {
        let err = WpsError::InternalError(format!(
            "Failed to create job directory {}: {}",
            workdir.display(),
            e
        ));
        state
            .tracker
            .report(&job_id, StatusUpdate::failed(&err))
            .await;
        return Err(err);
    }

    info!(
        job_id = %job_id,
        process = process.identifier(),
        inputs = params.len(),
        "Received execute request"
    );

    match process
        .execute(&job_id, &params, &workdir, &state.tracker)
        .await
    {
        Ok(mut response) => {
            for output in &mut response.outputs {
                if let OutputValue::Reference { href, .. } = &mut output.value {
                    *href = state.config.output_href(href.as_str());
                }
            }
            Ok(Json(response).into_response())
        }
        Err(e) => {
            if e.is_validation_error() {
                // Nothing was produced; drop the empty job directory.
                if let Err(cleanup) = tokio::fs::remove_dir_all(&workdir).await {
                    warn!(
                        job_id = %job_id,
                        workdir = %workdir.display(),
                        error = %cleanup,
                        "Failed to remove job directory"
                    );
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_report_from_invalid_input() {
        let err = WpsError::invalid_input(
            "100",
            "The value \"100\" does not contain a \"-\" character to define a range, e.g. 0-100",
        );
        let report = ExceptionReport::from(&err);
        assert_eq!(report.exception_code, "InvalidParameterValue");
        assert_eq!(report.locator.as_deref(), Some("100"));
        assert!(report.text.contains("e.g. 0-100"));
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(&WpsError::ProcessNotFound("nope".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_response(&WpsError::CollaboratorFailure("boom".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
