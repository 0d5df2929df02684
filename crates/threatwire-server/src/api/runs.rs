use axum::{extract::State, Extension, Json};
use threatwire_pipeline::RunReport;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ErrorCode};

/// Runs the pipeline once and answers with its report when the run ends.
/// Refused with `conflict` while another run (scheduled or manual) is active.
pub(super) async fn trigger_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunReport>>, ApiError> {
    let Some(_permit) = state.runs.try_acquire() else {
        return Err(ApiError::new(
            &req_id,
            ErrorCode::Conflict,
            "a pipeline run is already in progress",
        ));
    };

    tracing::info!(request_id = %req_id.0, "manual pipeline run requested");
    let report = state.pipeline.run_once().await;
    Ok(ApiResponse::new(report, &req_id))
}
