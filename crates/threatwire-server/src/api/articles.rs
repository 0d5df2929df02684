use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use threatwire_pipeline::{ArticleListing, ClearReport};
use threatwire_store::StoreError;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ErrorCode};

/// Lists stored articles, newest first.
///
/// The body is the bare `{total, articles}` document rather than the usual
/// `data`/`meta` envelope; downstream readers consume it as-is.
pub(super) async fn list_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ArticleListing>, ApiError> {
    state
        .pipeline
        .list_articles()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(&req_id, &e))
}

pub(super) async fn clear_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ClearReport>>, ApiError> {
    let report = state
        .pipeline
        .clear_articles()
        .await
        .map_err(|e| ApiError::from_store(&req_id, &e))?;

    tracing::info!(
        request_id = %req_id.0,
        deleted = report.deleted_count,
        failed = report.failures.len(),
        "stored articles cleared"
    );
    Ok(ApiResponse::new(report, &req_id))
}

pub(super) async fn get_article(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    match state.pipeline.article_html(&name).await {
        Ok(Some(bytes)) => Ok((
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            bytes,
        )
            .into_response()),
        Ok(None) | Err(StoreError::InvalidName { .. }) => Err(ApiError::new(
            &req_id,
            ErrorCode::NotFound,
            format!("article {name} not found"),
        )),
        Err(e) => Err(ApiError::from_store(&req_id, &e)),
    }
}
