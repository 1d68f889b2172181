//! Ingestion endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use ingest_core::export;
use ingest_core::import::tabular::{COMMA, TAB};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/ingest/submit
/// Generate flashcards from a Wikipedia URL or pasted text
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<Collection>> {
    let collection = state
        .orchestrator
        .submit_with_options(&payload.input, payload.is_url_mode, &payload.options)
        .await?;
    Ok(Json(collection))
}

/// POST /api/ingest/import
/// Import a previously exported file
pub async fn import(
    State(state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<Collection>> {
    let kind = payload
        .kind
        .or_else(|| ImportKind::from_file_name(&payload.file_name))
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "cannot tell the format of {}; use a .json, .csv or .tsv file",
                payload.file_name
            ))
        })?;

    let collection = state
        .orchestrator
        .import(kind, &payload.content, &payload.file_name)?;
    Ok(Json(collection))
}

/// GET /api/ingest/status
/// Current loading/result/error snapshot
pub async fn status(State(state): State<AppState>) -> Json<IngestStatus> {
    Json(state.orchestrator.status())
}

/// POST /api/ingest/export?format=json|csv|tsv
/// Render a collection in one of the importable formats
pub async fn export(
    Query(query): Query<ExportQuery>,
    Json(collection): Json<Collection>,
) -> Result<Response> {
    let body = match query.format {
        ExportFormat::Json => export::to_structured(&collection)?,
        ExportFormat::Csv => export::to_tabular(&collection, COMMA),
        ExportFormat::Tsv => export::to_tabular(&collection, TAB),
    };

    Ok(([(header::CONTENT_TYPE, query.format.content_type())], body).into_response())
}
