use std::io;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pressroom_core::paths::{artifact_base, is_plain_file_name, pdf_artifact};
use pressroom_export::DocumentRequest;
use pressroom_export::cleanup::remove_files_in;
use pressroom_export::options::PageLayout;
use pressroom_export::render::context_from_value;

use crate::error::{ApiError, handle_not_found};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub template: String,
    pub file_name: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub layout: PageLayout,
    /// Values bound into every template of the document.
    #[serde(default)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentCreated {
    pub file_name: String,
    /// Every file produced, to be passed back to `DELETE /documents`.
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveDocuments {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentsRemoved {
    pub removed: usize,
}

/// Render a document to PDF in the temp directory.
pub async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<CreateDocument>, JsonRejection>,
) -> Result<Json<DocumentCreated>, ApiError> {
    let Json(payload) = payload?;

    let request = DocumentRequest {
        template: payload.template,
        file_name: payload.file_name.clone(),
        header: payload.header,
        footer: payload.footer,
        layout: payload.layout,
        context: context_from_value(Value::Object(payload.values))?,
    };

    let generator = state.generator.clone();
    let artifacts = tokio::task::spawn_blocking(move || generator.generate(&request))
        .await
        .map_err(|e| ApiError::internal(format!("document task failed: {e}")))??;

    Ok(Json(DocumentCreated {
        file_name: payload.file_name,
        files: artifacts.file_names(),
    }))
}

/// Download a generated PDF.
pub async fn get_document(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_plain_file_name(&file_name) {
        return Err(ApiError::bad_request(format!(
            "invalid file name: {file_name:?}"
        )));
    }

    let path = pdf_artifact(&artifact_base(&state.temp_dir(), &file_name));
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(ApiError::internal(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };
    let bytes = handle_not_found(bytes, "document", &file_name)?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes))
}

/// Delete generated files by name. Stops at the first file that cannot be
/// deleted.
pub async fn delete_documents(
    State(state): State<AppState>,
    payload: Result<Json<RemoveDocuments>, JsonRejection>,
) -> Result<Json<DocumentsRemoved>, ApiError> {
    let Json(payload) = payload?;
    let dir = state.temp_dir();
    let removed = payload.files.len();

    tokio::task::spawn_blocking(move || remove_files_in(&dir, &payload.files))
        .await
        .map_err(|e| ApiError::internal(format!("cleanup task failed: {e}")))??;

    Ok(Json(DocumentsRemoved { removed }))
}
