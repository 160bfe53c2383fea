//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the non-streaming REST endpoints and the
//! master definition for the OpenAPI specification.

use crate::web::protocol::ErrorBody;
use crate::web::state::AppState;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use briefing_core::domain::{BriefingRecord, Language};
use briefing_core::ports::PortError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::stream::summary_stream_handler,
        crate::web::stream::translation_stream_handler,
        extract_document_handler,
        chat_handler,
        save_history_handler,
        list_history_handler,
    ),
    components(
        schemas(
            crate::web::stream::SummaryStreamRequest,
            crate::web::stream::TranslationStreamRequest,
            ExtractRequest,
            ExtractResponse,
            ChatRequest,
            ChatResponse,
            SaveHistoryRequest,
            SaveHistoryResponse,
            HistoryRecordBody,
            ErrorBody,
        )
    ),
    tags(
        (name = "streams", description = "SSE endpoints for incremental AI generation."),
        (name = "documents", description = "Upload decoding and multilingual Q&A."),
        (name = "history", description = "Per-user briefing history (session cookie required).")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ExtractRequest {
    #[serde(default, rename = "fileDataUri")]
    pub file_data_uri: Option<String>,
    #[serde(default, rename = "fileName")]
    pub file_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ExtractResponse {
    #[serde(rename = "documentText")]
    pub document_text: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default, rename = "documentText")]
    pub document_text: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, rename = "previousAnswer")]
    pub previous_answer: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    /// The detected language the answer is written in.
    pub language: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveHistoryRequest {
    #[serde(default, rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One persisted briefing row, serialized with the storage column names.
#[derive(Serialize, ToSchema)]
pub struct HistoryRecordBody {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BriefingRecord> for HistoryRecordBody {
    fn from(record: BriefingRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            file_name: record.file_name,
            summary: record.summary,
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SaveHistoryResponse {
    pub record: HistoryRecordBody,
}

type Rejection = (StatusCode, Json<ErrorBody>);

fn bad_request(message: &str) -> Rejection {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message)))
}

/// Maps a port failure onto the response contract shared by the REST
/// handlers. The migration diagnostic for a missing table travels through
/// verbatim so the operator sees what to run.
fn port_error_response(e: PortError) -> Rejection {
    let status = match &e {
        PortError::InvalidInput(_) | PortError::UnsupportedType(_) => StatusCode::BAD_REQUEST,
        PortError::ExtractionEmpty => StatusCode::UNPROCESSABLE_ENTITY,
        PortError::Unauthorized => StatusCode::UNAUTHORIZED,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorBody::new(e.to_string())))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Decode an uploaded file into plain text.
///
/// The file travels as a Base64 `data:` URI; the declared MIME type selects
/// the extractor (Word, slides, PDF, or image OCR).
#[utoipa::path(
    post,
    path = "/api/documents/extract",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Text extracted", body = ExtractResponse),
        (status = 400, description = "Malformed data URI or unsupported file type", body = ErrorBody),
        (status = 422, description = "No text could be extracted", body = ErrorBody),
        (status = 500, description = "Extraction backend failure", body = ErrorBody)
    ),
    tag = "documents"
)]
pub async fn extract_document_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, Rejection> {
    let file_data_uri = payload
        .file_data_uri
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| bad_request("fileDataUri is required."))?;

    let file_name = payload.file_name.as_deref().unwrap_or("untitled");

    let document_text = state
        .decoder
        .extract_text(&file_data_uri)
        .await
        .map_err(|e| {
            error!("Extraction failed for '{}': {:?}", file_name, e);
            port_error_response(e)
        })?;

    Ok(Json(ExtractResponse { document_text }))
}

/// Answer a question about an extracted document.
///
/// The question's language is detected first; the answer is written in that
/// language. Questions whose language cannot be identified are rejected.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer generated", body = ChatResponse),
        (status = 400, description = "Missing fields or unidentifiable language", body = ErrorBody),
        (status = 500, description = "Generation failure", body = ErrorBody)
    ),
    tag = "documents"
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Rejection> {
    let document_text = payload
        .document_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| bad_request("documentText is required."))?;

    let question = payload
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| bad_request("question is required."))?;

    let language = state
        .language_adapter
        .detect_language(&question)
        .await
        .map_err(port_error_response)?;

    if language == Language::Unknown {
        return Err(bad_request(
            "Could not determine the language of the question.",
        ));
    }

    let answer = state
        .qa_adapter
        .answer_question(
            &document_text,
            &question,
            payload.previous_answer.as_deref(),
            language,
        )
        .await
        .map_err(|e| {
            error!("Q&A generation failed: {:?}", e);
            port_error_response(e)
        })?;

    Ok(Json(ChatResponse {
        answer,
        language: language.as_str().to_string(),
    }))
}

/// Save a briefing to the authenticated user's history.
#[utoipa::path(
    post,
    path = "/api/history",
    request_body = SaveHistoryRequest,
    responses(
        (status = 201, description = "Record created", body = SaveHistoryResponse),
        (status = 400, description = "fileName is missing", body = ErrorBody),
        (status = 401, description = "No valid session cookie"),
        (status = 500, description = "Storage failure or missing schema", body = ErrorBody)
    ),
    tag = "history"
)]
pub async fn save_history_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<SaveHistoryRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let file_name = payload
        .file_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| bad_request("fileName is required."))?;

    let record = state
        .db
        .save_briefing(user_id, &file_name, payload.summary.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to save briefing for user {}: {:?}", user_id, e);
            port_error_response(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SaveHistoryResponse {
            record: record.into(),
        }),
    ))
}

/// List the authenticated user's briefing history, newest first.
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "The 20 most recent records", body = [HistoryRecordBody]),
        (status = 401, description = "No valid session cookie"),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "history"
)]
pub async fn list_history_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<HistoryRecordBody>>, Rejection> {
    let records = state.db.list_briefings(user_id).await.map_err(|e| {
        error!("Failed to list briefings for user {}: {:?}", user_id, e);
        port_error_response(e)
    })?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}
