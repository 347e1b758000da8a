use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::*;
use crate::validation::{self, FieldError, ValidationErrors};

pub const NOTE_NOT_FOUND: &str = "Note not found";

// ============================================================
// Error Handling
// ============================================================

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Field-level details, present on validation failures only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// An error the API turns into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOTE_NOT_FOUND)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                message: e.message(),
                errors: e.into_errors(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side; clients only see a generic message.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Path ids that are not integers cannot name a note, so they resolve as absent.
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| {
        tracing::debug!("Non-numeric note id: {}", raw);
        ApiError::not_found()
    })
}

/// Turn a raw JSON body into a validated note input.
fn validate_body(payload: Result<Json<NoteDraft>, JsonRejection>) -> ApiResult<NoteInput> {
    let Json(draft) = payload.map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    })?;

    validation::validate(draft).map_err(|e| {
        tracing::warn!("Validation error: {}", e);
        ApiError::from(e)
    })
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Notes
// ============================================================

pub async fn list_notes(State(db): State<Database>) -> ApiResult<Json<Vec<Note>>> {
    db.get_all_notes().map(Json).map_err(internal_error)
}

pub async fn get_note(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let id = parse_id(&id)?;
    db.get_note(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn create_note(
    State(db): State<Database>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let input = validate_body(payload)?;
    db.create_note(input)
        .map(|note| {
            tracing::info!("Created note {}", note.id);
            (StatusCode::CREATED, Json(note))
        })
        .map_err(internal_error)
}

/// The body is validated before the id is resolved, so a bad payload is a
/// 400 even when the note does not exist.
pub async fn update_note(
    State(db): State<Database>,
    Path(id): Path<String>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let input = validate_body(payload)?;
    let id = parse_id(&id)?;
    db.update_note(id, input)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn delete_note(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if db.delete_note(id).map_err(internal_error)? {
        tracing::info!("Deleted note {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found())
    }
}
