use std::fmt::Display;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pressroom_export::error::ExportError;

/// Free-form detail attached to an error response.
pub type Metas = Map<String, Value>;

/// Detail key stripped from schema-validation metas before they are sent.
pub const TRACEBACK_KEY: &str = "traceback_lines";

/// Category an error is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "server")]
    Server,
    #[serde(rename = "integrity")]
    Integrity,
    #[serde(rename = "body validation")]
    BodyValidation,
    #[serde(rename = "schema validation")]
    SchemaValidation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Server => "server",
            ErrorKind::Integrity => "integrity",
            ErrorKind::BodyValidation => "body validation",
            ErrorKind::SchemaValidation => "schema validation",
        }
    }
}

/// Unified API error type for all route handlers.
///
/// `status` on the server and body-validation variants marks an HTTP error
/// raised on purpose (not found, failed dependency, bad request); without
/// it the error is reported as an internal error.
#[derive(Debug)]
pub enum ApiError {
    Server {
        message: String,
        status: Option<StatusCode>,
    },
    /// A constraint violation, carrying the underlying constraint message.
    Integrity(String),
    BodyValidation {
        message: String,
        status: Option<StatusCode>,
    },
    SchemaValidation {
        message: String,
        metas: Metas,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metas: Option<Metas>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Server {
            message: message.into(),
            status: None,
        }
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Server {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn integrity(cause: impl Into<String>) -> Self {
        ApiError::Integrity(cause.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BodyValidation {
            message: message.into(),
            status: Some(StatusCode::BAD_REQUEST),
        }
    }

    pub fn schema(message: impl Into<String>, metas: Metas) -> Self {
        ApiError::SchemaValidation {
            message: message.into(),
            metas,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Integrity(_) => ErrorKind::Integrity,
            ApiError::BodyValidation { .. } => ErrorKind::BodyValidation,
            ApiError::SchemaValidation { .. } => ErrorKind::SchemaValidation,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind().as_str();

        let (status, body) = match self {
            ApiError::Integrity(cause) => {
                tracing::error!(kind, cause = %cause, "integrity error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: format!("Integrity - {cause}"),
                        metas: Some(Metas::new()),
                    },
                )
            }
            ApiError::SchemaValidation { message, mut metas } => {
                tracing::error!(
                    kind,
                    metas = %serde_json::Value::Object(metas.clone()),
                    "schema: {message}"
                );
                metas.remove(TRACEBACK_KEY);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: format!("Schema Validation - {message}"),
                        metas: Some(metas),
                    },
                )
            }
            ApiError::Server { message, status } | ApiError::BodyValidation { message, status } => {
                tracing::error!(kind, status = ?status, "internal error: {message}");
                match status {
                    Some(status) => (
                        status,
                        ErrorBody {
                            error: format!("{status}: {message}"),
                            metas: None,
                        },
                    ),
                    None => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody {
                            error: format!("Internal Error - {message}"),
                            metas: None,
                        },
                    ),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Unwrap a looked-up entity, or fail with a 404 naming the entity.
pub fn handle_not_found<T>(
    entity: Option<T>,
    entity_name: &str,
    entity_id: impl Display,
) -> Result<T, ApiError> {
    entity.ok_or_else(|| {
        tracing::error!("{entity_name} {entity_id} not found");
        ApiError::http(StatusCode::NOT_FOUND, format!("{entity_name} not found"))
    })
}

/// Log `message` with its detail and build a failed-dependency error.
pub fn reply_error(message: impl Into<String>, metas: Metas) -> ApiError {
    let message = message.into();
    tracing::error!(metas = %serde_json::Value::Object(metas), "{message}");
    ApiError::http(StatusCode::FAILED_DEPENDENCY, message)
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::TemplateNotFound(name) => {
                ApiError::http(StatusCode::NOT_FOUND, format!("template {name} not found"))
            }
            ExportError::InvalidFileName(name) => {
                ApiError::bad_request(format!("invalid file name: {name:?}"))
            }
            ExportError::Renderer { code, stderr } => {
                let mut metas = Metas::new();
                metas.insert("exit_code".to_string(), code.into());
                metas.insert("stderr".to_string(), stderr.into());
                reply_error("PDF renderer failed", metas)
            }
            ExportError::RendererNotFound { binary } => {
                let mut metas = Metas::new();
                metas.insert("binary".to_string(), binary.display().to_string().into());
                reply_error("PDF renderer unavailable", metas)
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let detail = e.body_text();
                let mut metas = Metas::new();
                metas.insert("body".to_string(), Value::Array(vec![detail.clone().into()]));
                ApiError::schema(detail, metas)
            }
            other => ApiError::BodyValidation {
                message: other.body_text(),
                status: Some(other.status()),
            },
        }
    }
}
