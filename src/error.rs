// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the client.
//! Nothing in the library recovers from any of them: each variant is
//! surfaced to the immediate caller unchanged, and presentation is
//! left to whoever sits on top (the `ryver` binary, or an application).

use crate::types::ObjectType;
use std::fmt;
use thiserror::Error;

/// Ryver service failures classified by HTTP status.
///
/// The OData service does not return a stable machine-readable error
/// code, so the status line is the only vocabulary available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RyverErrorCode {
    /// Credentials were rejected (401)
    Unauthorized,
    /// The authenticated user may not perform this operation (403)
    Forbidden,
    /// The addressed entity does not exist (404)
    NotFound,
    /// The service rejected the request body or query (400)
    BadRequest,
    /// The service failed internally (5xx)
    ServerError,
    /// Any other non-success status
    HttpStatus(u16),
}

impl RyverErrorCode {
    /// Classify an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::ServerError,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error means the entity simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for RyverErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::ServerError => write!(f, "server_error"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// Any non-success HTTP status on any request.
    #[error("Ryver returned HTTP {status} ({code}) for {url}: {message}")]
    RyverService {
        code: RyverErrorCode,
        status: u16,
        url: String,
        message: String,
    },

    /// The server's data model makes this operation permanently impossible.
    #[error("Unsupported operation {operation}: {reason}")]
    Unsupported {
        operation: &'static str,
        reason: &'static str,
    },

    /// Carries the notification's `viaType` entity type string.
    #[error("Source location is not implemented for notifications from {0}")]
    UnimplementedSourceKind(String),

    #[error("Unknown object type token: {0}")]
    UnknownObjectType(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Object type {0} is not a chat")]
    NotAChat(ObjectType),

    #[error("Expected a {expected} object, got {actual}")]
    UnexpectedObjectType {
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("Record is missing field '{field}' or it has an unexpected type")]
    MalformedRecord { field: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Builds the transport failure for a non-success response.
    pub fn from_status(status: u16, url: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::RyverService {
            code: RyverErrorCode::from_http_status(status),
            status,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether the failure happened on the wire (network or HTTP status).
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            AppError::NetworkFailure(_) | AppError::RyverService { .. }
        )
    }

    /// Whether the operation can never succeed against this service.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AppError::Unsupported { .. })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
