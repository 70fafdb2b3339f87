use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::global_id::DecodeError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unsupported return type {type_name}: {kind} fields cannot be expanded")]
    UnsupportedType {
        type_name: String,
        kind: &'static str,
    },

    #[error("Duplicate route {path}: bound by both {first} and {second}")]
    DuplicateRoute {
        path: String,
        first: String,
        second: String,
    },

    #[error("Invalid global id {id:?}: {source}")]
    InvalidGlobalId {
        id: String,
        #[source]
        source: DecodeError,
    },

    #[error("Node type {type_name} is not a possible type of {field}")]
    UnknownNodeType { type_name: String, field: String },

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON body must be an object")]
    BodyNotObject,

    #[error("Method {0} reached the request adapter; only GET and POST are routed")]
    UnsupportedMethod(Method),
}

impl Error {
    /// Request-time errors caused by the caller map to 400, everything else
    /// is a server-side invariant violation.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidGlobalId { .. }
            | Error::UnknownNodeType { .. }
            | Error::InvalidJson(_)
            | Error::BodyNotObject => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "errors": [{ "message": self.to_string() }],
        });
        (self.status_code(), Json(body)).into_response()
    }
}
