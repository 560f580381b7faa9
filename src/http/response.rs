//! Error responses.
//!
//! # Design Decisions
//! - Every error body carries `message` (short label), `detailed_message`
//!   (full text), `status_code` and the error's structured context
//! - Malformed requests → 400, unknown names → 404, document and reference
//!   problems → 422, anything the caller cannot fix → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::engine::value::dotted;
use crate::error::Error;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ConfigNotFound { .. } | Error::EnvNotFound { .. } => StatusCode::NOT_FOUND,
            Error::MissingQueryParameter { .. } => StatusCode::BAD_REQUEST,
            Error::TypeMismatch { .. }
            | Error::SelfReferencingConfig { .. }
            | Error::ReferencingNonexistentConfig { .. }
            | Error::CircularReference { .. }
            | Error::InvalidDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnresolvableReference { .. } | Error::Io { .. } | Error::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Structured fields describing where the error happened.
    fn context(&self) -> Value {
        match self {
            Error::TypeMismatch { key, path, base_kind, extra_kind } => json!({
                "key": key,
                "path": dotted(path),
                "base_kind": base_kind,
                "extra_kind": extra_kind,
            }),
            Error::SelfReferencingConfig { config_name, env, location } => json!({
                "name": config_name,
                "env": env,
                "location": dotted(location),
            }),
            Error::ReferencingNonexistentConfig { config_name, env, location, target } => json!({
                "name": config_name,
                "env": env,
                "location": dotted(location),
                "target": target,
            }),
            Error::CircularReference { config_name, env, location, chain } => json!({
                "name": config_name,
                "env": env,
                "location": dotted(location),
                "chain": chain,
            }),
            Error::UnresolvableReference { config_name, env, location, target, path } => json!({
                "name": config_name,
                "env": env,
                "location": dotted(location),
                "target": target,
                "path": dotted(path),
            }),
            Error::ConfigNotFound { name } => json!({ "name": name }),
            Error::EnvNotFound { name, env } => json!({ "name": name, "env": env }),
            Error::MissingQueryParameter { parameter } => json!({ "parameter": parameter }),
            Error::InvalidDocument { name, .. } => json!({ "name": name }),
            Error::Io { .. } | Error::Task(_) => json!({}),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let mut body = json!({
            "message": self.message(),
            "detailed_message": self.to_string(),
            "status_code": status.as_u16(),
        });
        if let (Some(body), Value::Object(context)) = (body.as_object_mut(), self.context()) {
            body.extend(context);
        }

        (status, Json(body)).into_response()
    }
}
