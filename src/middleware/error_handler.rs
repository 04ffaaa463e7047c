use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::core::AppError;

/// JSON extractor configuration: malformed bodies (bad decimals, unknown
/// channel codes, missing fields) answer with the standard error envelope
/// instead of actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected request body");
    AppError::validation(format!("Invalid request body: {}", err)).into()
}
