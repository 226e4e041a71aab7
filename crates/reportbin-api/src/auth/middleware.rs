use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reportbin_core::constants::UPLOAD_PASSWORD_HEADER;
use reportbin_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Secret every gated route is checked against.
#[derive(Clone)]
pub struct UploadGate {
    pub upload_password: String,
}

fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Admit the request only if `x-upload-password` equals the configured secret.
///
/// Runs before any extractor of the inner handler, so a rejected request never
/// has its body read.
pub async fn require_upload_password(
    State(gate): State<Arc<UploadGate>>,
    request: Request,
    next: Next,
) -> Response {
    let matches = request
        .headers()
        .get(UPLOAD_PASSWORD_HEADER)
        .map(|value| secure_compare(value.as_bytes(), gate.upload_password.as_bytes()));

    match matches {
        Some(true) => next.run(request).await,
        Some(false) => {
            tracing::debug!(path = %request.uri().path(), "Upload password mismatch");
            HttpAppError(AppError::Unauthorized("Invalid upload password".to_string()))
                .into_response()
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "Upload password header missing");
            HttpAppError(AppError::Unauthorized(
                "Missing upload password header".to_string(),
            ))
            .into_response()
        }
    }
}
