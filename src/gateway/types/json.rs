//! JSON body extraction with client-safe error messages

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Longest deserializer detail passed through to the client
const MAX_DETAIL_LEN: usize = 100;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json<T>` whose rejections become a 400 envelope with a sanitized message
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => {
                tracing::debug!(rejection = %rejection.body_text(), "Rejected request body");
                Err(ApiError::bad_request(sanitize_rejection(&rejection)))
            }
        }
    }
}

/// Short field-level detail is kept; anything long or internal-looking is
/// replaced with a generic message.
pub fn sanitize_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
        JsonRejection::JsonDataError(e) => {
            let text = e.body_text();
            let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text);
            sanitize_detail(detail)
        }
        _ => "Invalid request".to_string(),
    }
}

fn sanitize_detail(detail: &str) -> String {
    if detail.is_empty() || detail.len() >= MAX_DETAIL_LEN || detail.contains("Error:") {
        "Invalid request".to_string()
    } else {
        format!("Invalid request: {}", detail)
    }
}
