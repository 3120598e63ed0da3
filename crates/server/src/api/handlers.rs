//! Request handlers.

use crate::api::ApiError;
use crate::ask::{answer_question, AskRequest, AskResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// `POST /ask`
///
/// Takes the raw body so that malformed input degrades to an empty request
/// instead of an extractor rejection.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AskResponse>, ApiError> {
    let request = AskRequest::from_body(&body);
    tracing::debug!("Ask request: {:?}", request);

    let response = answer_question(&state, &request).await?;
    Ok(Json(response))
}
