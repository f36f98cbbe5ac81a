use axum::{extract::rejection::JsonRejection, extract::State, Json};
use common::types::Message;
use service::ranking::{ScoreEntry, ScoreSubmission};

use crate::errors::ApiError;
use crate::observability::{RANKING_READS_TOTAL, SCORES_SUBMITTED_TOTAL, STORAGE_ERRORS_TOTAL};
use crate::routes::ServerState;

/// Record a score. Malformed bodies are rejected before the ranking is touched.
pub async fn add_score(
    State(state): State<ServerState>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(submission) = payload?;
    if let Err(e) = state.ranking.submit(submission).await {
        STORAGE_ERRORS_TOTAL.inc();
        return Err(e.into());
    }
    SCORES_SUBMITTED_TOTAL.inc();
    Ok(Json(Message::new("Score added successfully")))
}

/// Stored ranking, highest score first.
pub async fn get_ranking(State(state): State<ServerState>) -> Json<Vec<ScoreEntry>> {
    RANKING_READS_TOTAL.inc();
    Json(state.ranking.ranking().await)
}
