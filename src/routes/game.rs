use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    dto::{
        event::{EventRequest, EventResponse},
        leaderboard::LeaderboardResponse,
    },
    error::AppError,
    game::{SharedState, leaderboard},
    services::game_service,
};

/// Query parameters for the leaderboard projection.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Number of rows to return; server default when omitted.
    pub limit: Option<usize>,
}

/// Handle one parsed chat event and return the reply content to send.
#[utoipa::path(
    post,
    path = "/events",
    tag = "game",
    request_body = EventRequest,
    responses(
        (status = 200, description = "Reply content for the event", body = EventResponse),
        (status = 400, description = "Malformed command"),
        (status = 503, description = "Session store unavailable"),
    )
)]
pub async fn handle_event(
    State(state): State<SharedState>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    Ok(Json(game_service::handle_event(&state, request).await?))
}

/// Return the ranked high scores across all conversations.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(("limit" = Option<usize>, Query, description = "Number of rows to return")),
    responses((status = 200, description = "Ranked high scores", body = LeaderboardResponse))
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<LeaderboardResponse> {
    let size = query.limit.unwrap_or(state.config().leaderboard_size);
    let rows = leaderboard::top_n(state.leaderboard_entries().await, size);
    Json(LeaderboardResponse::new(rows))
}

/// Configure the game routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/events", post(handle_event))
        .route("/leaderboard", get(leaderboard))
}
