use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for GuessWho Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::handle_event,
        crate::routes::game::leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::event::EventRequest,
            crate::dto::event::Command,
            crate::dto::event::ReplyMessage,
            crate::dto::event::EventResponse,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::LeaderboardRowDto,
            crate::game::conversation::ConversationSource,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Parsed chat events and their replies"),
        (name = "leaderboard", description = "Ranked high scores"),
    )
)]
pub struct ApiDoc;
