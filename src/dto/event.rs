//! Wire shapes for inbound parsed chat events and the replies they produce.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::game::conversation::ConversationSource;

/// One parsed chat event forwarded by the transport layer.
///
/// Signature verification and command parsing happen upstream; the core only
/// sees the resolved source and the structured command.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EventRequest {
    /// Conversation the command was issued from.
    pub source: ConversationSource,
    /// The command itself.
    pub command: Command,
}

/// Structured command surface consumed by the game core.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Start a new game; `force` restarts an in-progress one.
    Start {
        /// Discard an in-progress game instead of re-asking its pick.
        #[serde(default)]
        force: bool,
    },
    /// Answer the current pick with free text.
    Answer {
        /// The submitted guess.
        text: String,
    },
    /// Skip the current pick (shorthand for answering "pass").
    Pass,
    /// Draw the next person (manual mode only).
    Next,
    /// Toggle manual progression mode.
    Manual,
    /// Forcibly finish the current game.
    End,
    /// Change the display name shown on the leaderboard.
    Rename {
        /// Requested display name.
        name: String,
    },
    /// Report the current game's progress and score.
    Status,
    /// Show the ranked high scores.
    Leaderboard {
        /// Number of rows to return; server default when omitted.
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Send the command overview.
    Help,
    /// Send the about message.
    About,
}

/// One outbound message the transport should forward to the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyMessage {
    /// Plain text reply.
    Text {
        /// Message body.
        text: String,
    },
    /// Photo reply, pointing at a temporary link.
    Image {
        /// Time-limited photo URL.
        url: String,
    },
}

impl ReplyMessage {
    /// Convenience constructor for a text reply.
    pub fn text(text: impl Into<String>) -> Self {
        ReplyMessage::Text { text: text.into() }
    }

    /// Convenience constructor for an image reply.
    pub fn image(url: impl Into<String>) -> Self {
        ReplyMessage::Image { url: url.into() }
    }
}

/// Reply content assembled for one inbound event.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// Messages to send back, in order.
    pub messages: Vec<ReplyMessage>,
}
