//! Conversation identity: where an inbound command came from.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tagged origin of an inbound chat event, resolved once into a single
/// conversation id before reaching the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationSource {
    /// 1:1 chat with a single user.
    User {
        /// Platform user identifier (`U…` prefix).
        id: String,
    },
    /// Named group chat.
    Group {
        /// Platform group identifier (`C…` prefix).
        id: String,
    },
    /// Ad-hoc multi-person room.
    Room {
        /// Platform room identifier (`R…` prefix).
        id: String,
    },
}

impl ConversationSource {
    /// The single id the session registry is keyed by.
    pub fn conversation_id(&self) -> &str {
        match self {
            ConversationSource::User { id }
            | ConversationSource::Group { id }
            | ConversationSource::Room { id } => id,
        }
    }

    /// Whether the source denotes a shared conversation (group or room).
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            ConversationSource::Group { .. } | ConversationSource::Room { .. }
        )
    }
}

/// Derive the group flag from a stored conversation id alone.
///
/// Ids follow the chat platform convention: users start with `U`, groups with
/// `C`, rooms with `R`. The flag is informational only (leaderboard display),
/// never a scoring input.
pub fn id_denotes_group(conversation_id: &str) -> bool {
    conversation_id.starts_with('C') || conversation_id.starts_with('R')
}
