//! Command handling: resolves a conversation, runs the game transition, and
//! assembles the reply content the transport should send.

use tracing::warn;

use crate::{
    dto::{
        event::{Command, EventRequest, EventResponse, ReplyMessage},
        validation::validate_display_name,
    },
    error::ServiceError,
    game::{
        SharedState,
        conversation::ConversationSource,
        judge::Outcome,
        leaderboard,
        player::{PlayerSession, StartOutcome},
        roster::Person,
    },
    services::session_service,
};

const QUESTION_TEXT: &str = "Who is this person?";
const STARTING_TEXT: &str = "Starting game...";
const NEVER_PLAYED_TEXT: &str = "You've never played the game before.";
const FINISHED_TEXT: &str = "You have finished the game.\nUse start to begin a new one.";
const IN_PROGRESS_TEXT: &str =
    "Your game is still in progress.\nRestart with force to reset your progress.";
const AMBIGUOUS_TEXT: &str = "Please be more specific. Try again!";
const MANUAL_WAIT_TEXT: &str = "Ask for the next person whenever you're ready.";

const ABOUT_TEXT: &str = "GuessWho\n\
    Get to know your people by their photos!\n\
    ---\n\
    Answers are judged with a fuzzy match, so partial names count.";

const HELP_TEXT: &str = "start: start the game (force restarts)\n\
    answer <name>: name the person in the picture\n\
    pass: skip the current person\n\
    next: draw the next person (manual mode)\n\
    manual: toggle manual progression\n\
    end: finish the current game\n\
    rename <name>: change your display name\n\
    status: show your current game's status\n\
    leaderboard: show the best high scores";

/// Handle one parsed chat event and assemble its reply.
pub async fn handle_event(
    state: &SharedState,
    request: EventRequest,
) -> Result<EventResponse, ServiceError> {
    let EventRequest { source, command } = request;

    let messages = match command {
        Command::Start { force } => start(state, &source, force).await?,
        Command::Answer { text } => answer(state, &source, &text).await?,
        Command::Pass => answer(state, &source, "pass").await?,
        Command::Next => next(state, &source).await?,
        Command::Manual => toggle_manual(state, &source).await?,
        Command::End => end(state, &source).await?,
        Command::Rename { name } => rename(state, &source, &name).await?,
        Command::Status => status(state, &source).await?,
        Command::Leaderboard { limit } => leaderboard_reply(state, limit).await?,
        Command::Help => vec![ReplyMessage::text(HELP_TEXT)],
        Command::About => vec![ReplyMessage::text(ABOUT_TEXT)],
    };

    Ok(EventResponse { messages })
}

async fn start(
    state: &SharedState,
    source: &ConversationSource,
    force: bool,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let handle = state.session(source.conversation_id());
    let mut session = handle.lock().await;

    // Run the transition on a scratch copy so a failed photo fetch leaves the
    // player's state untouched.
    let mut working = session.clone();
    let outcome = working.start(state.roster(), force)?;

    let (person, mut messages) = match outcome {
        StartOutcome::Started(person) => (person, vec![ReplyMessage::text(STARTING_TEXT)]),
        StartOutcome::Resumed(person) => (person, vec![ReplyMessage::text(IN_PROGRESS_TEXT)]),
    };

    let photo = photo_message(state, &person).await?;
    *session = working;
    messages.push(photo);
    messages.push(ReplyMessage::text(QUESTION_TEXT));
    Ok(messages)
}

async fn answer(
    state: &SharedState,
    source: &ConversationSource,
    text: &str,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let Some(handle) = state.existing_session(source.conversation_id()) else {
        return Ok(vec![ReplyMessage::text(NEVER_PLAYED_TEXT)]);
    };
    let mut session = handle.lock().await;
    if session.finished() {
        return Ok(vec![ReplyMessage::text(FINISHED_TEXT)]);
    }

    let mut working = session.clone();
    let report = working.submit_answer(
        state.roster(),
        &state.config().judge,
        &state.config().weights,
        text,
    )?;

    if report.outcome == Outcome::Ambiguous {
        // Nothing was consumed; the same pick is re-asked in place.
        return Ok(vec![ReplyMessage::text(AMBIGUOUS_TEXT)]);
    }

    let verdict = verdict_text(report.outcome, &report.person);

    if report.finished {
        let summary = format!(
            "You've finished the game!\n{}",
            status_text(&working, state.roster().len())
        );
        *session = working;
        drop(session);
        // A completed game flushes immediately.
        flush_or_warn(state).await;
        return Ok(vec![ReplyMessage::text(verdict), ReplyMessage::text(summary)]);
    }

    let mut messages = vec![ReplyMessage::text(verdict)];
    match &report.next {
        Some(next) => {
            let photo = photo_message(state, next).await?;
            messages.push(photo);
            messages.push(ReplyMessage::text(QUESTION_TEXT));
        }
        None => messages.push(ReplyMessage::text(MANUAL_WAIT_TEXT)),
    }

    let due = working.stats().count >= state.config().flush_interval;
    *session = working;
    drop(session);
    if due {
        flush_or_warn(state).await;
    }

    Ok(messages)
}

async fn next(
    state: &SharedState,
    source: &ConversationSource,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let Some(handle) = state.existing_session(source.conversation_id()) else {
        return Ok(vec![ReplyMessage::text(NEVER_PLAYED_TEXT)]);
    };
    let mut session = handle.lock().await;
    if session.finished() {
        return Ok(vec![ReplyMessage::text(FINISHED_TEXT)]);
    }

    let mut working = session.clone();
    let person = working.next_pick(state.roster())?;
    let photo = photo_message(state, &person).await?;
    *session = working;
    Ok(vec![photo, ReplyMessage::text(QUESTION_TEXT)])
}

async fn toggle_manual(
    state: &SharedState,
    source: &ConversationSource,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let handle = state.session(source.conversation_id());
    let manual = handle.lock().await.toggle_manual();
    let text = if manual {
        "Manual mode enabled. Use next to draw each person."
    } else {
        "Manual mode disabled. The next person follows every answer."
    };
    Ok(vec![ReplyMessage::text(text)])
}

async fn end(
    state: &SharedState,
    source: &ConversationSource,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let Some(handle) = state.existing_session(source.conversation_id()) else {
        return Ok(vec![ReplyMessage::text(NEVER_PLAYED_TEXT)]);
    };
    let summary = {
        let mut session = handle.lock().await;
        session.end();
        format!(
            "Game ended.\n{}",
            status_text(&session, state.roster().len())
        )
    };
    flush_or_warn(state).await;
    Ok(vec![ReplyMessage::text(summary)])
}

async fn rename(
    state: &SharedState,
    source: &ConversationSource,
    name: &str,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let config = state.config();
    validate_display_name(name, config.max_display_name_len, &config.group_tag)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let trimmed = name.trim().to_string();
    let handle = state.session(source.conversation_id());
    handle.lock().await.set_display_name(trimmed.clone());
    Ok(vec![ReplyMessage::text(format!(
        "Your name is now {trimmed}."
    ))])
}

async fn status(
    state: &SharedState,
    source: &ConversationSource,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let Some(handle) = state.existing_session(source.conversation_id()) else {
        return Ok(vec![ReplyMessage::text(NEVER_PLAYED_TEXT)]);
    };
    let session = handle.lock().await;
    if session.finished() {
        return Ok(vec![ReplyMessage::text(FINISHED_TEXT)]);
    }
    Ok(vec![ReplyMessage::text(status_text(
        &session,
        state.roster().len(),
    ))])
}

async fn leaderboard_reply(
    state: &SharedState,
    limit: Option<usize>,
) -> Result<Vec<ReplyMessage>, ServiceError> {
    let size = limit.unwrap_or(state.config().leaderboard_size);
    let rows = leaderboard::top_n(state.leaderboard_entries().await, size);
    if rows.is_empty() {
        return Ok(vec![ReplyMessage::text("Nobody has played yet.")]);
    }

    let group_tag = &state.config().group_tag;
    let mut text = String::from("High scores:");
    for row in rows {
        let tag = if row.is_group {
            format!(" {group_tag}")
        } else {
            String::new()
        };
        text.push_str(&format!(
            "\n{}. {}{}: {}",
            row.rank, row.display_name, tag, row.high_score
        ));
    }
    Ok(vec![ReplyMessage::text(text)])
}

/// Resolve a temporary photo link for the person and wrap it as a reply.
async fn photo_message(
    state: &SharedState,
    person: &Person,
) -> Result<ReplyMessage, ServiceError> {
    let store = state.require_session_store().await?;
    let url = store
        .fetch_photo_link(person.category.folder(), &person.name)
        .await?;
    Ok(ReplyMessage::image(url))
}

/// Formatted progress report for one player's current game.
fn status_text(session: &PlayerSession, total: usize) -> String {
    let stats = session.stats();
    let total = total.max(1);
    let pct = |count: u32| count as f64 / total as f64 * 100.0;
    format!(
        "{}/{} persons.\n\
         Exact: {} ({:.2}%)\n\
         Correct: {} ({:.2}%)\n\
         Partial: {} ({:.2}%)\n\
         Wrong: {} ({:.2}%)\n\
         Skipped: {} ({:.2}%)\n\
         Score: {} (high score: {})",
        stats.answered(),
        total,
        stats.exact,
        pct(stats.exact),
        stats.correct,
        pct(stats.correct),
        stats.partial,
        pct(stats.partial),
        stats.wrong,
        pct(stats.wrong),
        stats.skipped,
        pct(stats.skipped),
        stats.score,
        stats.high_score,
    )
}

/// Reply line describing one judged outcome.
fn verdict_text(outcome: Outcome, person: &Person) -> String {
    let (subject, object) = person.category.pronouns();
    let name = &person.name;
    match outcome {
        Outcome::Exact => format!("Spot on! {subject} is {name}."),
        Outcome::Correct => format!("You are correct! {subject} is {name}."),
        Outcome::Partial => format!("Close enough! {subject} is {name}."),
        Outcome::Wrong => {
            format!("You are wrong! {subject} is {name}. Remember {object} next time!")
        }
        Outcome::Skip => format!("{subject} is {name}. Remember {object} next time!"),
        Outcome::Ambiguous => AMBIGUOUS_TEXT.to_string(),
    }
}

/// Flush the session table, logging instead of failing the reply path.
async fn flush_or_warn(state: &SharedState) {
    if let Err(err) = session_service::flush_sessions(state).await {
        warn!(error = %err, "session table flush failed; keeping in-memory state");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{PlayerEntity, SessionTableEntity, StatsEntity},
            session_store::memory::MemorySessionStore,
        },
        game::{AppState, roster::Roster},
    };

    fn roster_of(male: &[&str], female: &[&str]) -> Roster {
        Roster::new(
            male.iter().map(|s| s.to_string()).collect(),
            female.iter().map(|s| s.to_string()).collect(),
        )
    }

    async fn state_with_store(
        config: AppConfig,
        male: &[&str],
        female: &[&str],
    ) -> (SharedState, MemorySessionStore) {
        let store = MemorySessionStore::new()
            .with_folder("male", male.iter().map(|s| s.to_string()).collect())
            .with_folder("female", female.iter().map(|s| s.to_string()).collect());
        let state = AppState::new(config, roster_of(male, female));
        state
            .install_session_store(Arc::new(store.clone()))
            .await;
        (state, store)
    }

    fn user(id: &str) -> ConversationSource {
        ConversationSource::User { id: id.into() }
    }

    async fn send(
        state: &SharedState,
        source: &ConversationSource,
        command: Command,
    ) -> Vec<ReplyMessage> {
        handle_event(
            state,
            EventRequest {
                source: source.clone(),
                command,
            },
        )
        .await
        .expect("event handled")
        .messages
    }

    fn text_of(message: &ReplyMessage) -> &str {
        match message {
            ReplyMessage::Text { text } => text,
            ReplyMessage::Image { .. } => panic!("expected a text message"),
        }
    }

    #[tokio::test]
    async fn start_replies_with_a_photo_and_question() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;
        let source = user("U1");

        let messages = send(&state, &source, Command::Start { force: false }).await;
        assert_eq!(messages.len(), 3);
        assert_eq!(text_of(&messages[0]), "Starting game...");
        assert_eq!(
            messages[1],
            ReplyMessage::image("memory://male/Adrian.jpg")
        );
        assert_eq!(text_of(&messages[2]), QUESTION_TEXT);
    }

    #[tokio::test]
    async fn start_without_force_re_asks_the_current_pick() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;
        let source = user("U1");

        send(&state, &source, Command::Start { force: false }).await;
        let messages = send(&state, &source, Command::Start { force: false }).await;
        assert!(text_of(&messages[0]).contains("still in progress"));
        assert_eq!(
            messages[1],
            ReplyMessage::image("memory://male/Adrian.jpg")
        );
    }

    #[tokio::test]
    async fn exact_answer_finishes_the_game_and_flushes() {
        let (state, store) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;
        let source = user("U1");

        send(&state, &source, Command::Start { force: false }).await;
        let messages = send(
            &state,
            &source,
            Command::Answer {
                text: "adrian".into(),
            },
        )
        .await;
        assert!(text_of(&messages[0]).starts_with("Spot on!"));
        assert!(text_of(&messages[1]).starts_with("You've finished the game!"));

        let saved = store.saved_sessions();
        let record = saved.get("U1").expect("record persisted on finish");
        assert_eq!(record.data.exact, 1);
        assert!(record.progress.is_empty());

        let status = send(&state, &source, Command::Status).await;
        assert_eq!(text_of(&status[0]), FINISHED_TEXT);
    }

    #[tokio::test]
    async fn ambiguous_answer_consumes_nothing() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;
        let source = user("U1");

        send(&state, &source, Command::Start { force: false }).await;
        // Below the minimum token length, so the guess carries no content.
        let messages = send(&state, &source, Command::Answer { text: "ad".into() }).await;
        assert_eq!(text_of(&messages[0]), AMBIGUOUS_TEXT);

        let status = send(&state, &source, Command::Status).await;
        assert!(text_of(&status[0]).starts_with("0/1 persons."));
    }

    #[tokio::test]
    async fn wrong_answer_names_the_person_with_her_pronouns() {
        let (state, _) = state_with_store(AppConfig::default(), &[], &["Beth"]).await;
        let source = user("U1");

        send(&state, &source, Command::Start { force: false }).await;
        let messages = send(&state, &source, Command::Answer { text: "zzz".into() }).await;
        assert!(text_of(&messages[0]).starts_with("You are wrong! She is Beth."));
    }

    #[tokio::test]
    async fn pass_skips_without_scoring() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian", "Budi"], &[]).await;
        let source = user("U1");

        send(&state, &source, Command::Start { force: false }).await;
        let messages = send(&state, &source, Command::Pass).await;
        assert!(text_of(&messages[0]).contains("Remember him next time!"));

        let status = send(&state, &source, Command::Status).await;
        assert!(text_of(&status[0]).contains("Score: 0"));
    }

    #[tokio::test]
    async fn commands_before_any_game_get_the_never_played_reply() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;
        let source = user("U1");

        for command in [Command::Status, Command::Next, Command::End, Command::Pass] {
            let messages = send(&state, &source, command).await;
            assert_eq!(text_of(&messages[0]), NEVER_PLAYED_TEXT);
        }
    }

    #[tokio::test]
    async fn manual_mode_waits_for_an_explicit_next() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian", "Budi"], &[]).await;
        let source = user("U1");

        send(&state, &source, Command::Manual).await;
        send(&state, &source, Command::Start { force: false }).await;
        let messages = send(
            &state,
            &source,
            Command::Answer {
                text: "adrian budi".into(),
            },
        )
        .await;
        assert_eq!(text_of(&messages[1]), MANUAL_WAIT_TEXT);

        let messages = send(&state, &source, Command::Next).await;
        assert!(matches!(messages[0], ReplyMessage::Image { .. }));
        assert_eq!(text_of(&messages[1]), QUESTION_TEXT);
    }

    #[tokio::test]
    async fn answers_flush_once_the_interval_is_reached() {
        let config = AppConfig {
            flush_interval: 1,
            ..AppConfig::default()
        };
        let (state, store) = state_with_store(config, &["Adrian", "Budi"], &[]).await;
        let source = user("U1");

        send(&state, &source, Command::Start { force: false }).await;
        send(&state, &source, Command::Pass).await;
        assert!(store.saved_sessions().contains_key("U1"));
    }

    #[tokio::test]
    async fn rename_rejects_the_reserved_group_tag() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;
        let source = user("U1");

        let result = handle_event(
            &state,
            EventRequest {
                source: source.clone(),
                command: Command::Rename {
                    name: "me (group)".into(),
                },
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));

        let messages = send(
            &state,
            &source,
            Command::Rename {
                name: "laymonage".into(),
            },
        )
        .await;
        assert_eq!(text_of(&messages[0]), "Your name is now laymonage.");
    }

    #[tokio::test]
    async fn leaderboard_reply_ranks_and_tags_groups() {
        let (state, _) = state_with_store(AppConfig::default(), &["Adrian"], &[]).await;

        let mut table = SessionTableEntity::new();
        table.insert(
            "U1".into(),
            PlayerEntity {
                name: "zara".into(),
                pick: String::new(),
                progress: vec![],
                data: StatsEntity {
                    high_score: 5,
                    ..StatsEntity::default()
                },
            },
        );
        table.insert(
            "C9".into(),
            PlayerEntity {
                name: "abc".into(),
                pick: String::new(),
                progress: vec![],
                data: StatsEntity {
                    high_score: 9,
                    ..StatsEntity::default()
                },
            },
        );
        state.replace_sessions(table);

        let messages = send(
            &state,
            &user("U1"),
            Command::Leaderboard { limit: None },
        )
        .await;
        let text = text_of(&messages[0]);
        assert!(text.contains("1. abc (group): 9"));
        assert!(text.contains("2. zara: 5"));
    }

    #[tokio::test]
    async fn events_fail_while_no_store_is_installed() {
        let state = AppState::new(AppConfig::default(), roster_of(&["Adrian"], &[]));
        let result = handle_event(
            &state,
            EventRequest {
                source: user("U1"),
                command: Command::Start { force: false },
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Degraded)));
    }
}
