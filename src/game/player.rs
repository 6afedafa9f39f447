//! Per-player game session: the answer-judging and scoring state machine.

use indexmap::IndexSet;
use thiserror::Error;

use crate::{
    dao::models::{PlayerEntity, StatsEntity},
    game::{
        judge::{self, JudgeConfig, Outcome},
        roster::{EmptyPool, Person, Roster},
        score::{ScoreWeights, Stats},
    },
};

/// Display name given to players who never renamed themselves.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// High-level phases a player's game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// The player exists but never started a game.
    Unstarted,
    /// A game is active; picks are drawn and judged.
    InProgress,
    /// Every person is resolved, or the game was ended explicitly.
    Finished,
}

/// Error returned when a transition is requested from the wrong phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The player has no active game.
    #[error("no game is in progress")]
    NotInProgress,
    /// A manual-mode advance was requested while a pick is still unresolved.
    #[error("the current pick has not been answered yet")]
    PickPending,
    /// A manual-mode advance was requested outside manual mode.
    #[error("manual advance is only available in manual mode")]
    NotManual,
    /// An answer was submitted while no pick is pending (manual mode, between
    /// picks).
    #[error("no pick is pending; request the next person first")]
    NoPickPending,
    /// A draw was requested from an exhausted pool.
    #[error(transparent)]
    EmptyPool(#[from] EmptyPool),
}

/// How a `start` request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A fresh game began with this first pick.
    Started(Person),
    /// A game was already in progress; the current pick is re-asked without
    /// touching any state.
    Resumed(Person),
}

/// Everything the caller needs to build the reply for one judged answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReport {
    /// How the submitted text was judged.
    pub outcome: Outcome,
    /// The person the answer was judged against.
    pub person: Person,
    /// True when this answer resolved the last remaining person.
    pub finished: bool,
    /// Auto-drawn next pick, when the game continues in automatic mode.
    pub next: Option<Person>,
}

/// Mutable per-player record: identity, current pick, unresolved pool, and
/// cumulative statistics.
///
/// Owned exclusively by the session registry; all transitions run under the
/// registry's per-conversation lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSession {
    display_name: String,
    pick: Option<String>,
    remaining: IndexSet<String>,
    stats: Stats,
    started: bool,
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            pick: None,
            remaining: IndexSet::new(),
            stats: Stats::default(),
            started: false,
        }
    }
}

impl PlayerSession {
    /// Current phase, derived from the unresolved pool.
    pub fn phase(&self) -> GamePhase {
        if !self.started {
            GamePhase::Unstarted
        } else if self.remaining.is_empty() {
            GamePhase::Finished
        } else {
            GamePhase::InProgress
        }
    }

    /// True when the player has finished (or never started) their game.
    pub fn finished(&self) -> bool {
        self.phase() == GamePhase::Finished
    }

    /// Player-chosen display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Overwrite the display name. Validation happens at the DTO boundary.
    pub fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }

    /// Cumulative statistics for the current game.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Name of the person currently being asked about, if any.
    pub fn pick(&self) -> Option<&str> {
        self.pick.as_deref()
    }

    /// Number of persons not yet resolved this game.
    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    /// Whether the player advances manually.
    pub fn manual(&self) -> bool {
        self.stats.manual
    }

    /// Flip the progression mode; no other side effect.
    pub fn toggle_manual(&mut self) -> bool {
        self.stats.manual = !self.stats.manual;
        self.stats.manual
    }

    /// Reset the flush counter after a successful persistence flush.
    pub fn reset_flush_count(&mut self) {
        self.stats.count = 0;
    }

    /// Start a new game, or re-ask the current pick when one is already in
    /// progress and `force` is not set.
    pub fn start(&mut self, roster: &Roster, force: bool) -> Result<StartOutcome, SessionError> {
        if self.phase() == GamePhase::InProgress && !force {
            let person = match &self.pick {
                Some(name) => roster.person(name).ok_or(EmptyPool)?,
                // Manual mode between picks: re-asking means drawing the
                // pending pick now.
                None => {
                    let person = roster.draw(&self.remaining)?;
                    self.pick = Some(person.name.clone());
                    person
                }
            };
            return Ok(StartOutcome::Resumed(person));
        }

        self.remaining = roster.full_pool();
        self.stats.reset_game();
        self.started = true;
        let person = roster.draw(&self.remaining)?;
        self.pick = Some(person.name.clone());
        Ok(StartOutcome::Started(person))
    }

    /// Judge a submitted answer against the current pick and advance the game.
    ///
    /// Ambiguous outcomes leave the session untouched; every other outcome
    /// consumes the pick exactly once.
    pub fn submit_answer(
        &mut self,
        roster: &Roster,
        judge_config: &JudgeConfig,
        weights: &ScoreWeights,
        text: &str,
    ) -> Result<AnswerReport, SessionError> {
        if self.phase() != GamePhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        let Some(pick_name) = self.pick.clone() else {
            return Err(SessionError::NoPickPending);
        };
        let person = roster.person(&pick_name).ok_or(EmptyPool)?;

        let outcome = judge::judge(&person.name, text, judge_config);
        if !outcome.is_specific() {
            return Ok(AnswerReport {
                outcome,
                person,
                finished: false,
                next: None,
            });
        }

        match outcome {
            Outcome::Exact => self.stats.exact += 1,
            Outcome::Correct => self.stats.correct += 1,
            Outcome::Partial => self.stats.partial += 1,
            Outcome::Wrong => self.stats.wrong += 1,
            Outcome::Skip => self.stats.skipped += 1,
            Outcome::Ambiguous => unreachable!("ambiguous outcomes never consume the pick"),
        }

        self.remaining.shift_remove(&pick_name);
        self.pick = None;
        self.stats.refresh_score(weights);
        self.stats.count += 1;

        let finished = self.remaining.is_empty();
        let next = if finished || self.stats.manual {
            None
        } else {
            let next = roster.draw(&self.remaining)?;
            self.pick = Some(next.name.clone());
            Some(next)
        };

        Ok(AnswerReport {
            outcome,
            person,
            finished,
            next,
        })
    }

    /// Draw the next pick in manual mode.
    ///
    /// Rejected while the prior pick is still unresolved, outside manual mode,
    /// or without an active game.
    pub fn next_pick(&mut self, roster: &Roster) -> Result<Person, SessionError> {
        if self.phase() != GamePhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if !self.stats.manual {
            return Err(SessionError::NotManual);
        }
        if self.pick.is_some() {
            return Err(SessionError::PickPending);
        }
        let person = roster.draw(&self.remaining)?;
        self.pick = Some(person.name.clone());
        Ok(person)
    }

    /// Forcibly finish the game, whatever the completion ratio.
    pub fn end(&mut self) {
        self.remaining.clear();
        self.pick = None;
        self.started = true;
    }

    /// Rebuild a session from its persisted record.
    ///
    /// Progress entries and picks that no longer belong to the roster are
    /// dropped so a stale blob cannot make the game draw unknown persons.
    pub fn from_entity(entity: PlayerEntity, roster: &Roster) -> Self {
        let remaining: IndexSet<String> = entity
            .progress
            .into_iter()
            .filter(|name| roster.category_of(name).is_some())
            .collect();
        let pick = Some(entity.pick)
            .filter(|name| !name.is_empty() && roster.category_of(name).is_some());
        let data = entity.data;

        Self {
            display_name: entity.name,
            pick,
            remaining,
            stats: Stats {
                exact: data.exact,
                correct: data.correct,
                partial: data.partial,
                wrong: data.wrong,
                skipped: data.skipped,
                count: data.count,
                score: data.score,
                high_score: data.high_score,
                manual: data.manual,
            },
            started: true,
        }
    }

    /// Snapshot the session into its persisted record shape.
    pub fn to_entity(&self) -> PlayerEntity {
        PlayerEntity {
            name: self.display_name.clone(),
            pick: self.pick.clone().unwrap_or_default(),
            progress: self.remaining.iter().cloned().collect(),
            data: StatsEntity {
                exact: self.stats.exact,
                correct: self.stats.correct,
                partial: self.stats.partial,
                wrong: self.stats.wrong,
                skipped: self.stats.skipped,
                count: self.stats.count,
                score: self.stats.score,
                high_score: self.stats.high_score,
                manual: self.stats.manual,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec!["Bob".into()], vec!["Alice".into()])
    }

    fn judge_config() -> JudgeConfig {
        JudgeConfig::default()
    }

    fn weights() -> ScoreWeights {
        ScoreWeights::default()
    }

    fn started(roster: &Roster) -> PlayerSession {
        let mut session = PlayerSession::default();
        session.start(roster, true).unwrap();
        session
    }

    #[test]
    fn fresh_session_is_unstarted() {
        let session = PlayerSession::default();
        assert_eq!(session.phase(), GamePhase::Unstarted);
        assert_eq!(session.display_name(), DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn force_start_seeds_full_roster() {
        let roster = roster();
        let session = started(&roster);
        assert_eq!(session.remaining_len(), roster.len());
        assert_eq!(session.phase(), GamePhase::InProgress);
        assert!(session.pick().is_some());
    }

    #[test]
    fn start_without_force_is_an_idempotent_re_ask() {
        let roster = roster();
        let mut session = started(&roster);
        let pick_before = session.pick().unwrap().to_string();
        let remaining_before = session.remaining_len();

        let outcome = session.start(&roster, false).unwrap();
        match outcome {
            StartOutcome::Resumed(person) => assert_eq!(person.name, pick_before),
            other => panic!("expected resume, got {other:?}"),
        }
        assert_eq!(session.pick().unwrap(), pick_before);
        assert_eq!(session.remaining_len(), remaining_before);
        assert_eq!(*session.stats(), Stats::default());
    }

    #[test]
    fn force_start_keeps_high_score_only() {
        let roster = roster();
        let mut session = started(&roster);
        let pick = session.pick().unwrap().to_string();
        session
            .submit_answer(&roster, &judge_config(), &weights(), &pick)
            .unwrap();
        let high_score = session.stats().high_score;
        assert!(high_score > 0);

        session.start(&roster, true).unwrap();
        assert_eq!(session.stats().high_score, high_score);
        assert_eq!(session.stats().score, 0);
        assert_eq!(session.remaining_len(), roster.len());
    }

    #[test]
    fn exact_answer_consumes_pick_and_scores() {
        let roster = roster();
        let mut session = started(&roster);
        let pick = session.pick().unwrap().to_string();

        let report = session
            .submit_answer(&roster, &judge_config(), &weights(), &pick.to_lowercase())
            .unwrap();
        assert_eq!(report.outcome, Outcome::Exact);
        assert_eq!(session.stats().exact, 1);
        assert_eq!(session.remaining_len(), roster.len() - 1);
        assert_eq!(session.stats().score, 5);
        assert_eq!(session.stats().count, 1);
        // Auto mode draws the next pick immediately.
        assert!(report.next.is_some());
        assert!(session.pick().is_some());
    }

    #[test]
    fn pass_skips_and_consumes_pick() {
        let roster = roster();
        let mut session = started(&roster);

        let report = session
            .submit_answer(&roster, &judge_config(), &weights(), "pass")
            .unwrap();
        assert_eq!(report.outcome, Outcome::Skip);
        assert_eq!(session.stats().skipped, 1);
        assert_eq!(session.remaining_len(), roster.len() - 1);
        assert_eq!(session.stats().score, 0);
    }

    #[test]
    fn ambiguous_answer_leaves_session_untouched() {
        let roster = roster();
        let mut session = started(&roster);
        let before = session.clone();

        let report = session
            .submit_answer(&roster, &judge_config(), &weights(), "xy")
            .unwrap();
        assert_eq!(report.outcome, Outcome::Ambiguous);
        assert_eq!(session, before);

        // Repeated ambiguous submissions stay bit-identical.
        session
            .submit_answer(&roster, &judge_config(), &weights(), "ab")
            .unwrap();
        assert_eq!(session, before);
    }

    #[test]
    fn resolving_every_pick_finishes_the_game() {
        let roster = roster();
        let mut session = started(&roster);

        let first = session
            .submit_answer(&roster, &judge_config(), &weights(), "pass")
            .unwrap();
        assert!(!first.finished);
        let last = session
            .submit_answer(&roster, &judge_config(), &weights(), "pass")
            .unwrap();
        assert!(last.finished);
        assert!(last.next.is_none());
        assert_eq!(session.phase(), GamePhase::Finished);

        let err = session
            .submit_answer(&roster, &judge_config(), &weights(), "pass")
            .unwrap_err();
        assert_eq!(err, SessionError::NotInProgress);
    }

    #[test]
    fn manual_mode_waits_for_explicit_advance() {
        let roster = roster();
        let mut session = PlayerSession::default();
        session.toggle_manual();
        session.start(&roster, true).unwrap();

        let err = session.next_pick(&roster).unwrap_err();
        assert_eq!(err, SessionError::PickPending);

        let report = session
            .submit_answer(&roster, &judge_config(), &weights(), "pass")
            .unwrap();
        assert!(report.next.is_none());
        assert!(session.pick().is_none());
        assert_eq!(session.phase(), GamePhase::InProgress);

        let person = session.next_pick(&roster).unwrap();
        assert_eq!(session.pick(), Some(person.name.as_str()));
    }

    #[test]
    fn next_pick_requires_manual_mode() {
        let roster = roster();
        let mut session = started(&roster);
        assert_eq!(
            session.next_pick(&roster).unwrap_err(),
            SessionError::NotManual
        );

        let mut unstarted = PlayerSession::default();
        unstarted.toggle_manual();
        assert_eq!(
            unstarted.next_pick(&roster).unwrap_err(),
            SessionError::NotInProgress
        );
    }

    #[test]
    fn end_always_finishes() {
        let roster = roster();
        let mut session = started(&roster);
        assert_eq!(session.remaining_len(), 2);
        session.end();
        assert_eq!(session.phase(), GamePhase::Finished);
        assert_eq!(session.remaining_len(), 0);
        assert!(session.pick().is_none());

        let mut untouched = PlayerSession::default();
        untouched.end();
        assert_eq!(untouched.phase(), GamePhase::Finished);
    }

    #[test]
    fn high_score_never_decreases_across_answers() {
        let roster = Roster::new(
            vec!["Bob".into(), "Carl".into(), "Dave".into()],
            vec!["Alice".into()],
        );
        let mut session = PlayerSession::default();
        session.start(&roster, true).unwrap();

        let mut best = 0;
        while session.phase() == GamePhase::InProgress {
            let pick = session.pick().unwrap().to_string();
            // Alternate exact answers and wrong answers.
            let text = if session.stats().answered() % 2 == 0 {
                pick
            } else {
                "zzzzz".to_string()
            };
            session
                .submit_answer(&roster, &judge_config(), &weights(), &text)
                .unwrap();
            assert!(session.stats().high_score >= best);
            best = session.stats().high_score;
        }
    }

    #[test]
    fn entity_round_trip_preserves_state() {
        let roster = roster();
        let mut session = started(&roster);
        session.set_display_name("Tester".into());
        session
            .submit_answer(&roster, &judge_config(), &weights(), "pass")
            .unwrap();

        let entity = session.to_entity();
        assert_eq!(entity.name, "Tester");
        assert_eq!(entity.progress.len(), 1);
        assert_eq!(entity.data.skipped, 1);

        let restored = PlayerSession::from_entity(entity, &roster);
        assert_eq!(restored, session);
    }

    #[test]
    fn restore_drops_names_missing_from_roster() {
        let roster = roster();
        let entity = PlayerEntity {
            name: "Tester".into(),
            pick: "Ghost".into(),
            progress: vec!["Alice".into(), "Ghost".into()],
            data: StatsEntity::default(),
        };
        let restored = PlayerSession::from_entity(entity, &roster);
        assert_eq!(restored.remaining_len(), 1);
        assert!(restored.pick().is_none());
    }
}
