//! Fuzzy answer judging: classifies a free-text guess against the current pick.

use serde::{Deserialize, Serialize};

/// Reserved answer that skips the current pick.
const PASS_KEYWORD: &str = "pass";

/// Tunable knobs for the judging heuristic.
///
/// The stoplist and the minimum token length decide which tokens count as
/// discriminating ("content") versus filler. Both come from the runtime
/// configuration so the lists can be tuned without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Common first-name components that never make an answer specific.
    ///
    /// Membership is tested as a case-insensitive substring of a stoplist
    /// entry, so "muham" is filler against "muhammad".
    pub stoplist: Vec<String>,
    /// Tokens shorter than this are always filler.
    pub min_token_len: usize,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            stoplist: vec!["muhammad".into(), "muhamad".into(), "naufal".into()],
            min_token_len: 3,
        }
    }
}

/// Graduated outcome of judging one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Full case-insensitive equality with the pick's name.
    Exact,
    /// Every content token matched a part of the name.
    Correct,
    /// Some content tokens matched, at least one did not.
    Partial,
    /// No content token matched.
    Wrong,
    /// No content token at all; the pick is re-asked, nothing is consumed.
    Ambiguous,
    /// The player passed on the pick.
    Skip,
}

impl Outcome {
    /// Whether this outcome consumes the pick (everything except [`Outcome::Ambiguous`]).
    pub fn is_specific(self) -> bool {
        !matches!(self, Outcome::Ambiguous)
    }
}

/// Classify `submitted` against `pick_name`.
///
/// Case-insensitive throughout. Tokens are split on whitespace; a token is
/// filler when it is a substring of a stoplist entry or shorter than the
/// configured minimum, content otherwise; a token hits when it is a substring
/// of the pick's name.
pub fn judge(pick_name: &str, submitted: &str, config: &JudgeConfig) -> Outcome {
    let submitted = submitted.trim().to_lowercase();
    let pick = pick_name.to_lowercase();

    if submitted == PASS_KEYWORD {
        return Outcome::Skip;
    }
    if submitted == pick {
        return Outcome::Exact;
    }

    let mut has_content = false;
    let mut any_hit = false;
    let mut all_hit = true;

    for token in submitted.split_whitespace() {
        if is_filler(token, config) {
            continue;
        }
        has_content = true;
        if pick.contains(token) {
            any_hit = true;
        } else {
            all_hit = false;
        }
    }

    if !has_content {
        Outcome::Ambiguous
    } else if any_hit && all_hit {
        Outcome::Correct
    } else if any_hit {
        Outcome::Partial
    } else {
        Outcome::Wrong
    }
}

fn is_filler(token: &str, config: &JudgeConfig) -> bool {
    token.len() < config.min_token_len
        || config
            .stoplist
            .iter()
            .any(|entry| entry.to_lowercase().contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JudgeConfig {
        JudgeConfig::default()
    }

    #[test]
    fn pass_is_skip() {
        assert_eq!(judge("Alice", "pass", &config()), Outcome::Skip);
        assert_eq!(judge("Alice", "PASS", &config()), Outcome::Skip);
    }

    #[test]
    fn full_name_equality_is_exact() {
        assert_eq!(
            judge("Fatih Al-Mutawakkil", "fatih al-mutawakkil", &config()),
            Outcome::Exact
        );
        assert_eq!(judge("Alice", "ALICE", &config()), Outcome::Exact);
    }

    #[test]
    fn single_matching_content_token_is_correct() {
        // "fati" has length >= 3, is no stoplist entry, and is a substring of
        // the name, so every content token hits.
        assert_eq!(
            judge("Fatih Al-Mutawakkil", "fati", &config()),
            Outcome::Correct
        );
    }

    #[test]
    fn unmatched_content_token_is_wrong() {
        assert_eq!(
            judge("Fatih Al-Mutawakkil", "xyz", &config()),
            Outcome::Wrong
        );
    }

    #[test]
    fn short_tokens_alone_are_ambiguous() {
        // "al" is shorter than the minimum token length, so the answer carries
        // no content token even though it appears inside the name.
        assert_eq!(
            judge("Fatih Al-Mutawakkil", "al", &config()),
            Outcome::Ambiguous
        );
    }

    #[test]
    fn stoplist_substring_tokens_are_filler() {
        // "muham" is a substring of the stoplist entry "muhammad".
        assert_eq!(
            judge("Muhammad Rifqi", "muham", &config()),
            Outcome::Ambiguous
        );
        // One filler plus one hitting content token still judges on content.
        assert_eq!(
            judge("Muhammad Rifqi", "muhammad rifqi", &config()),
            Outcome::Correct
        );
    }

    #[test]
    fn mixed_hits_are_partial() {
        assert_eq!(
            judge("Fatih Al-Mutawakkil", "fatih wibowo", &config()),
            Outcome::Partial
        );
    }

    #[test]
    fn empty_answer_is_ambiguous() {
        assert_eq!(judge("Alice", "", &config()), Outcome::Ambiguous);
        assert_eq!(judge("Alice", "   ", &config()), Outcome::Ambiguous);
    }

    #[test]
    fn min_token_len_is_configurable() {
        let config = JudgeConfig {
            stoplist: vec![],
            min_token_len: 2,
        };
        assert_eq!(judge("Fatih Al-Mutawakkil", "al", &config), Outcome::Correct);
    }
}
