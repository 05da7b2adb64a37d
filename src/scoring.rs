// src/scoring.rs

use std::str::FromStr;

use crate::error::AppError;

/// Question kinds the scoring engine knows how to mark.
/// Parsing is strict: any other catalog value is a data error, never a zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Single,
    Multiple,
}

impl FromStr for QuestionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(QuestionKind::Single),
            "multiple" => Ok(QuestionKind::Multiple),
            other => Err(AppError::UnknownQuestionKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Full-credit marks per question kind, loaded from configuration.
/// Partial credit for multiple choice is always one mark per correct pick.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    pub single_full_marks: i64,
    pub multiple_full_marks: i64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            single_full_marks: 3,
            multiple_full_marks: 4,
        }
    }
}

/// Scores one answer against the question's answer key.
///
/// Both `correct` and `selected` must be canonical label sets (sorted, no
/// duplicates); the normalizer guarantees this for `selected`.
///
/// Single choice: full marks on an exact one-element match, otherwise zero.
/// Multiple choice: an empty set or any wrong pick scores zero; an all-correct
/// selection earns full marks when it covers the whole key, otherwise one mark
/// per pick.
pub fn score_answer(
    kind: QuestionKind,
    correct: &[String],
    selected: &[String],
    policy: &ScoringPolicy,
) -> i64 {
    match kind {
        QuestionKind::Single => {
            if selected.len() == 1 && correct.len() == 1 && selected[0] == correct[0] {
                policy.single_full_marks
            } else {
                0
            }
        }
        QuestionKind::Multiple => {
            if selected.is_empty() || selected.iter().any(|pick| !correct.contains(pick)) {
                0
            } else if selected.len() == correct.len() {
                policy.multiple_full_marks
            } else {
                selected.len() as i64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_choice_exact_match() {
        let policy = ScoringPolicy::default();
        let score = score_answer(
            QuestionKind::Single,
            &labels(&["B"]),
            &labels(&["B"]),
            &policy,
        );
        assert_eq!(score, 3);
    }

    #[test]
    fn test_single_choice_wrong_pick() {
        let policy = ScoringPolicy::default();
        let score = score_answer(
            QuestionKind::Single,
            &labels(&["B"]),
            &labels(&["C"]),
            &policy,
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn test_single_choice_rejects_multiple_picks() {
        let policy = ScoringPolicy::default();
        // Two picks on a single-choice question can never be an exact match.
        let score = score_answer(
            QuestionKind::Single,
            &labels(&["B"]),
            &labels(&["B", "C"]),
            &policy,
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn test_unanswered_question_scores_zero() {
        let policy = ScoringPolicy::default();
        assert_eq!(
            score_answer(QuestionKind::Single, &labels(&["A"]), &[], &policy),
            0
        );
        assert_eq!(
            score_answer(QuestionKind::Multiple, &labels(&["A", "C"]), &[], &policy),
            0
        );
    }

    #[test]
    fn test_multi_choice_full_set() {
        let policy = ScoringPolicy::default();
        let score = score_answer(
            QuestionKind::Multiple,
            &labels(&["A", "C"]),
            &labels(&["A", "C"]),
            &policy,
        );
        assert_eq!(score, 4);
    }

    #[test]
    fn test_multi_choice_partial_subset() {
        let policy = ScoringPolicy::default();
        // All picks correct but the key is not covered: one mark per pick.
        let score = score_answer(
            QuestionKind::Multiple,
            &labels(&["A", "B", "C"]),
            &labels(&["A", "C"]),
            &policy,
        );
        assert_eq!(score, 2);
    }

    #[test]
    fn test_multi_choice_wrong_pick_disqualifies() {
        let policy = ScoringPolicy::default();
        // One wrong pick zeroes the question even if the others are right.
        let score = score_answer(
            QuestionKind::Multiple,
            &labels(&["A", "C"]),
            &labels(&["A", "D"]),
            &policy,
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn test_policy_overrides_full_marks() {
        let policy = ScoringPolicy {
            single_full_marks: 5,
            multiple_full_marks: 10,
        };
        assert_eq!(
            score_answer(QuestionKind::Single, &labels(&["A"]), &labels(&["A"]), &policy),
            5
        );
        assert_eq!(
            score_answer(
                QuestionKind::Multiple,
                &labels(&["A", "B"]),
                &labels(&["A", "B"]),
                &policy,
            ),
            10
        );
        // Partial credit stays per-pick regardless of the policy.
        assert_eq!(
            score_answer(
                QuestionKind::Multiple,
                &labels(&["A", "B", "D"]),
                &labels(&["A", "B"]),
                &policy,
            ),
            2
        );
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let policy = ScoringPolicy::default();
        let correct = labels(&["A", "C", "D"]);
        let selected = labels(&["A", "D"]);
        let first = score_answer(QuestionKind::Multiple, &correct, &selected, &policy);
        let second = score_answer(QuestionKind::Multiple, &correct, &selected, &policy);
        assert_eq!(first, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let parsed = "essay".parse::<QuestionKind>();
        assert!(matches!(
            parsed,
            Err(AppError::UnknownQuestionKind { .. })
        ));
    }

    #[test]
    fn test_known_kinds_parse() {
        assert_eq!("single".parse::<QuestionKind>().unwrap(), QuestionKind::Single);
        assert_eq!(
            "multiple".parse::<QuestionKind>().unwrap(),
            QuestionKind::Multiple
        );
    }
}
