// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use super::test::Test;

/// Represents the 'results' table: one committed row per (user, test).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TestResult {
    pub id: i64,
    pub user_id: i64,
    pub test_id: i64,
    pub total_score: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One normalized answer, ready for scoring and persistence.
///
/// Built by the normalizer (which canonicalizes `selected`); only the scoring
/// step writes `score`.
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub selected: Vec<String>,
    pub marked: bool,
    pub score: i64,
}

/// DTO for submitting a completed test.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(max = 256))]
    #[validate(nested)]
    pub answers: Vec<AnswerPayload>,
}

/// One raw answer as sent by the client.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AnswerPayload {
    pub question_id: i64,

    /// Selected option labels, in any order, duplicates tolerated.
    #[validate(length(max = 8), custom(function = validate_label_shape))]
    pub selected: Vec<String>,

    /// Marked-for-review flag from the test-taking UI.
    #[serde(default)]
    pub marked: bool,
}

fn validate_label_shape(selected: &[String]) -> Result<(), validator::ValidationError> {
    for label in selected {
        if label.is_empty() || label.len() > 8 {
            return Err(validator::ValidationError::new("malformed_option_label"));
        }
    }
    Ok(())
}

/// DTO returned after a submission commits.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub result_id: i64,
    pub total_score: i64,
}

/// Per-question view for the review screen.
///
/// `selected`, `marked` and `score` are null until the user has submitted;
/// `correct` is omitted entirely while no result exists, so the answer key
/// never leaks mid-test.
#[derive(Debug, Serialize)]
pub struct QuestionReview {
    pub id: i64,
    pub position: i64,
    pub kind: String,
    pub prompt: String,
    pub options: Json<Vec<String>>,
    pub selected: Option<Json<Vec<String>>>,
    pub marked: Option<bool>,
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<Json<Vec<String>>>,
}

/// DTO for the submission read endpoint: test metadata, the result if one
/// exists, and one review entry per catalog question.
#[derive(Debug, Serialize)]
pub struct SubmissionView {
    pub test: Test,
    pub result: Option<TestResult>,
    pub questions: Vec<QuestionReview>,
}
