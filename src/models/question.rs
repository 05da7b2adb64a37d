// src/models/question.rs

use sqlx::{prelude::FromRow, types::Json};

/// Option labels a question can offer, in display order.
/// A question with N options uses the first N labels.
pub const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Returns the labels valid for a question with `option_count` options.
pub fn option_labels(option_count: usize) -> &'static [&'static str] {
    &OPTION_LABELS[..option_count.min(OPTION_LABELS.len())]
}

/// Represents the 'questions' table in the database.
///
/// Deliberately not serializable: `correct` is the answer key, and anything
/// sent to clients goes through a review DTO instead.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,

    pub test_id: i64,

    /// 1-based display position within the test.
    pub position: i64,

    /// Question kind: 'single' (single choice) or 'multiple' (multiple choice).
    pub kind: String,

    /// The text content of the question.
    pub prompt: String,

    /// Option texts in label order (index 0 is "A").
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// Answer key as a canonical (sorted, deduplicated) set of labels.
    pub correct: Json<Vec<String>>,
}
