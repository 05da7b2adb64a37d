// src/catalog.rs

use sqlx::SqliteConnection;

use crate::{
    error::AppError,
    models::{question::Question, test::Test},
};

/// Loads one test row, or 404 if it does not exist.
pub async fn fetch_test(conn: &mut SqliteConnection, test_id: i64) -> Result<Test, AppError> {
    sqlx::query_as::<_, Test>(
        "SELECT id, name, starts_at, duration_minutes, question_count, marks_per_question
         FROM tests WHERE id = ?",
    )
    .bind(test_id)
    .fetch_optional(conn)
    .await?
    .ok_or(AppError::NotFound("Test not found".to_string()))
}

/// Loads the full question list for a test in display order.
///
/// Takes a plain connection so callers can run it inside or outside a
/// transaction as the submission flow requires.
pub async fn fetch_test_questions(
    conn: &mut SqliteConnection,
    test_id: i64,
) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, test_id, position, kind, prompt, options, correct
         FROM questions WHERE test_id = ? ORDER BY position",
    )
    .bind(test_id)
    .fetch_all(conn)
    .await?;

    Ok(questions)
}
