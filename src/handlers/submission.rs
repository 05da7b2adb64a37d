// src/handlers/submission.rs

use std::collections::{HashMap, HashSet};

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{Sqlite, SqlitePool, Transaction, prelude::FromRow, types::Json as SqlJson};
use validator::Validate;

use crate::{
    catalog,
    config::Config,
    error::AppError,
    models::{
        question::{Question, option_labels},
        submission::{
            AnswerPayload, AnswerRecord, QuestionReview, SubmissionView, SubmitRequest,
            SubmitResponse, TestResult,
        },
    },
    scoring::{QuestionKind, score_answer},
    utils::jwt::Claims,
};

/// Submits a completed test: normalizes the answers, scores them, and commits
/// the result atomically.
///
/// Everything between reserving the (user, test) slot and the final commit
/// happens in one transaction, so a failure at any point leaves no trace and
/// the user may retry.
pub async fn post_submission(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Path(test_id): Path<i64>,
    Json(payload): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    // 1. Confirm the test exists. This read stays outside the transaction:
    //    the catalog is immutable once a test has started, and keeping the
    //    first in-transaction statement a write lets a racing duplicate
    //    surface as a clean constraint conflict.
    let mut conn = pool.acquire().await?;
    catalog::fetch_test(&mut conn, test_id).await?;
    drop(conn);

    let mut tx = pool.begin().await?;

    // 2. Reserve the single submission slot for this (user, test).
    let result_id = reserve_result(&mut tx, user_id, test_id).await?;

    // 3. Normalize the payload against the catalog and score every question.
    let questions = catalog::fetch_test_questions(&mut *tx, test_id).await?;
    let mut records = normalize_answers(&questions, payload.answers)?;

    let mut total_score = 0;
    for (question, record) in questions.iter().zip(records.iter_mut()) {
        let kind: QuestionKind = question.kind.parse()?;
        record.score = score_answer(kind, &question.correct.0, &record.selected, &config.scoring);
        total_score += record.score;
    }

    // 4. Persist one submission row per question, then the aggregate.
    for record in &records {
        sqlx::query(
            "INSERT INTO submissions (result_id, question_id, selected, marked, score)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(result_id)
        .bind(record.question_id)
        .bind(SqlJson(&record.selected))
        .bind(record.marked)
        .bind(record.score)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE results SET total_score = ? WHERE id = ?")
        .bind(total_score)
        .bind(result_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id, test_id, result_id, total_score, "submission committed");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            result_id,
            total_score,
        }),
    ))
}

/// Stakes the single (user, test) submission slot inside `tx`.
///
/// The INSERT is the transaction's first write: a concurrent attempt for the
/// same pair waits on the store's write lock and then trips the UNIQUE
/// constraint on (user_id, test_id), so exactly one caller ever wins.
/// Rolling the transaction back releases the slot again.
async fn reserve_result(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    test_id: i64,
) -> Result<i64, AppError> {
    let (result_id,): (i64,) = sqlx::query_as(
        "INSERT INTO results (user_id, test_id, total_score, created_at)
         VALUES (?, ?, 0, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(test_id)
    .bind(chrono::Utc::now())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::AlreadySubmitted,
        e => AppError::Storage(e),
    })?;

    Ok(result_id)
}

/// Turns the raw payload into exactly one record per catalog question.
///
/// Records come back in catalog order with each selected set deduplicated and
/// sorted, so scoring never depends on client-side ordering. Questions the
/// payload omits become records with an empty selected set.
fn normalize_answers(
    questions: &[Question],
    answers: Vec<AnswerPayload>,
) -> Result<Vec<AnswerRecord>, AppError> {
    let known: HashSet<i64> = questions.iter().map(|q| q.id).collect();

    let mut by_question: HashMap<i64, AnswerPayload> = HashMap::with_capacity(answers.len());
    for answer in answers {
        if !known.contains(&answer.question_id) {
            return Err(AppError::UnknownQuestion {
                question_id: answer.question_id,
            });
        }
        let question_id = answer.question_id;
        if by_question.insert(question_id, answer).is_some() {
            return Err(AppError::DuplicateAnswer { question_id });
        }
    }

    let mut records = Vec::with_capacity(questions.len());
    for question in questions {
        let (mut selected, marked) = match by_question.remove(&question.id) {
            Some(answer) => (answer.selected, answer.marked),
            None => (Vec::new(), false),
        };
        selected.sort();
        selected.dedup();

        let labels = option_labels(question.options.0.len());
        if let Some(bad) = selected.iter().find(|pick| !labels.contains(&pick.as_str())) {
            return Err(AppError::UnknownOption {
                question_id: question.id,
                option: bad.clone(),
            });
        }

        records.push(AnswerRecord {
            question_id: question.id,
            selected,
            marked,
            score: 0,
        });
    }

    Ok(records)
}

/// Row shape for the review query: every catalog question, joined with the
/// user's stored answer when a result exists.
#[derive(FromRow)]
struct ReviewRow {
    id: i64,
    position: i64,
    kind: String,
    prompt: String,
    options: SqlJson<Vec<String>>,
    correct: SqlJson<Vec<String>>,
    selected: Option<SqlJson<Vec<String>>>,
    marked: Option<bool>,
    score: Option<i64>,
}

/// Returns the user's view of a test: metadata, their result (if any), and
/// one entry per question.
///
/// Before a submission exists the per-answer fields are null and the answer
/// key is withheld; afterwards the same shape carries scores and the key.
/// Reading never writes, so the endpoint is idempotent either way.
pub async fn get_submission(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(test_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    // All three reads run in one transaction so the result row and the
    // joined rows come from the same snapshot: a submission committing
    // mid-read must not pair a null result with populated scores.
    let mut tx = pool.begin().await?;

    let test = catalog::fetch_test(&mut *tx, test_id).await?;

    let result = sqlx::query_as::<_, TestResult>(
        "SELECT id, user_id, test_id, total_score, created_at
         FROM results WHERE user_id = ? AND test_id = ?",
    )
    .bind(user_id)
    .bind(test_id)
    .fetch_optional(&mut *tx)
    .await?;

    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT
            q.id, q.position, q.kind, q.prompt, q.options, q.correct,
            s.selected AS selected, s.marked AS marked, s.score AS score
        FROM questions q
        LEFT JOIN results r ON r.test_id = q.test_id AND r.user_id = ?
        LEFT JOIN submissions s ON s.result_id = r.id AND s.question_id = q.id
        WHERE q.test_id = ?
        ORDER BY q.position
        "#,
    )
    .bind(user_id)
    .bind(test_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let submitted = result.is_some();
    let questions = rows
        .into_iter()
        .map(|row| QuestionReview {
            id: row.id,
            position: row.position,
            kind: row.kind,
            prompt: row.prompt,
            options: row.options,
            selected: row.selected,
            marked: row.marked,
            score: row.score,
            correct: submitted.then_some(row.correct),
        })
        .collect();

    Ok(Json(SubmissionView {
        test,
        result,
        questions,
    }))
}
