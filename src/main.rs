// src/main.rs

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use testline::config::Config;
use testline::routes;
use testline::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool.
    // WAL keeps concurrent submissions from starving readers; the busy
    // timeout lets a racing writer wait for the lock instead of erroring.
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("DATABASE_URL is not a valid SQLite URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .expect("Failed to open the submission store");

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Seed a demo test for local development
    if config.demo_seed {
        if let Err(e) = seed_demo_test(&pool).await {
            tracing::error!("Failed to seed demo test: {:?}", e);
        }
    }

    // Create AppState
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

/// Inserts a small four-question test when the store is empty, so a fresh
/// checkout has something to submit against.
async fn seed_demo_test(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM tests LIMIT 1")
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    tracing::info!("Seeding demo test...");
    let (test_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tests (name, starts_at, duration_minutes, question_count, marks_per_question)
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind("General knowledge demo")
    .bind(chrono::Utc::now())
    .bind(30_i64)
    .bind(4_i64)
    .bind(3_i64)
    .fetch_one(pool)
    .await?;

    let questions: [(&str, &str, [&str; 4], &[&str]); 4] = [
        (
            "single",
            "Which planet is closest to the sun?",
            ["Venus", "Earth", "Mercury", "Mars"],
            &["C"],
        ),
        (
            "single",
            "What is the chemical symbol for gold?",
            ["Ag", "Au", "Gd", "Go"],
            &["B"],
        ),
        (
            "multiple",
            "Which of these numbers are prime?",
            ["2", "4", "5", "9"],
            &["A", "C"],
        ),
        (
            "multiple",
            "Which of these are rivers?",
            ["Nile", "Everest", "Danube", "Sahara"],
            &["A", "C"],
        ),
    ];

    for (i, (kind, prompt, options, correct)) in questions.into_iter().enumerate() {
        sqlx::query(
            "INSERT INTO questions (test_id, position, kind, prompt, options, correct)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(test_id)
        .bind(i as i64 + 1)
        .bind(kind)
        .bind(prompt)
        .bind(sqlx::types::Json(options.to_vec()))
        .bind(sqlx::types::Json(correct.to_vec()))
        .execute(pool)
        .await?;
    }

    tracing::info!("Demo test seeded.");
    Ok(())
}
