// src/config.rs

use std::env;

use dotenvy::dotenv;

use crate::scoring::ScoringPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub demo_seed: bool,
    pub scoring: ScoringPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .map(|v| v.parse().expect("JWT_EXPIRATION must be a number of seconds"))
            .unwrap_or(3600);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .map(|v| v.parse().expect("PORT must be a valid port number"))
            .unwrap_or(3000);

        let demo_seed = env::var("DEMO_SEED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let defaults = ScoringPolicy::default();
        let scoring = ScoringPolicy {
            single_full_marks: env::var("SINGLE_CHOICE_MARKS")
                .map(|v| v.parse().expect("SINGLE_CHOICE_MARKS must be a number"))
                .unwrap_or(defaults.single_full_marks),
            multiple_full_marks: env::var("MULTI_CHOICE_MARKS")
                .map(|v| v.parse().expect("MULTI_CHOICE_MARKS must be a number"))
                .unwrap_or(defaults.multiple_full_marks),
        };

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            demo_seed,
            scoring,
        }
    }
}
