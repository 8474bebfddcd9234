//! Process configuration read from the environment.
//!
//! `main` loads a `.env` file first (via `dotenvy`), so every key below may
//! also live there:
//!
//! | Variable        | Default                       |
//! |-----------------|-------------------------------|
//! | `HOST`          | `0.0.0.0`                     |
//! | `PORT`          | `3000`                        |
//! | `DATABASE_URL`  | `sqlite://survey.db`          |
//! | `LOG_FILE_PATH` | `logs/survey_collector.log`   |
//!
//! `DATABASE_URL=memory` keeps surveys in process memory only.

use anyhow::{Context, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://survey.db";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/survey_collector.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_file_path: String,
}

impl Config {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            log_file_path: lookup("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
        })
    }
}
