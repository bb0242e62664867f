//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::{OnceLock, RwLock};
use strum::{Display, EnumString};

/// How the late penalty of an activity is treated when a `LATE` submission is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LatePenaltyMode {
    /// The raw score is stored; the penalty is only reported back to the grader.
    #[default]
    Advisory,
    /// The penalty percentage is deducted from the raw score before it is stored.
    Automatic,
}

/// Which graded submission represents a student's result for an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GradingPolicy {
    /// Highest graded score across all attempts.
    #[default]
    Best,
    /// Graded submission with the highest attempt number.
    Last,
}

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub storage_root: String,
    pub storage_base_url: String,
    pub max_upload_bytes: u64,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub late_penalty_mode: LatePenaltyMode,
    pub grading_policy: GradingPolicy,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Unparseable values fall back to their defaults. `JWT_SECRET` defaults to an
    /// empty string; the server binary refuses to start without one.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "course-engine"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", "data/dev.db"),
            storage_root: var_or("STORAGE_ROOT", "data/submission_files"),
            storage_base_url: var_or("STORAGE_BASE_URL", "/files"),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 3000),
            jwt_secret: var_or("JWT_SECRET", ""),
            jwt_duration_minutes: parsed_or("JWT_DURATION_MINUTES", 60),
            late_penalty_mode: parsed_or("LATE_PENALTY_MODE", LatePenaltyMode::Advisory),
            grading_policy: parsed_or("GRADING_POLICY", GradingPolicy::Best),
        }
    }

    /// Returns a clone of the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> AppConfig {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
            .clone()
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_storage_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.storage_root = value.into());
    }

    pub fn set_storage_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.storage_base_url = value.into());
    }

    pub fn set_max_upload_bytes(value: u64) {
        AppConfig::set_field(|cfg| cfg.max_upload_bytes = value);
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_late_penalty_mode(value: LatePenaltyMode) {
        AppConfig::set_field(|cfg| cfg.late_penalty_mode = value);
    }

    pub fn set_grading_policy(value: GradingPolicy) {
        AppConfig::set_field(|cfg| cfg.grading_policy = value);
    }
}
