//! Runtime settings

use crate::error::{Error, Result};
use crate::source::RecencyWindow;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a fetch → normalize → export run.
///
/// Values come from an optional TOML file and are then overridden by
/// `MAIL_DIGEST_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Provider OAuth token file
    pub token_file: PathBuf,

    /// SQLite database holding normalized emails
    pub database_path: PathBuf,

    /// JSON export written after each run
    pub export_path: PathBuf,

    /// Only messages newer than this many days are fetched
    pub recency_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("token.json"),
            database_path: PathBuf::from("mail_digest.db"),
            export_path: PathBuf::from("emails.json"),
            recency_days: 1,
        }
    }
}

impl Settings {
    /// Load from `path` when given, then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        settings.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `MAIL_DIGEST_*` overrides resolved through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MAIL_DIGEST_TOKEN_FILE") {
            self.token_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("MAIL_DIGEST_DATABASE_PATH") {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("MAIL_DIGEST_EXPORT_PATH") {
            self.export_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("MAIL_DIGEST_RECENCY_DAYS") {
            self.recency_days = v
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("MAIL_DIGEST_RECENCY_DAYS: {v:?}")))?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn window(&self) -> Result<RecencyWindow> {
        RecencyWindow::days(self.recency_days)
    }

    fn validate(&self) -> Result<()> {
        if self.recency_days == 0 {
            return Err(Error::Config("recency_days must be at least 1".into()));
        }
        Ok(())
    }
}
