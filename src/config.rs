//! Configuration handling
//!
//! Every setting is optional in the file. Environment variables are layered
//! on top with `apply_env`; accessors fall back to built-in defaults.

use crate::state::DEFAULT_MAX_DIGIT_SUM;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default submission endpoint (the mock server's route)
const DEFAULT_SUBMIT_URL: &str = "http://localhost:3000/api/users";
const DEFAULT_SUBMIT_METHOD: &str = "POST";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FIXTURE: &str = "error";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Where the form is submitted
    pub submit_url: Option<String>,
    /// HTTP method of the submit button
    pub submit_method: Option<String>,
    /// Ceiling for the phone number digit sum
    pub max_digit_sum: Option<u32>,
    /// Per-request timeout
    pub request_timeout_secs: Option<u64>,
    /// Mock server port
    pub server_port: Option<u16>,
    /// Directory the mock server serves statically
    pub static_dir: Option<PathBuf>,
    /// Directory holding the mock server's reply fixtures
    pub fixture_dir: Option<PathBuf>,
    /// Fixture name without extension (`success`, `error`, `progress`)
    pub fixture: Option<String>,
    /// Field list as `[{"name": "fio", "label": "FIO"}, ...]`
    pub fields: Option<serde_json::Value>,
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "signup-form", "signup-form")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let config: FormConfig = serde_json::from_str(&content)
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Override settings from `SIGNUP_FORM_SUBMIT_URL` and `PORT`
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SIGNUP_FORM_SUBMIT_URL") {
            self.submit_url = Some(url);
        }
        if let Some(port) = var("PORT").and_then(|port| port.parse().ok()) {
            self.server_port = Some(port);
        }
    }

    pub fn submit_url(&self) -> String {
        self.submit_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBMIT_URL.to_string())
    }

    pub fn submit_method(&self) -> String {
        self.submit_method
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBMIT_METHOD.to_string())
    }

    pub fn max_digit_sum(&self) -> u32 {
        self.max_digit_sum.unwrap_or(DEFAULT_MAX_DIGIT_SUM)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn server_port(&self) -> u16 {
        self.server_port.unwrap_or(DEFAULT_PORT)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.static_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("public"))
    }

    /// Path of the fixture file the mock server replies with
    pub fn fixture_path(&self) -> PathBuf {
        let dir = self
            .fixture_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("api"));
        let name = self.fixture.as_deref().unwrap_or(DEFAULT_FIXTURE);
        dir.join(format!("{name}.json"))
    }
}
