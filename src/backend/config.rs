//! Backend configuration loading.
//!
//! Reads `coach.yaml` and resolves environment variables. The file is
//! optional — a missing file means built-in defaults (local backend on
//! port 8000, 30-second request timeout, one attempt, no retry).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::errors::BackendError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Default backend base address (the local API server).
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default total request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default TCP connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Environment variable that points directly at a config file.
const CONFIG_ENV: &str = "COACH_CONFIG";

/// Config file name searched for upward from the working directory.
const CONFIG_FILE: &str = "coach.yaml";

// ─── BackendConfig ───────────────────────────────────────────────────────────

/// Connection settings for the coaching API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base address of the coaching API.
    pub base_url: String,
    /// Total request timeout in seconds. The timeout surfaces as a soft
    /// failure to the caller; no retry is attempted.
    pub request_timeout_secs: u64,
    /// TCP connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// Load the configuration.
    ///
    /// Resolution order: `COACH_CONFIG` env var → upward search for
    /// `coach.yaml` from the working directory → built-in defaults. A file
    /// that exists but fails to parse is an error; a missing file is not.
    pub fn load() -> Result<Self, BackendError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let cwd = std::env::current_dir().unwrap_or_default();
        match find_config_path(&cwd) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and parse a specific config file.
    ///
    /// Performs environment-variable interpolation on values matching
    /// `${VAR_NAME}` or `${VAR_NAME:-default}` before parsing.
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let raw = std::fs::read_to_string(path).map_err(|e| BackendError::Config {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

        let interpolated = interpolate_env_vars(&raw);

        serde_yaml::from_str(&interpolated).map_err(|e| BackendError::Config {
            reason: format!("failed to parse {}: {e}", path.display()),
        })
    }
}

/// Walk upward from `start` looking for `coach.yaml`.
fn find_config_path(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in the raw config text.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve a variable expression like `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> String {
    match expr.find(":-") {
        Some(idx) => {
            let (var_name, default) = (&expr[..idx], &expr[idx + 2..]);
            std::env::var(var_name).unwrap_or_else(|_| default.to_string())
        }
        None => std::env::var(expr).unwrap_or_default(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
