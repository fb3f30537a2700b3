//! Runner configuration from environment.

use deconflict_core::{DeconflictError, DeconflictionRules, DetectionMode};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = DeconflictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(DeconflictError::invalid_argument(format!(
                "DECONFLICT_LOG_FORMAT must be 'text' or 'json', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub buffer_m: f64,
    pub mode: DetectionMode,
    pub time_step_s: f64,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, DeconflictError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys fall back to defaults;
    /// malformed values are rejected instead of silently defaulted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DeconflictError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DeconflictionRules::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let buffer_m = match get("DECONFLICT_BUFFER_M") {
            Some(raw) => parse_number("DECONFLICT_BUFFER_M", &raw)?,
            None => defaults.buffer_m,
        };
        let time_step_s = match get("DECONFLICT_TIME_STEP_S") {
            Some(raw) => parse_number("DECONFLICT_TIME_STEP_S", &raw)?,
            None => defaults.time_step_s,
        };
        let mode = match get("DECONFLICT_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.mode,
        };
        let log_format = match get("DECONFLICT_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Text,
        };

        Ok(Self {
            buffer_m,
            mode,
            time_step_s,
            log_format,
        })
    }

    pub fn rules(&self) -> DeconflictionRules {
        DeconflictionRules {
            buffer_m: self.buffer_m,
            mode: self.mode,
            time_step_s: self.time_step_s,
        }
    }
}

fn parse_number(key: &str, raw: &str) -> Result<f64, DeconflictError> {
    raw.trim().parse().map_err(|_| {
        DeconflictError::invalid_argument(format!("{key} must be a number, got '{raw}'"))
    })
}
