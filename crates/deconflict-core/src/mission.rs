//! Mission check entry point: pick a detector and report a verdict.

use crate::conflict::{detect_analytic, detect_sampled};
use crate::error::{DeconflictError, Result};
use crate::models::{Conflict, Flight};
use crate::rules::DeconflictionRules;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default sampling interval for sampled mode, in seconds.
pub const DEFAULT_TIME_STEP_S: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Discrete time stepping
    Sampled,
    /// Closed-form closest approach per segment pair
    Analytic,
}

impl FromStr for DetectionMode {
    type Err = DeconflictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sampled" => Ok(Self::Sampled),
            "analytic" => Ok(Self::Analytic),
            other => Err(DeconflictError::invalid_argument(format!(
                "mode must be 'sampled' or 'analytic', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMode::Sampled => write!(f, "sampled"),
            DetectionMode::Analytic => write!(f, "analytic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Safe,
    Conflict,
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionStatus::Safe => write!(f, "SAFE"),
            MissionStatus::Conflict => write!(f, "CONFLICT"),
        }
    }
}

/// Verdict plus every conflict found, in detection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub status: MissionStatus,
    pub conflicts: Vec<Conflict>,
}

impl MissionReport {
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        let status = if conflicts.is_empty() {
            MissionStatus::Safe
        } else {
            MissionStatus::Conflict
        };
        Self { status, conflicts }
    }

    pub fn is_safe(&self) -> bool {
        self.status == MissionStatus::Safe
    }
}

/// Check `primary` against scheduled traffic.
///
/// `time_step` only applies to sampled mode and defaults to one second.
pub fn check_mission(
    primary: &Flight,
    others: &[Flight],
    buffer: f64,
    mode: DetectionMode,
    time_step: Option<f64>,
) -> Result<MissionReport> {
    let conflicts = match mode {
        DetectionMode::Sampled => detect_sampled(
            primary,
            others,
            buffer,
            time_step.unwrap_or(DEFAULT_TIME_STEP_S),
        )?,
        DetectionMode::Analytic => detect_analytic(primary, others, buffer)?,
    };

    let report = MissionReport::from_conflicts(conflicts);
    tracing::info!(
        primary = primary.flight_id(),
        %mode,
        buffer,
        status = %report.status,
        conflicts = report.conflicts.len(),
        "mission check"
    );
    Ok(report)
}

/// Check `primary` against scheduled traffic using configured rules.
pub fn check_mission_with_rules(
    primary: &Flight,
    others: &[Flight],
    rules: &DeconflictionRules,
) -> Result<MissionReport> {
    check_mission(
        primary,
        others,
        rules.buffer_m,
        rules.mode,
        Some(rules.time_step_s),
    )
}
