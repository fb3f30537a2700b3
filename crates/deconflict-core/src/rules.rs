//! Default parameters for mission checks.

use crate::mission::DetectionMode;
use serde::{Deserialize, Serialize};

/// Configuration for a deconfliction check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeconflictionRules {
    /// Minimum allowed separation in meters
    pub buffer_m: f64,
    /// Detector used by the check
    pub mode: DetectionMode,
    /// Seconds between samples in sampled mode
    pub time_step_s: f64,
}

impl Default for DeconflictionRules {
    fn default() -> Self {
        Self {
            buffer_m: 5.0,
            mode: DetectionMode::Analytic,
            time_step_s: 1.0,
        }
    }
}
