//! Scenario files: a primary flight plus scheduled traffic, as JSON.

use anyhow::{Context, Result};
use deconflict_core::Flight;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub primary: Flight,
    #[serde(default)]
    pub others: Vec<Flight>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scenario JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    /// Look up any flight in the scenario, primary included.
    pub fn flight(&self, flight_id: &str) -> Option<&Flight> {
        std::iter::once(&self.primary)
            .chain(&self.others)
            .find(|f| f.flight_id() == flight_id)
    }
}
