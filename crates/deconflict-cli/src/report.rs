//! Human-readable and JSON rendering of mission reports.

use anyhow::{Context, Result};
use deconflict_core::{Flight, MissionReport, TrajectorySample};
use std::fmt::Write;

/// Status line plus one line per conflict.
pub fn render_text(primary_id: &str, report: &MissionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Mission Status for {primary_id}: {}", report.status);

    if report.conflicts.is_empty() {
        out.push_str("No conflicts detected.\n");
        return out;
    }

    out.push_str("Conflicts detected:\n");
    for c in &report.conflicts {
        let _ = writeln!(
            out,
            "- With {} at t+{:.2}s ({}), distance {:.2}m, location {}",
            c.flight2_id,
            c.time_offset_s,
            c.timestamp.to_rfc3339(),
            c.distance_m,
            c.location
        );
    }
    out
}

/// One line per flight listing its waypoints.
pub fn render_flights(flights: &[Flight]) -> String {
    let mut out = String::new();
    for flight in flights {
        let points: Vec<String> = flight
            .waypoints()
            .iter()
            .map(|wp| wp.position().to_string())
            .collect();
        let _ = writeln!(out, "{} [{}]", flight.flight_id(), points.join(", "));
    }
    out
}

pub fn render_json(report: &MissionReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize mission report")
}

pub fn render_trajectory_json(samples: &[TrajectorySample]) -> Result<String> {
    serde_json::to_string_pretty(samples).context("Failed to serialize trajectory")
}
