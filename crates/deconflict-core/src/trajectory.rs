//! Trajectory interpolation: flight + time -> 3D position.
//!
//! Flights move in straight lines at constant velocity between consecutive
//! waypoints. Queries outside the waypoint time span yield `None`.

use crate::error::{ensure_positive, DeconflictError, Result};
use crate::models::Flight;
use crate::spatial::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Linearly interpolate between two timed points.
///
/// A zero-length interval (`t1 == t2`) returns `p1` unchanged.
pub fn linear_interp(p1: Position, p2: Position, t1: f64, t2: f64, t: f64) -> Position {
    if t1 == t2 {
        return p1;
    }
    p1.lerp(p2, (t - t1) / (t2 - t1))
}

/// Position of `flight` at an absolute instant.
pub fn position_at(flight: &Flight, query_time: DateTime<Utc>) -> Option<Position> {
    position_at_elapsed(flight, flight.mission_window().elapsed_secs(query_time))
}

/// Position of `flight` at `t` seconds after its mission start.
pub fn position_at_elapsed(flight: &Flight, t: f64) -> Option<Position> {
    let times = flight.time_offsets();
    let waypoints = flight.waypoints();
    let (first, last) = (*times.first()?, *times.last()?);
    if !(first..=last).contains(&t) {
        return None;
    }

    // Index of the first waypoint at or after `t`. Times are non-decreasing and
    // `t <= last`, so the segment ending there is the first one containing `t`.
    let idx = times.partition_point(|&ti| ti < t);
    let seg = idx.saturating_sub(1);

    Some(linear_interp(
        waypoints[seg].position(),
        waypoints[seg + 1].position(),
        times[seg],
        times[seg + 1],
        t,
    ))
}

/// Upper bound on the samples one sweep of a mission window may take.
pub const MAX_SAMPLES: u64 = 10_000_000;

/// Number of whole `time_step` increments that fit into `duration`.
///
/// Tolerates rounding so that e.g. 0.3 / 0.1 yields 3 rather than 2.
/// Steps too fine for the window (more than [`MAX_SAMPLES`]) are rejected.
pub(crate) fn step_count(duration: f64, time_step: f64) -> Result<u64> {
    let ratio = duration / time_step;
    if ratio <= 0.0 {
        return Ok(0);
    }
    let steps = (ratio * (1.0 + 1e-12) + 1e-9).floor();
    if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
        return Err(DeconflictError::invalid_argument(format!(
            "time_step {time_step}s over {duration}s would take more than {MAX_SAMPLES} samples"
        )));
    }
    Ok(steps as u64)
}

/// Elapsed time of sample `k`, never past the end of the window.
pub(crate) fn sample_time(k: u64, time_step: f64, duration: f64) -> f64 {
    (k as f64 * time_step).min(duration)
}

/// A single sampled point along a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub timestamp: DateTime<Utc>,
    pub elapsed_s: f64,
    pub position: Position,
}

/// Lazily sampled path of a flight. Iterate as many times as needed.
#[derive(Debug, Clone, Copy)]
pub struct Trajectory<'a> {
    flight: &'a Flight,
    time_step: f64,
    steps: u64,
}

impl<'a> Trajectory<'a> {
    pub fn flight(&self) -> &'a Flight {
        self.flight
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Fresh iterator starting at the beginning of the mission window.
    pub fn iter(&self) -> TrajectoryIter<'a> {
        TrajectoryIter {
            flight: self.flight,
            time_step: self.time_step,
            next: 0,
            steps: self.steps,
        }
    }
}

impl<'a> IntoIterator for &Trajectory<'a> {
    type Item = TrajectorySample;
    type IntoIter = TrajectoryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct TrajectoryIter<'a> {
    flight: &'a Flight,
    time_step: f64,
    next: u64,
    steps: u64,
}

impl Iterator for TrajectoryIter<'_> {
    type Item = TrajectorySample;

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.flight.mission_window();
        let duration = window.duration_secs();
        while self.next <= self.steps {
            let t = sample_time(self.next, self.time_step, duration);
            self.next += 1;
            if let Some(position) = position_at_elapsed(self.flight, t) {
                // t lies within the window, so the instant is representable.
                return Some(TrajectorySample {
                    timestamp: window.instant_at(t).unwrap_or(window.end),
                    elapsed_s: t,
                    position,
                });
            }
        }
        None
    }
}

/// Sample `flight` every `time_step` seconds across its mission window.
///
/// Instants where the flight is not airborne are skipped.
pub fn trajectory(flight: &Flight, time_step: f64) -> Result<Trajectory<'_>> {
    ensure_positive("time_step", time_step)?;
    Ok(Trajectory {
        flight,
        time_step,
        steps: step_count(flight.duration_secs(), time_step)?,
    })
}
