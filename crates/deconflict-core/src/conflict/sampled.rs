//! Time-stepped conflict detection.
//!
//! Accuracy is bounded by the step: a violation shorter than `time_step`
//! can fall between two samples and go unreported.

use crate::error::{ensure_positive, Result};
use crate::models::{seconds_between, Conflict, Flight};
use crate::spatial::euclidean_distance;
use crate::trajectory::{position_at_elapsed, sample_time, step_count};

/// Detect conflicts by sampling every `time_step` seconds of the primary's window.
///
/// A conflict is recorded for every (instant, flight) pair whose separation is
/// strictly below `buffer`; a distance exactly equal to the buffer is safe.
pub fn detect_sampled(
    primary: &Flight,
    others: &[Flight],
    buffer: f64,
    time_step: f64,
) -> Result<Vec<Conflict>> {
    ensure_positive("buffer", buffer)?;
    ensure_positive("time_step", time_step)?;

    let window = primary.mission_window();
    let duration = window.duration_secs();
    let steps = step_count(duration, time_step)?;

    // Shift from the primary's clock to each other flight's clock.
    let clock_offsets: Vec<f64> = others
        .iter()
        .map(|other| seconds_between(other.mission_window().start, window.start))
        .collect();

    let mut conflicts = Vec::new();

    for k in 0..=steps {
        let t = sample_time(k, time_step, duration);
        let Some(primary_pos) = position_at_elapsed(primary, t) else {
            continue;
        };

        for (other, offset) in others.iter().zip(&clock_offsets) {
            let Some(other_pos) = position_at_elapsed(other, t + offset) else {
                continue;
            };

            let distance = euclidean_distance(primary_pos, other_pos);
            if distance < buffer {
                tracing::trace!(
                    primary = primary.flight_id(),
                    other = other.flight_id(),
                    t,
                    distance,
                    "sampled separation violation"
                );
                conflicts.push(Conflict {
                    flight1_id: primary.flight_id().to_string(),
                    flight2_id: other.flight_id().to_string(),
                    time_offset_s: t,
                    timestamp: window.instant_at(t)?,
                    location: primary_pos,
                    distance_m: distance,
                });
            }
        }
    }

    tracing::debug!(
        primary = primary.flight_id(),
        others = others.len(),
        samples = steps + 1,
        conflicts = conflicts.len(),
        "sampled conflict check complete"
    );

    Ok(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MissionWindow, Waypoint};
    use crate::spatial::Position;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn line(id: &str, from: (f64, f64, f64), to: (f64, f64, f64), start: DateTime<Utc>) -> Flight {
        Flight::new(
            id,
            vec![
                Waypoint::new(from.0, from.1, from.2).at(0.0),
                Waypoint::new(to.0, to.1, to.2).at(10.0),
            ],
            MissionWindow::from_duration(start, 10.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_conflict_when_far_apart() {
        let f1 = line("F1", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), start());
        let f2 = line("F2", (100.0, 100.0, 0.0), (110.0, 100.0, 0.0), start());
        assert!(detect_sampled(&f1, &[f2], 5.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn crossing_flights_conflict_at_center() {
        let f1 = line("F1", (0.0, 0.0, 0.0), (10.0, 10.0, 0.0), start());
        let f2 = line("F2", (10.0, 0.0, 0.0), (0.0, 10.0, 0.0), start());
        let conflicts = detect_sampled(&f1, &[f2], 2.0, 1.0).unwrap();

        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.flight1_id, "F1");
        assert_eq!(c.flight2_id, "F2");
        assert_eq!(c.time_offset_s, 5.0);
        assert_eq!(c.timestamp, start() + Duration::seconds(5));
        assert_eq!(c.location, Position::new(5.0, 5.0, 0.0));
        assert!(c.distance_m < 1e-9);
    }

    #[test]
    fn distance_equal_to_buffer_is_safe() {
        let f1 = line("F1", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), start());
        let f2 = line("F2", (0.0, 5.0, 0.0), (10.0, 5.0, 0.0), start());
        assert!(detect_sampled(&f1, &[f2], 5.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn other_flight_positions_use_their_own_clock() {
        // F2 starts 3s later on the same path, so it trails F1 by 3 m.
        let f1 = line("F1", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), start());
        let f2 = line("F2", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), start() + Duration::seconds(3));
        let conflicts = detect_sampled(&f1, &[f2], 3.5, 1.0).unwrap();

        // Overlap covers primary seconds 3..=10.
        assert_eq!(conflicts.len(), 8);
        assert_eq!(conflicts[0].time_offset_s, 3.0);
        assert!(conflicts.iter().all(|c| (c.distance_m - 3.0).abs() < 1e-9));
    }

    #[test]
    fn rejects_non_positive_arguments() {
        let f1 = line("F1", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), start());
        assert!(detect_sampled(&f1, &[], 0.0, 1.0).is_err());
        assert!(detect_sampled(&f1, &[], 5.0, 0.0).is_err());
    }

    #[test]
    fn rejects_vanishingly_small_step() {
        let f1 = line("F1", (0.0, 0.0, 0.0), (10.0, 0.0, 0.0), start());
        let f2 = line("F2", (0.0, 1.0, 0.0), (10.0, 1.0, 0.0), start());
        let err = detect_sampled(&f1, &[f2], 5.0, 1e-300).unwrap_err();
        assert!(err.to_string().contains("samples"));
    }
}
