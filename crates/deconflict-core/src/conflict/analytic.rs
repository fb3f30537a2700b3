//! Closed-form closest-approach conflict detection.
//!
//! Each waypoint leg is flown at constant velocity, so the separation between
//! two legs over their common time window is a quadratic in time and its
//! minimum can be solved for directly instead of sampled.

use crate::error::{ensure_positive, DeconflictError, Result};
use crate::models::{seconds_between, Conflict, Flight, Segment};
use crate::spatial::Position;

/// Time (seconds) and distance (meters) tolerance under which two conflicts
/// of the same flight pair are considered the same event.
///
/// Adjacent legs share their boundary waypoint, so a closest approach at that
/// instant is found once per leg pair.
pub const DEDUP_EPSILON: f64 = 1e-6;

/// Closest point of approach between two legs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub distance_m: f64,
    /// Time of closest approach on the legs' shared timeline
    pub time_s: f64,
    pub point_a: Position,
    pub point_b: Position,
}

fn velocity(segment: &Segment) -> Result<Position> {
    let duration = segment.duration_secs();
    if duration <= 0.0 {
        return Err(DeconflictError::invalid_argument(format!(
            "segment {} has zero duration; velocity is undefined",
            segment.index
        )));
    }
    Ok((segment.end - segment.start) * (1.0 / duration))
}

/// Exact minimum separation of two legs over the time both are flown.
///
/// Both segments must carry times on the same timeline. Returns `Ok(None)`
/// when their time intervals do not overlap, and an error when either leg
/// has zero duration.
pub fn closest_approach_linear(a: &Segment, b: &Segment) -> Result<Option<ClosestApproach>> {
    let v1 = velocity(a)?;
    let v2 = velocity(b)?;

    let window_start = a.t_start.max(b.t_start);
    let window_end = a.t_end.min(b.t_end);
    if window_start >= window_end {
        return Ok(None);
    }

    // Minimize |p_rel + v_rel * s|^2 for s in [0, window length].
    let v_rel = v1 - v2;
    let p_rel = (a.start + v1 * (window_start - a.t_start))
        - (b.start + v2 * (window_start - b.t_start));

    let speed_sq = v_rel.norm_squared();
    let s = if speed_sq > 0.0 {
        -p_rel.dot(v_rel) / speed_sq
    } else {
        0.0
    };
    let s = s.clamp(0.0, window_end - window_start);

    let point_a = a.start + v1 * (window_start - a.t_start + s);
    let point_b = b.start + v2 * (window_start - b.t_start + s);

    Ok(Some(ClosestApproach {
        distance_m: (point_a - point_b).norm(),
        time_s: window_start + s,
        point_a,
        point_b,
    }))
}

fn ensure_timed_legs(flight: &Flight) -> Result<()> {
    match flight.segments().find(|seg| seg.duration_secs() <= 0.0) {
        Some(seg) => Err(DeconflictError::invalid_argument(format!(
            "flight {} segment {} has zero duration; analytic mode needs strictly increasing time offsets",
            flight.flight_id(),
            seg.index
        ))),
        None => Ok(()),
    }
}

fn is_duplicate(existing: &Conflict, approach: &ClosestApproach) -> bool {
    (existing.time_offset_s - approach.time_s).abs() <= DEDUP_EPSILON
        && (existing.location - approach.point_a).norm() <= DEDUP_EPSILON
}

/// Detect conflicts from the exact closest approach of every leg pair.
///
/// Conflict times are seconds since the primary's mission start; other
/// flights' schedules are shifted onto that timeline.
pub fn detect_analytic(primary: &Flight, others: &[Flight], buffer: f64) -> Result<Vec<Conflict>> {
    ensure_positive("buffer", buffer)?;
    ensure_timed_legs(primary)?;
    for other in others {
        ensure_timed_legs(other)?;
    }

    let window = primary.mission_window();
    let mut conflicts = Vec::new();
    let mut pairs_checked = 0usize;

    for other in others {
        let shift = seconds_between(window.start, other.mission_window().start);
        let first_for_pair = conflicts.len();

        for a in primary.segments() {
            for b in other.segments() {
                pairs_checked += 1;
                let b = Segment {
                    t_start: b.t_start + shift,
                    t_end: b.t_end + shift,
                    ..b
                };

                let Some(approach) = closest_approach_linear(&a, &b)? else {
                    continue;
                };
                if approach.distance_m >= buffer {
                    continue;
                }
                if conflicts[first_for_pair..]
                    .iter()
                    .any(|c| is_duplicate(c, &approach))
                {
                    tracing::trace!(
                        primary = primary.flight_id(),
                        other = other.flight_id(),
                        t = approach.time_s,
                        "dropping duplicate boundary conflict"
                    );
                    continue;
                }

                conflicts.push(Conflict {
                    flight1_id: primary.flight_id().to_string(),
                    flight2_id: other.flight_id().to_string(),
                    time_offset_s: approach.time_s,
                    timestamp: window.instant_at(approach.time_s)?,
                    location: approach.point_a,
                    distance_m: approach.distance_m,
                });
            }
        }
    }

    tracing::debug!(
        primary = primary.flight_id(),
        others = others.len(),
        pairs_checked,
        conflicts = conflicts.len(),
        "analytic conflict check complete"
    );

    Ok(conflicts)
}
