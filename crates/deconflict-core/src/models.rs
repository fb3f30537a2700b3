//! Core data models for mission deconfliction.

use crate::error::{DeconflictError, Result};
use crate::spatial::Position;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A timed 3D point on a flight's path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Seconds since mission start. Falls back to the waypoint's index when absent.
    #[serde(default, alias = "time_offset", skip_serializing_if = "Option::is_none")]
    pub time_offset_s: Option<f64>,
}

impl Waypoint {
    /// Create a waypoint without an explicit time offset.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            time_offset_s: None,
        }
    }

    /// Set the time offset in seconds since mission start.
    pub fn at(mut self, time_offset_s: f64) -> Self {
        self.time_offset_s = Some(time_offset_s);
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// Absolute time window during which a flight is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MissionWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window starting at `start` lasting `duration_s` seconds.
    pub fn from_duration(start: DateTime<Utc>, duration_s: f64) -> Result<Self> {
        Ok(Self {
            start,
            end: offset_time(start, duration_s)?,
        })
    }

    /// Mission duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        seconds_between(self.start, self.end)
    }

    /// Seconds elapsed since the window start (negative before it).
    pub fn elapsed_secs(&self, at: DateTime<Utc>) -> f64 {
        seconds_between(self.start, at)
    }

    /// Absolute instant `elapsed_s` seconds after the window start.
    ///
    /// Fails when the instant is not representable.
    pub fn instant_at(&self, elapsed_s: f64) -> Result<DateTime<Utc>> {
        offset_time(self.start, elapsed_s)
    }
}

/// Signed seconds from `from` to `to`, microsecond resolution.
pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}

pub(crate) fn offset_time(base: DateTime<Utc>, seconds: f64) -> Result<DateTime<Utc>> {
    let micros = (seconds * 1_000_000.0).round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(out_of_range(base, seconds));
    }
    base.checked_add_signed(Duration::microseconds(micros as i64))
        .ok_or_else(|| out_of_range(base, seconds))
}

fn out_of_range(base: DateTime<Utc>, seconds: f64) -> DeconflictError {
    DeconflictError::invalid_argument(format!(
        "{seconds}s from {} is outside the representable time range",
        base.to_rfc3339()
    ))
}

/// One straight-line leg of a flight, flown at constant velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start: Position,
    pub end: Position,
    pub t_start: f64,
    pub t_end: f64,
}

impl Segment {
    pub fn duration_secs(&self) -> f64 {
        self.t_end - self.t_start
    }
}

/// A drone flight: ordered waypoints flown within one mission window.
///
/// Flights are validated on construction (including deserialization), so
/// every `Flight` has at least two waypoints, finite coordinates and
/// non-decreasing effective time offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlightRecord")]
pub struct Flight {
    flight_id: String,
    waypoints: Vec<Waypoint>,
    mission_window: MissionWindow,
    #[serde(skip_serializing)]
    times: Vec<f64>,
}

#[derive(Deserialize)]
struct FlightRecord {
    flight_id: String,
    waypoints: Vec<Waypoint>,
    mission_window: MissionWindow,
}

impl TryFrom<FlightRecord> for Flight {
    type Error = DeconflictError;

    fn try_from(record: FlightRecord) -> Result<Self> {
        Flight::new(record.flight_id, record.waypoints, record.mission_window)
    }
}

impl Flight {
    pub fn new(
        flight_id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        mission_window: MissionWindow,
    ) -> Result<Self> {
        let flight_id = flight_id.into();

        if waypoints.len() < 2 {
            return Err(DeconflictError::invalid_flight(
                flight_id,
                format!("needs at least 2 waypoints, got {}", waypoints.len()),
            ));
        }
        if mission_window.end < mission_window.start {
            return Err(DeconflictError::invalid_flight(
                flight_id,
                "mission window ends before it starts",
            ));
        }

        let times = effective_time_offsets(&waypoints);

        for (idx, (wp, t)) in waypoints.iter().zip(&times).enumerate() {
            if !wp.position().is_finite() || !t.is_finite() {
                return Err(DeconflictError::invalid_flight(
                    flight_id,
                    format!("waypoint {idx} has a non-finite coordinate or time offset"),
                ));
            }
        }

        for (idx, t) in times.iter().enumerate() {
            if mission_window.instant_at(*t).is_err() {
                return Err(DeconflictError::invalid_flight(
                    flight_id,
                    format!("waypoint {idx} offset {t}s is outside the representable time range"),
                ));
            }
        }

        if let Some(idx) = times.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(DeconflictError::invalid_flight(
                flight_id,
                format!(
                    "time offsets must be non-decreasing: waypoint {} at {}s follows {}s",
                    idx + 1,
                    times[idx + 1],
                    times[idx]
                ),
            ));
        }

        Ok(Self {
            flight_id,
            waypoints,
            mission_window,
            times,
        })
    }

    pub fn flight_id(&self) -> &str {
        &self.flight_id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn mission_window(&self) -> &MissionWindow {
        &self.mission_window
    }

    /// Effective time offset of each waypoint (explicit or index-based).
    pub fn time_offsets(&self) -> &[f64] {
        &self.times
    }

    pub fn duration_secs(&self) -> f64 {
        self.mission_window.duration_secs()
    }

    /// Consecutive-waypoint legs in flight order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.waypoints
            .windows(2)
            .zip(self.times.windows(2))
            .enumerate()
            .map(|(index, (wps, ts))| Segment {
                index,
                start: wps[0].position(),
                end: wps[1].position(),
                t_start: ts[0],
                t_end: ts[1],
            })
    }
}

fn effective_time_offsets(waypoints: &[Waypoint]) -> Vec<f64> {
    waypoints
        .iter()
        .enumerate()
        .map(|(idx, wp)| wp.time_offset_s.unwrap_or(idx as f64))
        .collect()
}

/// Detected separation violation between the primary flight and another flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Primary flight
    pub flight1_id: String,
    pub flight2_id: String,
    /// Seconds since the primary flight's mission start
    pub time_offset_s: f64,
    /// Absolute instant of the conflict
    pub timestamp: DateTime<Utc>,
    /// Primary flight's position at the conflict time
    pub location: Position,
    pub distance_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_time_offsets_fall_back_to_index() {
        let flight = Flight::new(
            "F1",
            vec![
                Waypoint::new(0.0, 0.0, 0.0),
                Waypoint::new(1.0, 0.0, 0.0).at(4.0),
                Waypoint::new(2.0, 0.0, 0.0).at(5.0),
            ],
            MissionWindow::from_duration(start(), 5.0).unwrap(),
        )
        .unwrap();
        assert_eq!(flight.time_offsets(), &[0.0, 4.0, 5.0]);
    }

    #[test]
    fn rejects_single_waypoint() {
        let err = Flight::new(
            "F1",
            vec![Waypoint::new(0.0, 0.0, 0.0)],
            MissionWindow::from_duration(start(), 10.0).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, DeconflictError::InvalidFlight { ref flight_id, .. } if flight_id == "F1"));
    }

    #[test]
    fn rejects_decreasing_time_offsets() {
        let err = Flight::new(
            "F1",
            vec![
                Waypoint::new(0.0, 0.0, 0.0).at(0.0),
                Waypoint::new(1.0, 0.0, 0.0).at(8.0),
                Waypoint::new(2.0, 0.0, 0.0).at(6.0),
            ],
            MissionWindow::from_duration(start(), 10.0).unwrap(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-decreasing"));
    }

    #[test]
    fn accepts_tied_time_offsets() {
        let flight = Flight::new(
            "F1",
            vec![
                Waypoint::new(0.0, 0.0, 0.0).at(0.0),
                Waypoint::new(1.0, 0.0, 0.0).at(5.0),
                Waypoint::new(1.0, 1.0, 0.0).at(5.0),
            ],
            MissionWindow::from_duration(start(), 5.0).unwrap(),
        );
        assert!(flight.is_ok());
    }

    #[test]
    fn rejects_inverted_window_and_nan() {
        let window = MissionWindow::new(start(), start() - Duration::seconds(1));
        let wps = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(1.0, 0.0, 0.0)];
        assert!(Flight::new("F1", wps, window).is_err());

        let wps = vec![Waypoint::new(0.0, f64::NAN, 0.0), Waypoint::new(1.0, 0.0, 0.0)];
        assert!(Flight::new("F1", wps, MissionWindow::from_duration(start(), 1.0).unwrap()).is_err());
    }

    #[test]
    fn window_duration_and_instants() {
        let window = MissionWindow::from_duration(start(), 12.5).unwrap();
        assert!((window.duration_secs() - 12.5).abs() < 1e-9);
        assert_eq!(window.instant_at(2.0).unwrap(), start() + Duration::seconds(2));
        assert!((window.elapsed_secs(start() + Duration::seconds(3)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn unrepresentable_instants_are_errors() {
        assert!(MissionWindow::from_duration(start(), 1e300).is_err());
        assert!(MissionWindow::from_duration(start(), f64::INFINITY).is_err());

        let window = MissionWindow::from_duration(start(), 10.0).unwrap();
        assert!(matches!(window.instant_at(1e13), Err(DeconflictError::InvalidArgument(_))));
        assert!(window.instant_at(-1e13).is_err());
    }

    #[test]
    fn rejects_time_offsets_beyond_calendar_range() {
        let err = Flight::new(
            "F1",
            vec![
                Waypoint::new(0.0, 0.0, 0.0).at(1e13),
                Waypoint::new(10.0, 0.0, 0.0).at(1e13 + 10.0),
            ],
            MissionWindow::from_duration(start(), 10.0).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, DeconflictError::InvalidFlight { .. }));
        assert!(err.to_string().contains("representable"));
    }

    #[test]
    fn segments_follow_waypoint_order() {
        let flight = Flight::new(
            "F1",
            vec![
                Waypoint::new(0.0, 0.0, 0.0).at(0.0),
                Waypoint::new(10.0, 0.0, 0.0).at(5.0),
                Waypoint::new(10.0, 10.0, 0.0).at(10.0),
            ],
            MissionWindow::from_duration(start(), 10.0).unwrap(),
        )
        .unwrap();
        let segments: Vec<_> = flight.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].index, 1);
        assert_eq!(segments[1].start, Position::new(10.0, 0.0, 0.0));
        assert_eq!(segments[1].duration_secs(), 5.0);
    }

    #[test]
    fn deserialization_validates_flight() {
        let json = r#"{
            "flight_id": "F9",
            "waypoints": [
                {"x": 0.0, "y": 0.0, "time_offset": 0.0},
                {"x": 10.0, "y": 0.0, "z": 3.0, "time_offset_s": 10.0}
            ],
            "mission_window": {"start": "2025-06-01T12:00:00Z", "end": "2025-06-01T12:00:10Z"}
        }"#;
        let flight: Flight = serde_json::from_str(json).unwrap();
        assert_eq!(flight.flight_id(), "F9");
        assert_eq!(flight.time_offsets(), &[0.0, 10.0]);
        assert_eq!(flight.waypoints()[1].z, 3.0);

        let bad = json.replace("\"time_offset_s\": 10.0", "\"time_offset_s\": -1.0");
        let err = serde_json::from_str::<Flight>(&bad).unwrap_err();
        assert!(err.to_string().contains("non-decreasing"));
    }
}
