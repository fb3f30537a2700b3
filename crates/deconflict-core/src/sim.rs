//! Flight generation for scenarios and tests.
//!
//! Produces handcrafted or random flights whose waypoints are evenly spaced in
//! time across the mission window.

use crate::error::{ensure_positive, DeconflictError, Result};
use crate::models::{Flight, MissionWindow, Waypoint};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Flat flight, altitude pinned to zero
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
}

impl Dimension {
    fn altitude(self, z: f64) -> f64 {
        match self {
            Dimension::TwoD => 0.0,
            Dimension::ThreeD => z,
        }
    }
}

/// Parameters for [`generate_random_flight`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomFlightParams {
    pub num_waypoints: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub z_range: (f64, f64),
    pub duration_s: f64,
    pub dimension: Dimension,
}

impl Default for RandomFlightParams {
    fn default() -> Self {
        Self {
            num_waypoints: 5,
            x_range: (0.0, 100.0),
            y_range: (0.0, 100.0),
            z_range: (0.0, 20.0),
            duration_s: 300.0,
            dimension: Dimension::ThreeD,
        }
    }
}

impl RandomFlightParams {
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }
}

fn evenly_spaced_offset(index: usize, count: usize, duration_s: f64) -> f64 {
    index as f64 * (duration_s / (count - 1) as f64)
}

fn ensure_waypoint_count(flight_id: &str, count: usize) -> Result<()> {
    if count < 2 {
        return Err(DeconflictError::invalid_flight(
            flight_id,
            format!("needs at least 2 waypoints, got {count}"),
        ));
    }
    Ok(())
}

fn sample_range<R: Rng>(rng: &mut R, name: &str, (lo, hi): (f64, f64)) -> Result<f64> {
    if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
        return Err(DeconflictError::invalid_argument(format!(
            "{name} must be a finite (min, max) pair, got ({lo}, {hi})"
        )));
    }
    Ok(rng.random_range(lo..=hi))
}

/// Build a flight through the given points, spread evenly over `duration_s`.
pub fn generate_handcoded_flight(
    flight_id: &str,
    points: &[(f64, f64, f64)],
    start: DateTime<Utc>,
    duration_s: f64,
    dimension: Dimension,
) -> Result<Flight> {
    ensure_waypoint_count(flight_id, points.len())?;
    ensure_positive("duration_s", duration_s)?;

    let waypoints = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y, z))| {
            Waypoint::new(x, y, dimension.altitude(z)).at(evenly_spaced_offset(
                i,
                points.len(),
                duration_s,
            ))
        })
        .collect();

    Flight::new(
        flight_id,
        waypoints,
        MissionWindow::from_duration(start, duration_s)?,
    )
}

/// Build a flight through uniformly random points.
pub fn generate_random_flight<R: Rng>(
    flight_id: &str,
    start: DateTime<Utc>,
    params: &RandomFlightParams,
    rng: &mut R,
) -> Result<Flight> {
    ensure_waypoint_count(flight_id, params.num_waypoints)?;
    ensure_positive("duration_s", params.duration_s)?;

    let mut waypoints = Vec::with_capacity(params.num_waypoints);
    for i in 0..params.num_waypoints {
        let x = sample_range(rng, "x_range", params.x_range)?;
        let y = sample_range(rng, "y_range", params.y_range)?;
        let z = match params.dimension {
            Dimension::TwoD => 0.0,
            Dimension::ThreeD => sample_range(rng, "z_range", params.z_range)?,
        };
        let offset = evenly_spaced_offset(i, params.num_waypoints, params.duration_s);
        waypoints.push(Waypoint::new(x, y, z).at(offset));
    }

    Flight::new(
        flight_id,
        waypoints,
        MissionWindow::from_duration(start, params.duration_s)?,
    )
}

/// Random flights `Flight_1..=Flight_n` sharing one start time.
pub fn generate_flight_scenario<R: Rng>(
    num_flights: usize,
    start: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<Flight>> {
    let params = RandomFlightParams::default();
    (1..=num_flights)
        .map(|i| generate_random_flight(&format!("Flight_{i}"), start, &params, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn handcoded_flight_spreads_time_evenly() {
        let flight = generate_handcoded_flight(
            "F1",
            &[(0.0, 0.0, 3.0), (10.0, 0.0, 3.0), (10.0, 10.0, 6.0)],
            start(),
            10.0,
            Dimension::ThreeD,
        )
        .unwrap();
        assert_eq!(flight.time_offsets(), &[0.0, 5.0, 10.0]);
        assert_eq!(flight.waypoints()[2].z, 6.0);
        assert!((flight.duration_secs() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn two_d_flights_are_flat() {
        let flight = generate_handcoded_flight(
            "F1",
            &[(0.0, 0.0, 3.0), (10.0, 0.0, 7.0)],
            start(),
            10.0,
            Dimension::TwoD,
        )
        .unwrap();
        assert!(flight.waypoints().iter().all(|wp| wp.z == 0.0));
    }

    #[test]
    fn handcoded_flight_needs_two_points() {
        let err = generate_handcoded_flight("F1", &[(0.0, 0.0, 0.0)], start(), 10.0, Dimension::TwoD)
            .unwrap_err();
        assert!(matches!(err, DeconflictError::InvalidFlight { .. }));
    }

    #[test]
    fn rejects_durations_past_calendar_range() {
        let err = generate_handcoded_flight(
            "F1",
            &[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)],
            start(),
            1e300,
            Dimension::TwoD,
        )
        .unwrap_err();
        assert!(matches!(err, DeconflictError::InvalidArgument(_)));

        let params = RandomFlightParams {
            duration_s: 1e300,
            ..RandomFlightParams::default()
        };
        assert!(generate_random_flight("R1", start(), &params, &mut StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn random_flight_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = RandomFlightParams::default();
        let flight = generate_random_flight("R1", start(), &params, &mut rng).unwrap();

        assert_eq!(flight.waypoints().len(), 5);
        assert_eq!(flight.time_offsets(), &[0.0, 75.0, 150.0, 225.0, 300.0]);
        for wp in flight.waypoints() {
            assert!((0.0..=100.0).contains(&wp.x));
            assert!((0.0..=100.0).contains(&wp.y));
            assert!((0.0..=20.0).contains(&wp.z));
        }
    }

    #[test]
    fn random_flight_is_reproducible_with_seed() {
        let params = RandomFlightParams::default().with_dimension(Dimension::TwoD);
        let a = generate_random_flight("R1", start(), &params, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_random_flight("R1", start(), &params, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert!(a.waypoints().iter().all(|wp| wp.z == 0.0));
    }

    #[test]
    fn random_flight_rejects_inverted_range() {
        let params = RandomFlightParams {
            x_range: (10.0, 0.0),
            ..RandomFlightParams::default()
        };
        let err = generate_random_flight("R1", start(), &params, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(err.to_string().contains("x_range"));
    }

    #[test]
    fn scenario_names_flights_in_order() {
        let flights = generate_flight_scenario(3, start(), &mut StdRng::seed_from_u64(3)).unwrap();
        let ids: Vec<_> = flights.iter().map(|f| f.flight_id()).collect();
        assert_eq!(ids, ["Flight_1", "Flight_2", "Flight_3"]);
    }
}
