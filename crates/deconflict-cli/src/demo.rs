//! Built-in demonstration scenarios.
//!
//! The first flight of each scenario is the primary; the rest are scheduled traffic.

use chrono::{DateTime, Utc};
use deconflict_core::{
    generate_handcoded_flight, generate_random_flight, Dimension, Flight, RandomFlightParams,
    Result,
};
use rand::Rng;

const DEMO_DURATION_S: f64 = 10.0;

/// A named set of flights.
pub struct DemoScenario {
    pub title: String,
    pub dimension: Dimension,
    pub flights: Vec<Flight>,
}

impl DemoScenario {
    pub fn primary(&self) -> Option<&Flight> {
        self.flights.first()
    }

    pub fn others(&self) -> &[Flight] {
        self.flights.get(1..).unwrap_or_default()
    }
}

type Route = &'static [(f64, f64, f64)];

fn handcoded_scenario(
    title: &str,
    dimension: Dimension,
    routes: &[Route],
    start: DateTime<Utc>,
) -> Result<DemoScenario> {
    let flights = routes
        .iter()
        .enumerate()
        .map(|(i, route)| {
            generate_handcoded_flight(&format!("F{}", i + 1), route, start, DEMO_DURATION_S, dimension)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DemoScenario {
        title: title.to_string(),
        dimension,
        flights,
    })
}

fn random_scenario<R: Rng>(
    title: &str,
    dimension: Dimension,
    start: DateTime<Utc>,
    rng: &mut R,
) -> Result<DemoScenario> {
    let params = RandomFlightParams::default().with_dimension(dimension);
    let flights = (1..=3)
        .map(|i| generate_random_flight(&format!("F{i}"), start, &params, rng))
        .collect::<Result<Vec<_>>>()?;

    Ok(DemoScenario {
        title: title.to_string(),
        dimension,
        flights,
    })
}

/// Three parallel lanes 10 m apart.
const SAFE_2D: [Route; 3] = [
    &[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)],
    &[(0.0, 10.0, 0.0), (10.0, 10.0, 0.0)],
    &[(0.0, 20.0, 0.0), (10.0, 20.0, 0.0)],
];

/// X crossing plus a third flight cutting through the center.
const CONFLICT_2D: [Route; 3] = [
    &[(0.0, 0.0, 0.0), (10.0, 10.0, 0.0)],
    &[(10.0, 0.0, 0.0), (0.0, 10.0, 0.0)],
    &[(5.0, 0.0, 0.0), (5.0, 10.0, 0.0)],
];

const SAFE_3D: [Route; 3] = [
    &[(0.0, 0.0, 0.0), (10.0, 0.0, 5.0)],
    &[(0.0, 10.0, 10.0), (10.0, 10.0, 15.0)],
    &[(0.0, 20.0, 20.0), (10.0, 20.0, 25.0)],
];

const CONFLICT_3D: [Route; 3] = [
    &[(0.0, 0.0, 0.0), (10.0, 10.0, 5.0)],
    &[(10.0, 0.0, 0.0), (0.0, 10.0, 5.0)],
    &[(5.0, 0.0, 2.0), (5.0, 10.0, 2.0)],
];

/// The six standard scenarios: safe, conflicting and random, in 2D then 3D.
pub fn builtin_scenarios<R: Rng>(start: DateTime<Utc>, rng: &mut R) -> Result<Vec<DemoScenario>> {
    Ok(vec![
        handcoded_scenario("2D Safe Scenario (Handcoded)", Dimension::TwoD, &SAFE_2D, start)?,
        handcoded_scenario("2D Conflict Scenario", Dimension::TwoD, &CONFLICT_2D, start)?,
        random_scenario("2D Random Scenario", Dimension::TwoD, start, rng)?,
        handcoded_scenario("3D Safe Scenario (Handcoded)", Dimension::ThreeD, &SAFE_3D, start)?,
        handcoded_scenario("3D Conflict Scenario", Dimension::ThreeD, &CONFLICT_3D, start)?,
        random_scenario("3D Random Scenario", Dimension::ThreeD, start, rng)?,
    ])
}
