pub mod conflict;
pub mod error;
pub mod mission;
pub mod models;
pub mod rules;
pub mod sim;
pub mod spatial;
pub mod trajectory;

pub use conflict::{closest_approach_linear, detect_analytic, detect_sampled, ClosestApproach};
pub use error::{DeconflictError, Result};
pub use mission::{
    check_mission, check_mission_with_rules, DetectionMode, MissionReport, MissionStatus,
};
pub use models::{Conflict, Flight, MissionWindow, Segment, Waypoint};
pub use rules::DeconflictionRules;
pub use sim::{
    generate_flight_scenario, generate_handcoded_flight, generate_random_flight, Dimension,
    RandomFlightParams,
};
pub use spatial::{euclidean_distance, Position};
pub use trajectory::{
    position_at, position_at_elapsed, trajectory, Trajectory, TrajectorySample, MAX_SAMPLES,
};
