//! Conflict detection between a primary flight and scheduled traffic.
//!
//! Two independent detectors are provided:
//! - [`detect_sampled`] steps through time and compares interpolated positions.
//! - [`detect_analytic`] solves for the closest point of approach per segment pair.

pub mod analytic;
pub mod sampled;

pub use analytic::{closest_approach_linear, detect_analytic, ClosestApproach, DEDUP_EPSILON};
pub use sampled::detect_sampled;
