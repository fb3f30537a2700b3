//! Deconfliction CLI - scenario runner for drone mission checks.
//!
//! This crate backs the `deconflict` binary:
//! - check: verdict for a JSON scenario file
//! - demo: the built-in 2D/3D scenarios
//! - trajectory: sampled path export for plotting

pub mod config;
pub mod demo;
pub mod report;
pub mod scenario;

pub use config::{Config, LogFormat};
pub use demo::{builtin_scenarios, DemoScenario};
pub use scenario::Scenario;
