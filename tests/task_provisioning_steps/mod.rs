//! Step definitions for task provisioning BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
