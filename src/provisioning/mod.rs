//! Task provisioning for Pagesmith.
//!
//! A task request is authorized, turned into a generated static site, pushed
//! to a freshly created repository, published through static hosting, and
//! reported back to the caller's evaluation endpoint. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
