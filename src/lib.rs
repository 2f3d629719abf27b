//! Pagesmith: task-to-static-site provisioning service.
//!
//! A caller submits a task brief with a shared secret. Pagesmith generates a
//! small static site, publishes it to a new repository with static hosting
//! enabled, and reports the repository, commit, and site URLs back to the
//! caller's evaluation endpoint.
//!
//! # Architecture
//!
//! Pagesmith follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (GitHub, HTTP callbacks, in-memory)
//!
//! # Modules
//!
//! - [`provisioning`]: Task authorization, repository workflow, and result delivery
//! - [`generator`]: Template-driven site generation
//! - [`config`]: Environment configuration
//! - [`server`]: HTTP surface and composition root

pub mod config;
pub mod generator;
pub mod provisioning;
pub mod server;
