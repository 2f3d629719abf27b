//! Unit tests for task provisioning.

mod support;
