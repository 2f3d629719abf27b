//! Error types for provisioning domain values.

use super::{ProjectIdentifier, ProvisioningState};
use thiserror::Error;

/// Errors returned while decoding an attachment payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentError {
    /// The value does not use the `data:` scheme.
    #[error("attachment is not an inline data URI")]
    NotDataUri,

    /// The data URI has no `,` between header and payload.
    #[error("data URI is missing the payload separator")]
    MissingPayloadSeparator,

    /// The base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Errors returned by the provisioning state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisioningStateError {
    /// Moving between two states is out of order.
    #[error("invalid provisioning transition for {project}: {from} -> {to}")]
    InvalidTransition {
        /// Project being provisioned.
        project: ProjectIdentifier,
        /// Current state.
        from: ProvisioningState,
        /// Requested state.
        to: ProvisioningState,
    },
}
