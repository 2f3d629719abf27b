//! Domain model for task provisioning.
//!
//! The provisioning domain models the inbound task, the derived project
//! identifier, the generated file set, and the forward-only progress of a
//! repository through the provider workflow. Infrastructure concerns stay
//! outside of the domain boundary.

mod attachment;
mod error;
mod files;
mod ids;
mod refs;
mod request;
mod result;
mod state;

pub use attachment::{DecodedAttachment, parse_data_uri};
pub use error::{AttachmentError, ProvisioningStateError};
pub use files::{GeneratedFile, GeneratedFileSet};
pub use ids::{ProjectIdentifier, ProjectStamp};
pub use refs::{CommitRef, RepoRef};
pub use request::{Attachment, TaskRequest};
pub use result::{ProvisioningResult, PublishingTarget};
pub use state::{ProvisioningProgress, ProvisioningState};
