//! vmship Pipeline - image-to-deployment conversion and launch support.
//!
//! The conversion path turns a packaged VM image into a minimal
//! containerDisk artifact plus a declarative deployment recipe, correlated
//! by a deterministic identity derived from the image locator. The launch
//! path waits for a freshly scheduled deployment's display endpoint and
//! hands off to a local remote-display client.

pub mod artifact;
pub mod convert;
pub mod encode;
pub mod fetch;
pub mod identity;
pub mod interact;
pub mod package;
pub mod recipe;
pub mod tool;
pub mod waiter;
pub mod workdir;

// Re-export common types
pub use artifact::{ContainerArtifact, PublishOutcome};
pub use convert::convert;
pub use encode::DiskArtifact;
pub use identity::derive;
pub use interact::{OperatorPrompt, StdioPrompt};
pub use package::PackageMetadata;
pub use recipe::DeploymentRecipe;
pub use waiter::await_and_connect;
pub use workdir::WorkDir;

/// vmship pipeline version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
