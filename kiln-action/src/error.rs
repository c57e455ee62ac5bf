//! Error types for a pipeline run
//!
//! Every way a run can fail ends up as an [`ActionError`], whose display text
//! is the one-line message reported to the pipeline.

use kiln_client::ClientError;
use kiln_core::domain::alias::AliasError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("sandboxProviderApiKey is required")]
    MissingApiKey,

    #[error("Name is required")]
    MissingName,

    #[error("Docker tags are required")]
    MissingDockerTags,

    /// A docker tag could not be turned into an alias
    #[error(transparent)]
    Alias(#[from] AliasError),

    #[error("No docker tags left to build")]
    EmptyPlan,

    /// The provider rejected or failed a build
    #[error(transparent)]
    Build(#[from] ClientError),

    #[error("Failed to serialize docker tags: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to set output '{name}': {source}")]
    Output {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A panic caught at the run boundary
    #[error("{0}")]
    Panicked(String),
}
