//! Run reporting
//!
//! Final pipeline-visible output of a run: the built aliases on success, the
//! failure message otherwise.

use tracing::debug;

use crate::channel::PipelineChannel;
use crate::error::ActionError;

/// Name of the output carrying the comma-joined aliases
pub const ALIASES_OUTPUT: &str = "aliases";

/// Lists built aliases in a log group
pub fn report_built_aliases(channel: &dyn PipelineChannel, aliases: &[String]) {
    channel.start_group("Built sandbox aliases");
    for alias in aliases {
        channel.info(alias);
    }
    channel.end_group();
}

/// Publishes the aliases output for later pipeline steps
pub fn publish_aliases(channel: &dyn PipelineChannel, aliases: &[String]) -> Result<(), ActionError> {
    channel
        .set_output(ALIASES_OUTPUT, &aliases.join(","))
        .map_err(|source| ActionError::Output {
            name: ALIASES_OUTPUT.to_string(),
            source,
        })
}

/// Marks the run failed
///
/// # Returns
/// The message reported to the pipeline
pub fn report_failure(channel: &dyn PipelineChannel, error: &ActionError) -> String {
    let message = error.to_string();
    debug!("Run failed: {:?}", error);
    channel.set_failed(&message);
    message
}
