//! Pipeline channels
//!
//! A [`PipelineChannel`] is how a run talks to the pipeline that invoked it:
//! progress lines, collapsible log groups, named outputs and the failure
//! signal. [`WorkflowCommandChannel`] speaks the GitHub Actions dialect.

mod workflow;

pub use workflow::WorkflowCommandChannel;

/// Log, output and failure channels of the surrounding pipeline
pub trait PipelineChannel: Send + Sync {
    /// Writes a progress line to the pipeline log
    fn info(&self, message: &str);

    /// Writes a line shown only when the pipeline runs with debug logging
    fn debug(&self, message: &str);

    /// Writes a warning annotation to the pipeline log
    fn warning(&self, message: &str);

    /// Opens a collapsible log group
    fn start_group(&self, name: &str);

    /// Closes the current log group
    fn end_group(&self);

    /// Publishes a named output for later pipeline steps
    fn set_output(&self, name: &str, value: &str) -> std::io::Result<()>;

    /// Marks the run as failed with a one-line message
    fn set_failed(&self, message: &str);
}
