//! Runtime settings
//!
//! Settings that are not pipeline inputs: where the provider lives, how often
//! to poll builds, and the checked-out workspace.

use std::path::PathBuf;
use std::time::Duration;

/// Settings for one run of the step
#[derive(Debug, Clone)]
pub struct Settings {
    /// Provider API base URL (e.g., "https://api.e2b.app")
    pub api_url: String,

    /// How often to poll running builds
    pub poll_interval: Duration,

    /// Checked-out repository the pipeline runs in
    pub workspace: PathBuf,
}

impl Settings {
    pub fn new(api_url: String, poll_interval: Duration, workspace: PathBuf) -> Self {
        Self {
            api_url,
            poll_interval,
            workspace,
        }
    }

    /// Validates the settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}
