//! Kiln
//!
//! Pipeline step that turns container images into sandbox templates.
//!
//! Architecture:
//! - Inputs: Read and validate pipeline inputs
//! - Alias derivation: One alias per distinct image, first tag wins (kiln-core)
//! - Orchestrator: Build the first template, then the rest concurrently
//! - Channel/report: Grouped progress logs, `aliases` output, failure signal
//!
//! The provider API is reached through kiln-client.

mod action;
mod channel;
mod config;
mod error;
mod inputs;
mod orchestrator;
mod report;
mod template;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use kiln_client::{ClientConfig, DEFAULT_API_URL, TemplateClient};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::channel::{PipelineChannel, WorkflowCommandChannel};
use crate::config::Settings;
use crate::error::ActionError;
use crate::inputs::EnvInputProvider;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Build sandbox templates from docker images", long_about = None)]
struct Cli {
    /// Sandbox provider API URL
    #[arg(long, env = "KILN_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Interval between build status polls, in milliseconds
    #[arg(long, env = "KILN_POLL_INTERVAL_MS", default_value_t = 1000)]
    poll_interval_ms: u64,

    /// Checked-out repository (defaults to the current directory)
    #[arg(long, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    if force_colors(std::env::var("GITHUB_ACTIONS").ok().as_deref()) {
        colored::control::set_override(true);
    }

    let cli = Cli::parse();
    let channel = WorkflowCommandChannel::from_env();

    let settings = match load_settings(cli) {
        Ok(settings) => settings,
        Err(err) => return Ok(report_startup_failure(&channel, &err)),
    };

    info!(
        "Loaded settings: api_url={}, poll_interval={:?}",
        settings.api_url, settings.poll_interval
    );

    let outcome = action::run(&EnvInputProvider, &channel, &settings, |credentials| {
        let config = ClientConfig::new(settings.api_url.clone(), credentials)
            .with_poll_interval(settings.poll_interval);
        TemplateClient::new(config).map_err(ActionError::from)
    })
    .await;

    Ok(outcome.exit_code())
}

fn load_settings(cli: Cli) -> Result<Settings> {
    let workspace = match cli.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };
    let settings = Settings::new(
        cli.api_url,
        Duration::from_millis(cli.poll_interval_ms),
        workspace,
    );
    settings.validate()?;

    Ok(settings)
}

/// Fails the step before any input is read
fn report_startup_failure(channel: &dyn PipelineChannel, err: &anyhow::Error) -> ExitCode {
    tracing::error!("Startup failed: {:#}", err);
    channel.set_failed(&format!("{:#}", err));
    ExitCode::FAILURE
}

/// The runner log is not a TTY but renders ANSI colours
fn force_colors(github_actions: Option<&str>) -> bool {
    github_actions == Some("true")
}

/// Logs go to stderr; stdout carries workflow commands
///
/// `RUST_LOG` wins. Otherwise the platform's `RUNNER_DEBUG=1` switch turns on
/// debug logs.
fn init_tracing() {
    let default_filter = if std::env::var("RUNNER_DEBUG").is_ok_and(|value| value == "1") {
        "kiln=debug,kiln_client=debug"
    } else {
        "kiln=warn,kiln_client=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryChannel;

    fn cli(api_url: &str, poll_interval_ms: u64) -> Cli {
        Cli {
            api_url: api_url.to_string(),
            poll_interval_ms,
            workspace: Some(PathBuf::from("/github/workspace")),
        }
    }

    #[test]
    fn test_load_settings() {
        let settings = load_settings(cli("http://localhost:3000", 250)).unwrap();

        assert_eq!(settings.api_url, "http://localhost:3000");
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.workspace, PathBuf::from("/github/workspace"));
    }

    #[test]
    fn test_invalid_settings_fail_the_step() {
        let channel = MemoryChannel::default();

        let err = load_settings(cli("api.e2b.app", 1000)).unwrap_err();
        let code = report_startup_failure(&channel, &err);

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(
            channel.failures(),
            vec!["api_url must start with http:// or https://"]
        );
    }

    #[test]
    fn test_force_colors_on_runner() {
        assert!(force_colors(Some("true")));
        assert!(!force_colors(Some("false")));
        assert!(!force_colors(None));
    }
}
