//! Pipeline run
//!
//! One invocation of the step: validate inputs, derive aliases, build every
//! template and report. Nothing is kept between runs.

use futures::FutureExt;
use kiln_client::{ProviderCredentials, TemplateBuilder};
use kiln_core::domain::alias::BuildPlan;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use tracing::info;

use crate::channel::PipelineChannel;
use crate::config::Settings;
use crate::error::ActionError;
use crate::inputs::{ActionInputs, InputProvider};
use crate::orchestrator::{BuildOrchestrator, Resources};
use crate::report::{publish_aliases, report_built_aliases, report_failure};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Built aliases, in plan order
    Succeeded(Vec<String>),
    /// Message reported to the pipeline
    Failed(String),
}

impl RunOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunOutcome::Succeeded(_) => ExitCode::SUCCESS,
            RunOutcome::Failed(_) => ExitCode::FAILURE,
        }
    }
}

/// Runs the step once
///
/// Any failure, a panic in the build path included, is reported through
/// `channel.set_failed` exactly once.
///
/// # Arguments
/// * `inputs` - Pipeline inputs
/// * `channel` - Pipeline log, output and failure channels
/// * `settings` - Runtime settings
/// * `connect` - Creates the template builder from the validated credentials
pub async fn run<B, F>(
    inputs: &dyn InputProvider,
    channel: &dyn PipelineChannel,
    settings: &Settings,
    connect: F,
) -> RunOutcome
where
    B: TemplateBuilder,
    F: FnOnce(ProviderCredentials) -> Result<B, ActionError>,
{
    let result = AssertUnwindSafe(execute(inputs, channel, settings, connect))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(ActionError::Panicked(panic_message(payload))));

    match result {
        Ok(aliases) => {
            info!("Built {} template(s)", aliases.len());
            RunOutcome::Succeeded(aliases)
        }
        Err(err) => RunOutcome::Failed(report_failure(channel, &err)),
    }
}

async fn execute<B, F>(
    inputs: &dyn InputProvider,
    channel: &dyn PipelineChannel,
    settings: &Settings,
    connect: F,
) -> Result<Vec<String>, ActionError>
where
    B: TemplateBuilder,
    F: FnOnce(ProviderCredentials) -> Result<B, ActionError>,
{
    let raw = ActionInputs::read(inputs);
    let unparsed = raw.unparsed_resources();
    let validated = raw.validate()?;
    let builder = connect(validated.credentials)?;

    channel.info(&format!(
        "Parsed {} docker tags: {}",
        validated.docker_tags.len(),
        serde_json::to_string(&validated.docker_tags)?
    ));

    channel.start_group("Docker tags");
    for docker_tag in &validated.docker_tags {
        channel.info(docker_tag);
    }
    channel.end_group();

    channel.debug(&format!("Template name: {}", validated.name));
    channel.info(&format!("Working directory: {}", settings.workspace.display()));

    for name in unparsed {
        channel.warning(&format!(
            "{} is not a number; the provider default will be used",
            name
        ));
    }

    let plan = BuildPlan::from_docker_tags(&validated.docker_tags)?.ok_or(ActionError::EmptyPlan)?;
    for target in plan.targets() {
        channel.debug(&format!("{} -> {}", target.docker_tag, target.alias));
    }
    let resources = Resources {
        cpu_count: validated.cpu_count,
        memory_mb: validated.memory_mb,
    };

    let aliases = BuildOrchestrator::new(&builder, channel)
        .build_all(&plan, resources)
        .await?;

    report_built_aliases(channel, &aliases);
    publish_aliases(channel, &aliases)?;

    Ok(aliases)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown error".to_string()
    }
}
