//! Build orchestration
//!
//! Builds every template in a [`BuildPlan`]: the first one alone, so the
//! provider has its layers cached, then all the others at once.
//!
//! "At once" means concurrent requests on the current task, not parallel
//! threads. Results keep plan order whatever order builds finish in. The first
//! failure aborts the run; builds already finished or still running on the
//! provider side are left alone.

use colored::Colorize;
use futures::future::try_join_all;
use kiln_client::{BuildLogSink, TemplateBuilder};
use kiln_core::domain::alias::{BuildPlan, TemplateTarget};
use kiln_core::domain::log::{BuildLogEntry, LogLevel};
use kiln_core::domain::template::{BuildInfo, BuildRequest};
use tracing::debug;

use crate::channel::PipelineChannel;
use crate::error::ActionError;
use crate::template::sandbox_template;

/// CPU and memory requested for every template in a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resources {
    pub cpu_count: Option<u32>,
    pub memory_mb: Option<u32>,
}

/// Drives a [`TemplateBuilder`] through a build plan
pub struct BuildOrchestrator<'a, B: TemplateBuilder + ?Sized> {
    builder: &'a B,
    channel: &'a dyn PipelineChannel,
}

impl<'a, B: TemplateBuilder + ?Sized> BuildOrchestrator<'a, B> {
    pub fn new(builder: &'a B, channel: &'a dyn PipelineChannel) -> Self {
        Self { builder, channel }
    }

    /// Builds every template in the plan
    ///
    /// # Returns
    /// Built aliases, in plan order
    pub async fn build_all(
        &self,
        plan: &BuildPlan,
        resources: Resources,
    ) -> Result<Vec<String>, ActionError> {
        let first = self.build_one(&plan.first, resources).await?;

        debug!("Building {} remaining template(s) concurrently", plan.rest.len());
        let rest = try_join_all(
            plan.rest
                .iter()
                .map(|target| self.build_one(target, resources)),
        )
        .await?;

        Ok(std::iter::once(first)
            .chain(rest)
            .map(|info| info.alias)
            .collect())
    }

    async fn build_one(
        &self,
        target: &TemplateTarget,
        resources: Resources,
    ) -> Result<BuildInfo, ActionError> {
        self.channel.info(&format!("Building alias: {}", target.alias));

        let request = BuildRequest {
            alias: target.alias.clone(),
            cpu_count: resources.cpu_count,
            memory_mb: resources.memory_mb,
            template: sandbox_template(&target.docker_tag),
        };
        let logger = ChannelBuildLogger::new(&target.alias, self.channel);

        let info = self.builder.build(&request, &logger).await?;

        self.channel.info(&format!("Built alias: {}", info.alias));
        Ok(info)
    }
}

/// Forwards provider build logs to the pipeline log
///
/// Lines read `[HH:MM:SS] LEVEL [alias] message`; debug lines are dropped.
pub struct ChannelBuildLogger<'a> {
    alias: &'a str,
    channel: &'a dyn PipelineChannel,
    min_level: LogLevel,
}

impl<'a> ChannelBuildLogger<'a> {
    pub fn new(alias: &'a str, channel: &'a dyn PipelineChannel) -> Self {
        Self {
            alias,
            channel,
            min_level: LogLevel::Info,
        }
    }
}

impl BuildLogSink for ChannelBuildLogger<'_> {
    fn on_log(&self, entry: &BuildLogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let level = format!("{:<5}", entry.level.as_str());
        let level = match entry.level {
            LogLevel::Debug => level.dimmed(),
            LogLevel::Info => level.normal(),
            LogLevel::Warn => level.yellow(),
            LogLevel::Error => level.red(),
        };

        self.channel.info(&format!(
            "[{}] {} [{}] {}",
            entry.timestamp.format("%H:%M:%S"),
            level,
            self.alias,
            entry.message
        ));
    }
}
