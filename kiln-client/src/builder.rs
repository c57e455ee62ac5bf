//! Template building
//!
//! [`TemplateBuilder`] turns a [`BuildRequest`] into a ready sandbox template.
//! The HTTP implementation registers the alias, starts the build and then polls
//! until the provider reports it ready or failed, streaming build logs to a
//! [`BuildLogSink`] along the way.

use async_trait::async_trait;
use kiln_core::domain::log::BuildLogEntry;
use kiln_core::domain::template::{BuildInfo, BuildRequest};
use kiln_core::dto::template::{BuildStatus, CreateTemplate, StartTemplateBuild};
use tracing::{debug, info};

use crate::TemplateClient;
use crate::error::{ClientError, Result};

/// Receives provider log lines while a build runs
pub trait BuildLogSink: Send + Sync {
    fn on_log(&self, entry: &BuildLogEntry);
}

/// Builds sandbox templates
#[async_trait]
pub trait TemplateBuilder: Send + Sync {
    /// Builds one template and waits for it to finish
    ///
    /// # Arguments
    /// * `request` - Alias, resources and template descriptor
    /// * `logs` - Sink for build log lines
    ///
    /// # Returns
    /// The finished build, or the provider's failure
    async fn build(&self, request: &BuildRequest, logs: &dyn BuildLogSink) -> Result<BuildInfo>;
}

#[async_trait]
impl<T: TemplateBuilder + ?Sized> TemplateBuilder for std::sync::Arc<T> {
    async fn build(&self, request: &BuildRequest, logs: &dyn BuildLogSink) -> Result<BuildInfo> {
        (**self).build(request, logs).await
    }
}

#[async_trait]
impl TemplateBuilder for TemplateClient {
    async fn build(&self, request: &BuildRequest, logs: &dyn BuildLogSink) -> Result<BuildInfo> {
        let created = self
            .create_template(&CreateTemplate {
                alias: request.alias.clone(),
                cpu_count: request.cpu_count,
                memory_mb: request.memory_mb,
            })
            .await?;

        info!(
            "Template {} created for alias '{}' (build {})",
            created.template_id, request.alias, created.build_id
        );

        self.start_build(
            &created.template_id,
            &created.build_id,
            &StartTemplateBuild::from(&request.template),
        )
        .await?;

        debug!("Build {} started from {}", created.build_id, request.docker_tag());

        let mut logs_offset = 0;

        loop {
            let status = self
                .build_status(&created.template_id, &created.build_id, logs_offset)
                .await?;

            logs_offset += status.log_entries.len();
            for entry in &status.log_entries {
                logs.on_log(entry);
            }

            match status.status {
                BuildStatus::Ready => {
                    info!("Build {} for alias '{}' is ready", created.build_id, request.alias);
                    return Ok(BuildInfo {
                        alias: request.alias.clone(),
                        template_id: created.template_id,
                        build_id: created.build_id,
                    });
                }
                BuildStatus::Error => {
                    let message = status
                        .reason
                        .map(|reason| reason.message)
                        .unwrap_or_else(|| "Unknown build error".to_string());
                    return Err(ClientError::BuildFailed(message));
                }
                BuildStatus::Waiting | BuildStatus::Building => {
                    debug!(
                        "Build {} is {:?}, polling again in {:?}",
                        created.build_id, status.status, self.poll_interval
                    );
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}
