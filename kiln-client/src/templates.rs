//! Template-related API endpoints

use crate::TemplateClient;
use crate::error::Result;
use kiln_core::dto::template::{
    CreateTemplate, StartTemplateBuild, TemplateBuildStatus, TemplateCreated,
};

impl TemplateClient {
    // =============================================================================
    // Template Registration
    // =============================================================================

    /// Register an alias and reserve a build for it
    ///
    /// # Returns
    /// The template and build identifiers to start and poll the build with
    pub async fn create_template(&self, req: &CreateTemplate) -> Result<TemplateCreated> {
        let url = format!("{}/v2/templates", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Build Lifecycle
    // =============================================================================

    /// Start a reserved build
    pub async fn start_build(
        &self,
        template_id: &str,
        build_id: &str,
        req: &StartTemplateBuild,
    ) -> Result<()> {
        let url = format!(
            "{}/v2/templates/{}/builds/{}",
            self.base_url, template_id, build_id
        );
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_empty_response(response).await
    }

    /// Get build status and the log entries after `logs_offset`
    pub async fn build_status(
        &self,
        template_id: &str,
        build_id: &str,
        logs_offset: usize,
    ) -> Result<TemplateBuildStatus> {
        let url = format!(
            "{}/templates/{}/builds/{}/status",
            self.base_url, template_id, build_id
        );
        let response = self
            .client
            .get(&url)
            .query(&[("logsOffset", logs_offset)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
