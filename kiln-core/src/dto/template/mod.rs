use serde::{Deserialize, Serialize};

use crate::domain::log::BuildLogEntry;
use crate::domain::template::{TemplateSpec, TemplateStep};

/// Registers a template alias and reserves a build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplate {
    pub alias: String,
    #[serde(rename = "cpuCount", skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u32>,
    #[serde(rename = "memoryMB", skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCreated {
    #[serde(rename = "templateID")]
    pub template_id: String,
    #[serde(rename = "buildID")]
    pub build_id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    #[serde(rename = "type")]
    pub kind: String,
    pub args: Vec<String>,
    pub force: bool,
}

/// Starts a reserved build from a template descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTemplateBuild {
    pub from_image: String,
    pub force: bool,
    pub steps: Vec<BuildStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_cmd: Option<String>,
}

impl From<&TemplateSpec> for StartTemplateBuild {
    fn from(spec: &TemplateSpec) -> Self {
        let force = spec.skips_cache();

        let steps = spec
            .steps()
            .iter()
            .map(|step| match step {
                TemplateStep::Workdir(path) => BuildStep {
                    kind: "WORKDIR".to_string(),
                    args: vec![path.clone()],
                    force,
                },
                TemplateStep::Env(envs) => BuildStep {
                    kind: "ENV".to_string(),
                    args: envs
                        .iter()
                        .flat_map(|(key, value)| [key.clone(), value.clone()])
                        .collect(),
                    force,
                },
            })
            .collect();

        Self {
            from_image: spec.image().to_string(),
            force,
            steps,
            start_cmd: spec.start().map(|start| start.command.clone()),
            ready_cmd: spec.start().map(|start| start.ready.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Waiting,
    Building,
    Ready,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildFailureReason {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

/// Build progress, carrying log entries from `logsOffset` onwards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBuildStatus {
    pub status: BuildStatus,
    #[serde(default)]
    pub log_entries: Vec<BuildLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BuildFailureReason>,
}
