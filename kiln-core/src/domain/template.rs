//! Template domain types
//!
//! A [`TemplateSpec`] describes how the provider turns a container image into a
//! sandbox template. It is assembled fluently, the same way the provider SDKs
//! do it:
//!
//! ```
//! use kiln_core::domain::template::{ReadyCommand, TemplateSpec};
//!
//! let spec = TemplateSpec::from_image("ghcr.io/org/app:main")
//!     .skip_cache()
//!     .set_workdir("/home/user/app")
//!     .set_envs([("PROJECT_ROOT", "/home/user/app")])
//!     .set_start_cmd("npm start", ReadyCommand::wait_for_file("/tmp/ready"));
//!
//! assert_eq!(spec.image(), "ghcr.io/org/app:main");
//! ```

use std::collections::BTreeMap;

/// A single instruction applied on top of the source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateStep {
    Workdir(String),
    Env(BTreeMap<String, String>),
}

/// Shell command the provider runs until it succeeds to mark a sandbox ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyCommand(String);

impl ReadyCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self(command.into())
    }

    /// Ready once `path` exists inside the sandbox
    pub fn wait_for_file(path: &str) -> Self {
        Self(format!("[ -f {} ]", path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command started when a sandbox boots, with its readiness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommand {
    pub command: String,
    pub ready: ReadyCommand,
}

/// Template descriptor handed to the build provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    from_image: String,
    skip_cache: bool,
    steps: Vec<TemplateStep>,
    start: Option<StartCommand>,
}

impl TemplateSpec {
    /// Starts a template from a container image reference
    pub fn from_image(image: impl Into<String>) -> Self {
        Self {
            from_image: image.into(),
            skip_cache: false,
            steps: Vec::new(),
            start: None,
        }
    }

    /// Forces the provider to rebuild every layer
    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    pub fn set_workdir(mut self, path: impl Into<String>) -> Self {
        self.steps.push(TemplateStep::Workdir(path.into()));
        self
    }

    pub fn set_envs<K, V>(mut self, envs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let envs = envs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.steps.push(TemplateStep::Env(envs));
        self
    }

    pub fn set_start_cmd(mut self, command: impl Into<String>, ready: ReadyCommand) -> Self {
        self.start = Some(StartCommand {
            command: command.into(),
            ready,
        });
        self
    }

    pub fn image(&self) -> &str {
        &self.from_image
    }

    pub fn skips_cache(&self) -> bool {
        self.skip_cache
    }

    /// Steps in the order they were added
    pub fn steps(&self) -> &[TemplateStep] {
        &self.steps
    }

    pub fn start(&self) -> Option<&StartCommand> {
        self.start.as_ref()
    }
}

/// One template build: what to build, under which alias, with which resources
///
/// A resource left as `None` is not sent; the provider applies its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub alias: String,
    pub cpu_count: Option<u32>,
    pub memory_mb: Option<u32>,
    pub template: TemplateSpec,
}

impl BuildRequest {
    pub fn docker_tag(&self) -> &str {
        self.template.image()
    }
}

/// Outcome of a finished template build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub alias: String,
    pub template_id: String,
    pub build_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_for_file() {
        let ready = ReadyCommand::wait_for_file("/home/user/app/package.json");
        assert_eq!(ready.as_str(), "[ -f /home/user/app/package.json ]");
    }

    #[test]
    fn test_steps_keep_call_order() {
        let spec = TemplateSpec::from_image("r/img:1")
            .set_workdir("/app")
            .set_envs([("A", "1")])
            .set_workdir("/srv");

        assert_eq!(spec.steps().len(), 3);
        assert_eq!(spec.steps()[0], TemplateStep::Workdir("/app".to_string()));
        assert!(matches!(spec.steps()[1], TemplateStep::Env(_)));
        assert_eq!(spec.steps()[2], TemplateStep::Workdir("/srv".to_string()));
        assert!(!spec.skips_cache());
    }

    #[test]
    fn test_request_docker_tag_is_source_image() {
        let request = BuildRequest {
            alias: "img-1".to_string(),
            cpu_count: Some(2),
            memory_mb: None,
            template: TemplateSpec::from_image("r/img:1").skip_cache(),
        };

        assert_eq!(request.docker_tag(), "r/img:1");
        assert!(request.template.skips_cache());
    }
}
