//! Pipeline inputs
//!
//! The pipeline hands inputs to the step as string values. This module reads
//! them through an [`InputProvider`] and validates them into the values a run
//! needs.

use kiln_client::ProviderCredentials;
use std::collections::HashMap;

use crate::error::ActionError;

pub const API_KEY_INPUT: &str = "sandboxProviderApiKey";
pub const NAME_INPUT: &str = "name";
pub const DOCKER_TAGS_INPUT: &str = "dockerTags";
pub const CPU_COUNT_INPUT: &str = "cpuCount";
pub const MEMORY_MB_INPUT: &str = "memoryMB";

/// Source of named pipeline inputs
pub trait InputProvider: Send + Sync {
    /// Get an input by name, `None` if it was not provided
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads inputs from `INPUT_<NAME>` environment variables
///
/// The variable name is the input name upper-cased with spaces replaced by
/// underscores. Values are trimmed.
pub struct EnvInputProvider;

/// Environment variable holding the input `name`
pub fn input_env_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

impl InputProvider for EnvInputProvider {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(input_env_var(name))
            .ok()
            .map(|value| value.trim().to_string())
    }
}

impl InputProvider for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Raw input values; missing inputs are empty strings
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub api_key: String,
    pub name: String,
    pub docker_tags: String,
    pub cpu_count: String,
    pub memory_mb: String,
}

/// Inputs that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedInputs {
    pub credentials: ProviderCredentials,
    /// Human-readable template name; validated but not sent to the provider
    pub name: String,
    pub docker_tags: Vec<String>,
    pub cpu_count: Option<u32>,
    pub memory_mb: Option<u32>,
}

impl ActionInputs {
    pub fn read(provider: &dyn InputProvider) -> Self {
        let get = |name: &str| provider.get(name).unwrap_or_default();

        Self {
            api_key: get(API_KEY_INPUT),
            name: get(NAME_INPUT),
            docker_tags: get(DOCKER_TAGS_INPUT),
            cpu_count: get(CPU_COUNT_INPUT),
            memory_mb: get(MEMORY_MB_INPUT),
        }
    }

    /// Docker tags, one per line, trimmed, blank lines dropped
    pub fn docker_tag_list(&self) -> Vec<String> {
        self.docker_tags
            .split('\n')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Resource inputs that were given but do not start with a number
    ///
    /// These are left out of the build request and the provider default applies.
    pub fn unparsed_resources(&self) -> Vec<&'static str> {
        [
            (CPU_COUNT_INPUT, &self.cpu_count),
            (MEMORY_MB_INPUT, &self.memory_mb),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty() && parse_leading_int(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Validates the inputs
    ///
    /// Checks run in a fixed order: API key, then name, then docker tags.
    pub fn validate(self) -> Result<ValidatedInputs, ActionError> {
        if self.api_key.is_empty() {
            return Err(ActionError::MissingApiKey);
        }

        if self.name.is_empty() {
            return Err(ActionError::MissingName);
        }

        let docker_tags = self.docker_tag_list();
        if docker_tags.is_empty() {
            return Err(ActionError::MissingDockerTags);
        }

        Ok(ValidatedInputs {
            credentials: ProviderCredentials::new(self.api_key),
            name: self.name,
            docker_tags,
            cpu_count: parse_leading_int(&self.cpu_count),
            memory_mb: parse_leading_int(&self.memory_mb),
        })
    }
}

/// Parses the integer at the start of `value`
///
/// Leading whitespace and trailing garbage are ignored (`"2048MB"` is 2048).
/// Returns `None` when no digits lead the value or it does not fit a `u32`.
pub fn parse_leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    value[..end].parse().ok()
}
