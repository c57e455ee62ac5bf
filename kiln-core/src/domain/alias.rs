//! Alias derivation
//!
//! A sandbox template is addressed by an alias derived from the docker tag it
//! is built from. `ghcr.io/org/template-foo:pr-16` becomes `template-foo-pr-16`.

use thiserror::Error;

/// Errors raised while turning docker tags into aliases
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasError {
    /// The tag has no `/` path separator
    #[error("Invalid docker tag: {0}")]
    InvalidDockerTag(String),
}

/// Derives the template alias for a docker tag
///
/// Takes everything after the last `/` and replaces every `:` with `-`.
pub fn alias_from_docker_tag(docker_tag: &str) -> Result<String, AliasError> {
    let last_slash = docker_tag
        .rfind('/')
        .ok_or_else(|| AliasError::InvalidDockerTag(docker_tag.to_string()))?;

    Ok(docker_tag[last_slash + 1..].replace(':', "-"))
}

/// A docker tag paired with the alias it will be built under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTarget {
    pub docker_tag: String,
    pub alias: String,
}

/// Maps docker tags to aliases, keeping only the first tag seen for each alias
///
/// Input order is preserved. A later tag whose alias matches any alias already
/// recorded is dropped. The first malformed tag aborts the whole derivation.
pub fn dedup_by_alias<S: AsRef<str>>(docker_tags: &[S]) -> Result<Vec<TemplateTarget>, AliasError> {
    let mut targets: Vec<TemplateTarget> = Vec::with_capacity(docker_tags.len());

    for docker_tag in docker_tags {
        let docker_tag = docker_tag.as_ref();
        let alias = alias_from_docker_tag(docker_tag)?;

        if !targets.iter().any(|target| target.alias == alias) {
            targets.push(TemplateTarget {
                docker_tag: docker_tag.to_string(),
                alias,
            });
        }
    }

    Ok(targets)
}

/// Ordered, non-empty set of templates to build in one run
///
/// `first` is built on its own before anything in `rest` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub first: TemplateTarget,
    pub rest: Vec<TemplateTarget>,
}

impl BuildPlan {
    /// Creates a plan from deduplicated targets, or `None` if there are none
    pub fn new(targets: Vec<TemplateTarget>) -> Option<Self> {
        let mut targets = targets.into_iter();
        let first = targets.next()?;

        Some(Self {
            first,
            rest: targets.collect(),
        })
    }

    /// Derives and deduplicates aliases for `docker_tags`
    ///
    /// Returns `Ok(None)` when the tag list is empty.
    pub fn from_docker_tags<S: AsRef<str>>(docker_tags: &[S]) -> Result<Option<Self>, AliasError> {
        Ok(Self::new(dedup_by_alias(docker_tags)?))
    }

    /// Iterates over all targets in build order
    pub fn targets(&self) -> impl Iterator<Item = &TemplateTarget> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}
