//! Test doubles for the pipeline channel and the template builder

use async_trait::async_trait;
use kiln_client::{BuildLogSink, ClientError, TemplateBuilder};
use kiln_core::domain::log::{BuildLogEntry, LogLevel};
use kiln_core::domain::template::{BuildInfo, BuildRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::channel::PipelineChannel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Info(String),
    Debug(String),
    Warning(String),
    GroupStart(String),
    GroupEnd,
    Output(String, String),
    Failed(String),
}

/// Channel recording everything written to it
#[derive(Default)]
pub struct MemoryChannel {
    events: Mutex<Vec<ChannelEvent>>,
}

impl MemoryChannel {
    pub fn events(&self) -> Vec<ChannelEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChannelEvent::Info(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChannelEvent::Failed(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn output(&self, name: &str) -> Option<String> {
        self.events().into_iter().find_map(|event| match event {
            ChannelEvent::Output(key, value) if key == name => Some(value),
            _ => None,
        })
    }

    fn push(&self, event: ChannelEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl PipelineChannel for MemoryChannel {
    fn info(&self, message: &str) {
        self.push(ChannelEvent::Info(message.to_string()));
    }

    fn debug(&self, message: &str) {
        self.push(ChannelEvent::Debug(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(ChannelEvent::Warning(message.to_string()));
    }

    fn start_group(&self, name: &str) {
        self.push(ChannelEvent::GroupStart(name.to_string()));
    }

    fn end_group(&self) {
        self.push(ChannelEvent::GroupEnd);
    }

    fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        self.push(ChannelEvent::Output(name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.push(ChannelEvent::Failed(message.to_string()));
    }
}

/// Builder recording requests and `start:`/`end:` events per alias
#[derive(Default)]
pub struct MockBuilder {
    requests: Mutex<Vec<BuildRequest>>,
    events: Mutex<Vec<String>>,
    delays: HashMap<String, Duration>,
    fail_alias: Option<(String, String)>,
    panic_alias: Option<String>,
}

impl MockBuilder {
    pub fn with_delay(mut self, alias: &str, delay: Duration) -> Self {
        self.delays.insert(alias.to_string(), delay);
        self
    }

    pub fn failing(mut self, alias: &str, message: &str) -> Self {
        self.fail_alias = Some((alias.to_string(), message.to_string()));
        self
    }

    pub fn panicking(mut self, alias: &str) -> Self {
        self.panic_alias = Some(alias.to_string());
        self
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl TemplateBuilder for MockBuilder {
    async fn build(
        &self,
        request: &BuildRequest,
        logs: &dyn BuildLogSink,
    ) -> kiln_client::Result<BuildInfo> {
        self.requests.lock().unwrap().push(request.clone());
        self.events.lock().unwrap().push(format!("start:{}", request.alias));

        logs.on_log(&BuildLogEntry {
            timestamp: chrono::Utc::now(),
            level: LogLevel::Info,
            message: format!("building {}", request.docker_tag()),
        });

        match self.delays.get(&request.alias) {
            Some(delay) => tokio::time::sleep(*delay).await,
            None => tokio::task::yield_now().await,
        }

        self.events.lock().unwrap().push(format!("end:{}", request.alias));

        if self.panic_alias.as_deref() == Some(request.alias.as_str()) {
            panic!("builder crashed on {}", request.alias);
        }

        if let Some((alias, message)) = &self.fail_alias {
            if *alias == request.alias {
                return Err(ClientError::BuildFailed(message.clone()));
            }
        }

        Ok(BuildInfo {
            alias: request.alias.clone(),
            template_id: format!("tpl-{}", request.alias),
            build_id: format!("bld-{}", request.alias),
        })
    }
}
