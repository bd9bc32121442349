//! Entry-point extraction for the supported framework categories.
//!
//! This module provides a unified interface for turning one classified class declaration into
//! entry-point records. Each category has its own extractor that knows which class-level markers
//! it claims and how to read its framework's method-level markers.
//!
//! # Supported Categories
//!
//! - **REST controllers** (Spring MVC): See [`spring_mvc::SpringMvcExtractor`]
//! - **Path-based resources** (JAX-RS): See [`jaxrs::JaxRsExtractor`]
//! - **Application bootstrap**: See [`bootstrap::MainApplicationExtractor`]
//! - **Message consumers** (Kafka, JMS, RabbitMQ): See [`messaging::MessageConsumerExtractor`]
//! - **Batch jobs** (Spring Batch): See [`batch::BatchJobExtractor`]
//! - **Command-line entries**: See [`bootstrap::CommandLineExtractor`]
//! - **Scheduled tasks**: See [`scheduled::ScheduledTaskExtractor`]
//!
//! # Example
//!
//! ```no_run
//! use entrypoint_discovery::extractor::{ClassContext, EntryPointExtractor};
//! use entrypoint_discovery::extractor::spring_mvc::SpringMvcExtractor;
//! use entrypoint_discovery::parser::AstParser;
//! use std::path::Path;
//!
//! let unit = AstParser::parse_file(Path::new("OrderController.java")).unwrap();
//! let class = ClassContext::new(&unit, &unit.types[0]);
//! let endpoints = SpringMvcExtractor.extract(&class);
//! println!("Found {} endpoints", endpoints.len());
//! ```

pub mod batch;
pub mod bootstrap;
pub mod jaxrs;
pub mod messaging;
pub mod scheduled;
pub mod spring_mvc;

use crate::ast::{CompilationUnit, ElementValue, TypeDeclaration};
use crate::parameters::ParameterInfo;
use crate::security::SecurityInfo;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Trait implemented by every category extractor.
///
/// The classifier asks [`matches`](EntryPointExtractor::matches) in priority order and runs
/// [`extract`](EntryPointExtractor::extract) for the first extractor that claims a class.
pub trait EntryPointExtractor {
    /// Short label used in log output.
    fn name(&self) -> &'static str;

    /// Returns `true` if this extractor claims the class.
    fn matches(&self, class: &ClassContext) -> bool;

    /// Emits one entry point per qualifying member of the class.
    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint>;
}

/// A class declaration together with the unit it was declared in.
pub struct ClassContext<'a> {
    pub unit: &'a CompilationUnit,
    pub class: &'a TypeDeclaration,
    /// Fully qualified owning type name
    pub class_name: String,
}

impl<'a> ClassContext<'a> {
    pub fn new(unit: &'a CompilationUnit, class: &'a TypeDeclaration) -> Self {
        Self {
            unit,
            class,
            class_name: unit.qualified_name(&class.name),
        }
    }

    pub fn has_marker(&self, name: &str) -> bool {
        self.class.has_annotation(name)
    }

    /// Builds an entry point owned by this class. The kind follows from the details.
    pub fn entry_point(
        &self,
        method_name: impl Into<String>,
        line: usize,
        details: EntryPointDetails,
    ) -> EntryPoint {
        EntryPoint {
            kind: details.kind(),
            class_name: self.class_name.clone(),
            method_name: method_name.into(),
            file: self.unit.path.clone(),
            line,
            details,
        }
    }
}

/// Category of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryPointKind {
    Rest,
    MessageConsumer,
    ScheduledTask,
    BatchJob,
    Cli,
    MainApplication,
}

impl EntryPointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPointKind::Rest => "REST",
            EntryPointKind::MessageConsumer => "MESSAGE_CONSUMER",
            EntryPointKind::ScheduledTask => "SCHEDULED_TASK",
            EntryPointKind::BatchJob => "BATCH_JOB",
            EntryPointKind::Cli => "CLI",
            EntryPointKind::MainApplication => "MAIN_APPLICATION",
        }
    }
}

impl fmt::Display for EntryPointKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An externally triggerable member discovered in the analyzed code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryPoint {
    #[serde(rename = "type")]
    pub kind: EntryPointKind,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "method")]
    pub method_name: String,
    pub file: PathBuf,
    pub line: usize,
    pub details: EntryPointDetails,
}

/// Kind-specific detail of an entry point.
///
/// Each variant only carries the keys valid for its kind and serializes as a plain map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntryPointDetails {
    Rest(RestDetails),
    MessageConsumer(ConsumerDetails),
    ScheduledTask(ScheduledDetails),
    BatchJob(BatchDetails),
    Cli(CliDetails),
    MainApplication(MainApplicationDetails),
}

impl EntryPointDetails {
    pub fn kind(&self) -> EntryPointKind {
        match self {
            EntryPointDetails::Rest(_) => EntryPointKind::Rest,
            EntryPointDetails::MessageConsumer(_) => EntryPointKind::MessageConsumer,
            EntryPointDetails::ScheduledTask(_) => EntryPointKind::ScheduledTask,
            EntryPointDetails::BatchJob(_) => EntryPointKind::BatchJob,
            EntryPointDetails::Cli(_) => EntryPointKind::Cli,
            EntryPointDetails::MainApplication(_) => EntryPointKind::MainApplication,
        }
    }

    /// Parameters of endpoint and consumer methods; empty for the other kinds.
    pub fn parameters(&self) -> &[ParameterInfo] {
        match self {
            EntryPointDetails::Rest(rest) => &rest.parameters,
            EntryPointDetails::MessageConsumer(consumer) => &consumer.parameters,
            _ => &[],
        }
    }
}

/// HTTP methods recognized on endpoint markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Parses a verb name, ignoring case (`"post"`, `"POST"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestDetails {
    pub http_method: HttpMethod,
    pub path: String,
    pub framework: String,
    pub parameters: Vec<ParameterInfo>,
    pub return_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumerDetails {
    /// Broker family: `Kafka`, `JMS` or `RabbitMQ`
    pub consumer_type: String,
    /// Topics, destinations or queues the method listens on
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub parameters: Vec<ParameterInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledDetails {
    pub schedule: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchDetails {
    pub job_type: String,
    pub description: String,
    pub return_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CliDetails {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainApplicationDetails {
    pub annotation: String,
    pub description: String,
}

/// Joins a base path and a member path.
///
/// Repeated slashes collapse and the result always starts with a single `/`. A trailing slash
/// survives only when the member path ends with one (`/api` + `/` is `/api/`).
pub fn join_paths(base: &str, path: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(path.split('/'))
        .filter(|s| !s.is_empty())
        .collect();

    let mut joined = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

/// Plain text of a value or of each item of an array value.
pub(crate) fn plain_values(value: &ElementValue) -> Vec<String> {
    match value {
        ElementValue::Array(items) => items.iter().map(|item| item.to_plain()).collect(),
        other => vec![other.to_plain()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths_collapses_slashes() {
        assert_eq!(join_paths("/api/", "/items"), "/api/items");
        assert_eq!(join_paths("/api/v1/orders", ""), "/api/v1/orders");
        assert_eq!(join_paths("api", "items/{id}"), "/api/items/{id}");
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("//a//", "//b"), "/a/b");
    }

    #[test]
    fn test_join_paths_keeps_method_trailing_slash() {
        assert_eq!(join_paths("/api", "/"), "/api/");
        assert_eq!(join_paths("/api", "/items/"), "/api/items/");
        assert_eq!(join_paths("/api//", "items//"), "/api/items/");
        assert_eq!(join_paths("/api/", ""), "/api");
        assert_eq!(join_paths("", "/"), "/");
    }

    #[test]
    fn test_join_paths_is_idempotent() {
        let once = join_paths("/api/", "/items");
        assert_eq!(join_paths(&once, ""), once);
    }

    #[test]
    fn test_http_method_from_name() {
        assert_eq!(HttpMethod::from_name("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::from_name("options"), Some(HttpMethod::Options));
        assert_eq!(HttpMethod::from_name("TRACE"), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(EntryPointKind::MessageConsumer.to_string(), "MESSAGE_CONSUMER");
        assert_eq!(
            serde_json::to_string(&EntryPointKind::MainApplication).unwrap(),
            "\"MAIN_APPLICATION\""
        );
    }

    #[test]
    fn test_details_serialize_as_plain_map() {
        let details = EntryPointDetails::ScheduledTask(ScheduledDetails {
            schedule: "fixedRate=5000".to_string(),
            description: "Scheduled task: sweep".to_string(),
        });
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["schedule"], "fixedRate=5000");
        assert_eq!(details.kind(), EntryPointKind::ScheduledTask);
    }
}
