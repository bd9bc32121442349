//! Entry-point discovery - Static inventory of the ways into an annotation-driven Java codebase.
//!
//! This library statically analyzes Java sources and reports every externally triggerable
//! member: HTTP endpoints, message listeners, scheduled tasks, batch jobs, command-line mains
//! and application bootstraps. For request bodies it also extracts the payload shape from the
//! model class declaration.
//!
//! # Supported Frameworks
//!
//! - **Spring MVC**: `@RestController` / `@Controller` with `@*Mapping` methods
//! - **JAX-RS**: `@Path` resources with verb markers
//! - **Spring messaging**: `@KafkaListener`, `@JmsListener`, `@RabbitListener`
//! - **Spring scheduling and batch**: `@Scheduled`, `@EnableBatchProcessing` job beans
//! - **Spring Boot**: `@SpringBootApplication` bootstraps
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively collects Java files
//! 2. [`parser`] - Parses each file with tree-sitter and lowers it into [`ast`]
//! 3. [`classifier`] - Picks the extractor category for each class by priority
//! 4. [`extractor`] - Emits entry points per category, reading markers through
//!    [`annotation_value`], [`type_string`], [`parameters`] and [`security`]
//! 5. [`model_schema`] - Resolves request body types to field schemas
//! 6. [`analyzer`] - Owns one run and isolates per-file parse failures
//! 7. [`report`] and [`serializer`] - Summarize and serialize to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use entrypoint_discovery::{analyzer::EntryPointAnalyzer, serializer::serialize_yaml};
//! use std::path::Path;
//!
//! let mut analyzer = EntryPointAnalyzer::new();
//! analyzer.analyze_repository(Path::new("./payments-service")).unwrap();
//!
//! let schemas = analyzer.model_schemas();
//! let report = analyzer.into_report(schemas);
//! println!("{}", serialize_yaml(&report).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod analyzer;
pub mod annotation_value;
pub mod ast;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod extractor;
pub mod model_schema;
pub mod parameters;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod security;
pub mod serializer;
pub mod type_string;
