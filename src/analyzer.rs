use crate::ast::{CompilationUnit, TypeKind};
use crate::classifier::EntryPointClassifier;
use crate::error::Error;
use crate::extractor::{ClassContext, EntryPoint};
use crate::model_schema::{ModelSchema, ModelSchemaExtractor};
use crate::parser::AstParser;
use crate::report::AnalysisReport;
use crate::scanner::FileScanner;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A source file that contributed nothing because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub file: PathBuf,
    /// 1-based line of the first syntax error, 0 when unknown
    pub line: usize,
    pub message: String,
}

impl ParseFailure {
    fn from_error(path: &Path, error: &Error) -> Self {
        match error {
            Error::ParseError {
                file,
                line,
                message,
            } => Self {
                file: file.clone(),
                line: *line,
                message: message.clone(),
            },
            other => Self {
                file: path.to_path_buf(),
                line: 0,
                message: other.to_string(),
            },
        }
    }
}

/// Owns the state of one analysis run.
///
/// Entry points accumulate in discovery order across every analyzed file. Files that fail to
/// parse are recorded and skipped; they never affect what other files contribute.
///
/// # Example
///
/// ```no_run
/// use entrypoint_discovery::analyzer::EntryPointAnalyzer;
/// use std::path::Path;
///
/// let mut analyzer = EntryPointAnalyzer::new();
/// let found = analyzer.analyze_repository(Path::new("./payments-service")).unwrap().len();
/// println!("Found {} entry points", found);
/// ```
pub struct EntryPointAnalyzer {
    classifier: EntryPointClassifier,
    entry_points: Vec<EntryPoint>,
    failures: Vec<ParseFailure>,
    source_files: Vec<PathBuf>,
    /// Built on first use; dropped when new source files are scanned
    schema_extractor: Option<ModelSchemaExtractor>,
}

impl Default for EntryPointAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryPointAnalyzer {
    pub fn new() -> Self {
        Self::with_classifier(EntryPointClassifier::new())
    }

    pub fn with_classifier(classifier: EntryPointClassifier) -> Self {
        Self {
            classifier,
            entry_points: Vec::new(),
            failures: Vec::new(),
            source_files: Vec::new(),
            schema_extractor: None,
        }
    }

    /// Scans a repository and analyzes every Java file in it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the repository root cannot be scanned. Per-file parse
    /// failures are recorded in [`failures`](Self::failures) instead.
    pub fn analyze_repository(&mut self, root: &Path) -> Result<&[EntryPoint]> {
        // Step 1: Collect sources
        info!("Scanning {}", root.display());
        let scan_result = FileScanner::new(root.to_path_buf())
            .scan()
            .with_context(|| format!("Failed to scan repository: {}", root.display()))?;
        info!("Found {} Java files", scan_result.java_files.len());

        // Step 2: Parse, isolating failures per file
        let results = AstParser::parse_files(&scan_result.java_files);

        // Step 3: Classify every class of every parsed file
        for (path, result) in scan_result.java_files.iter().zip(results) {
            match result {
                Ok(unit) => {
                    self.analyze_unit(&unit);
                }
                Err(e) => self.failures.push(ParseFailure::from_error(path, &e)),
            }
        }

        if !scan_result.java_files.is_empty() {
            self.source_files.extend(scan_result.java_files);
            self.schema_extractor = None;
        }

        info!(
            "Discovered {} entry points ({} files failed to parse)",
            self.entry_points.len(),
            self.failures.len()
        );
        Ok(&self.entry_points)
    }

    /// Analyzes one in-memory source. A syntax error is recorded, not returned.
    ///
    /// Returns the number of entry points the source contributed.
    pub fn analyze_source(&mut self, path: &Path, source: &str) -> usize {
        match AstParser::parse_source(path, source) {
            Ok(unit) => self.analyze_unit(&unit),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                self.failures.push(ParseFailure::from_error(path, &e));
                0
            }
        }
    }

    /// Classifies every class declared in the unit, nested classes included.
    ///
    /// Returns the number of entry points the unit contributed.
    pub fn analyze_unit(&mut self, unit: &CompilationUnit) -> usize {
        let before = self.entry_points.len();

        for declaration in unit.all_types() {
            if declaration.kind != TypeKind::Class {
                continue;
            }
            let class = ClassContext::new(unit, declaration);
            self.entry_points.extend(self.classifier.classify(&class));
        }

        let added = self.entry_points.len() - before;
        debug!("{}: {} entry points", unit.path.display(), added);
        added
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    /// Schema extractor over every source file scanned so far. Its cache lives as long as the
    /// run does, until another repository is scanned.
    pub fn schema_extractor(&mut self) -> &mut ModelSchemaExtractor {
        let files = &self.source_files;
        self.schema_extractor
            .get_or_insert_with(|| ModelSchemaExtractor::new(files))
    }

    /// Schemas of the body types referenced by the discovered entry points.
    pub fn model_schemas(&mut self) -> BTreeMap<String, ModelSchema> {
        let files = &self.source_files;
        self.schema_extractor
            .get_or_insert_with(|| ModelSchemaExtractor::new(files))
            .schemas_for_entry_points(&self.entry_points)
    }

    /// Consumes the run and produces its report.
    pub fn into_report(self, model_schemas: BTreeMap<String, ModelSchema>) -> AnalysisReport {
        AnalysisReport::new(self.entry_points, model_schemas, self.failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::EntryPointKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_source_records_failures() {
        let mut analyzer = EntryPointAnalyzer::new();

        let added = analyzer.analyze_source(
            Path::new("Broken.java"),
            "@RestController class Broken { @GetMapping void x( }",
        );

        assert_eq!(added, 0);
        assert!(analyzer.entry_points().is_empty());
        assert_eq!(analyzer.failures().len(), 1);
        assert_eq!(analyzer.failures()[0].file, PathBuf::from("Broken.java"));
        assert!(analyzer.failures()[0].line >= 1);
    }

    #[test]
    fn test_nested_classes_are_classified() {
        let mut analyzer = EntryPointAnalyzer::new();

        let added = analyzer.analyze_source(
            Path::new("Outer.java"),
            r#"
            package com.shop;
            public class Outer {
                @RestController
                public static class Api {
                    @GetMapping("/ping") public String ping() { return "pong"; }
                }
                interface Marker {}
            }
        "#,
        );

        assert_eq!(added, 1);
        assert_eq!(analyzer.entry_points()[0].class_name, "com.shop.Api");
    }

    #[test]
    fn test_unparsable_file_does_not_change_other_counts() {
        let dir = TempDir::new().unwrap();
        let controller = r#"
            @RestController
            class Ok {
                @GetMapping("/a") public String a() { return ""; }
                @PostMapping("/b") public void b(@RequestBody Payload p) {}
            }
        "#;
        fs::write(dir.path().join("Ok.java"), controller).unwrap();
        fs::write(
            dir.path().join("Job.java"),
            "class Job { @Scheduled(fixedRate = 1) void tick() {} }",
        )
        .unwrap();

        let mut clean = EntryPointAnalyzer::new();
        let clean_count = clean.analyze_repository(dir.path()).unwrap().len();

        fs::write(dir.path().join("Bad.java"), "@RestController class Bad { @GetMapping(").unwrap();
        let mut dirty = EntryPointAnalyzer::new();
        let dirty_count = dirty.analyze_repository(dir.path()).unwrap().len();

        assert_eq!(clean_count, 3);
        assert_eq!(dirty_count, clean_count);
        assert_eq!(dirty.failures().len(), 1);
        assert!(dirty.failures()[0].file.ends_with("Bad.java"));
    }

    #[test]
    fn test_report_with_schemas() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Api.java"),
            r#"
            @RestController
            class Api {
                @PostMapping("/payloads") public void create(@RequestBody Payload p) {}
                @PutMapping("/names") public void rename(@RequestBody String name) {}
            }
        "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("Payload.java"),
            "class Payload { @NotBlank private String body; }",
        )
        .unwrap();

        let mut analyzer = EntryPointAnalyzer::new();
        analyzer.analyze_repository(dir.path()).unwrap();
        let schemas = analyzer.model_schemas();
        let report = analyzer.into_report(schemas);

        assert_eq!(report.total_entry_points, 2);
        assert_eq!(report.by_type.get(&EntryPointKind::Rest), Some(&2));
        assert_eq!(report.model_schemas.keys().collect::<Vec<_>>(), vec!["Payload"]);
        assert!(report.model_schemas["Payload"].fields[0].required);
    }

    #[test]
    fn test_schema_cache_is_kept_across_calls() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Api.java"),
            "@RestController class Api { @PostMapping(\"/p\") public void create(@RequestBody Payload p) {} }",
        )
        .unwrap();
        let payload = dir.path().join("Payload.java");
        fs::write(&payload, "class Payload { @NotNull private String body; }").unwrap();

        let mut analyzer = EntryPointAnalyzer::new();
        analyzer.analyze_repository(dir.path()).unwrap();
        let first = analyzer.model_schemas();

        fs::remove_file(&payload).unwrap();
        let second = analyzer.model_schemas();

        assert_eq!(first, second);
        assert_eq!(second["Payload"].fields[0].name, "body");
        assert_eq!(analyzer.schema_extractor().cached_count(), 1);
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut analyzer = EntryPointAnalyzer::new();
        assert!(analyzer
            .analyze_repository(&dir.path().join("missing"))
            .is_err());
    }
}
