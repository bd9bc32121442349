//! Serialization of analysis reports to YAML or JSON.

use crate::error::Result;
use crate::report::AnalysisReport;
use anyhow::Context;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a report to YAML.
///
/// # Errors
///
/// Returns [`Error::SerializationError`](crate::error::Error::SerializationError) if the
/// report cannot be represented.
pub fn serialize_yaml(report: &AnalysisReport) -> Result<String> {
    debug!("Serializing report to YAML");
    Ok(serde_yaml::to_string(report)?)
}

/// Serializes a report to pretty-printed JSON.
pub fn serialize_json(report: &AnalysisReport) -> Result<String> {
    debug!("Serializing report to JSON");
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes string content to a file, creating parent directories as needed.
///
/// An existing file is overwritten.
pub fn write_to_file(content: &str, path: &Path) -> anyhow::Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::EntryPointAnalyzer;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn create_test_report() -> AnalysisReport {
        let mut analyzer = EntryPointAnalyzer::new();
        analyzer.analyze_source(
            Path::new("OrderController.java"),
            r#"
            package com.shop;

            @RestController
            @RequestMapping("/api/v1")
            public class OrderController {
                @PostMapping("/orders")
                public Order create(@RequestBody Order order) { return order; }
            }
        "#,
        );
        analyzer.into_report(BTreeMap::new())
    }

    #[test]
    fn test_serialize_yaml() {
        let report = create_test_report();
        let yaml = serialize_yaml(&report).unwrap();

        assert!(yaml.contains("total_entry_points: 1"));
        assert!(yaml.contains("REST: 1"));
        assert!(yaml.contains("type: REST"));
        assert!(yaml.contains("class: com.shop.OrderController"));
        assert!(yaml.contains("path: /api/v1/orders"));
        assert!(yaml.contains("http_method: POST"));
    }

    #[test]
    fn test_serialize_json() {
        let report = create_test_report();
        let json = serialize_json(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["total_entry_points"], 1);
        assert_eq!(parsed["by_type"]["REST"], 1);

        let entry = &parsed["entry_points"][0];
        assert_eq!(entry["type"], "REST");
        assert_eq!(entry["method"], "create");
        assert_eq!(entry["details"]["framework"], "Spring MVC");
        assert_eq!(entry["details"]["parameters"][0]["param_type"], "body");
        assert_eq!(entry["details"]["parameters"][0]["required"], true);
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let json = serialize_json(&create_test_report()).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  "));
        assert!(json.lines().count() > 5);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("reports").join("nested").join("entry-points.yaml");

        write_to_file("total_entry_points: 0\n", &file_path).unwrap();

        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "total_entry_points: 0\n"
        );
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("entry-points.json");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
