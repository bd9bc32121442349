//! The machine-readable result of an analysis run.

use crate::analyzer::ParseFailure;
use crate::extractor::{EntryPoint, EntryPointKind};
use crate::model_schema::ModelSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// Entry-point inventory with a per-kind summary and the referenced payload schemas.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub total_entry_points: usize,
    /// Entry-point count per kind, in kind order
    pub by_type: BTreeMap<EntryPointKind, usize>,
    pub entry_points: Vec<EntryPoint>,
    /// Body type name to schema
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub model_schemas: BTreeMap<String, ModelSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse_failures: Vec<ParseFailure>,
}

impl AnalysisReport {
    pub fn new(
        entry_points: Vec<EntryPoint>,
        model_schemas: BTreeMap<String, ModelSchema>,
        parse_failures: Vec<ParseFailure>,
    ) -> Self {
        let mut by_type = BTreeMap::new();
        for ep in &entry_points {
            *by_type.entry(ep.kind).or_insert(0) += 1;
        }

        Self {
            total_entry_points: entry_points.len(),
            by_type,
            entry_points,
            model_schemas,
            parse_failures,
        }
    }

    pub fn count(&self, kind: EntryPointKind) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }
}
