//! Uniform lookup of annotation parameters.
//!
//! Every extractor reads annotation metadata through [`resolve`] (full lookup, implicit
//! forms included) or [`named`] (explicit `name = value` pairs only). Shapes that neither
//! understands resolve to "not found"; they never fail the surrounding extraction.

use crate::ast::{Annotation, AnnotationValue, ElementValue, LiteralKind};
use log::debug;

/// Outcome of an annotation parameter lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    NotFound,
    Single(String),
    List(Vec<String>),
    /// A `name = {..}` pair whose array was flattened; [`joined`](Self::joined) gives the
    /// comma-joined form
    Flattened(Vec<String>),
}

impl ResolvedValue {
    pub fn is_found(&self) -> bool {
        !matches!(self, ResolvedValue::NotFound)
    }

    /// First value, if any. For a list this is its first element.
    pub fn first(&self) -> Option<String> {
        match self {
            ResolvedValue::NotFound => None,
            ResolvedValue::Single(value) => Some(value.clone()),
            ResolvedValue::List(values) | ResolvedValue::Flattened(values) => {
                values.first().cloned()
            }
        }
    }

    /// All values as a list. A single value is one item, commas included.
    pub fn items(&self) -> Vec<String> {
        match self {
            ResolvedValue::NotFound => Vec::new(),
            ResolvedValue::Single(value) => vec![value.clone()],
            ResolvedValue::List(values) | ResolvedValue::Flattened(values) => values.clone(),
        }
    }

    /// Single value as text; a flattened array is rendered as `"a, b"`.
    pub fn joined(&self) -> Option<String> {
        match self {
            ResolvedValue::Single(value) => Some(value.clone()),
            ResolvedValue::Flattened(values) => Some(values.join(", ")),
            _ => None,
        }
    }
}

/// Resolves a parameter of an annotation.
///
/// Lookup order:
/// 1. a bare literal attached directly (`@Path("/x")`), which answers any parameter name
/// 2. a bare array of literals (`@Secured({"A", "B"})`)
/// 3. explicit `name = value` pairs, matched by `param`
/// 4. a matched pair whose value is an array, flattened (see [`ResolvedValue::joined`])
///
/// With `param` set to `None` only the implicit forms (1 and 2) and a pair named `value`
/// are consulted.
pub fn resolve(annotation: &Annotation, param: Option<&str>) -> ResolvedValue {
    let resolved = match &annotation.value {
        AnnotationValue::Literal(lit) => ResolvedValue::Single(lit.value()),
        AnnotationValue::Array(items) => literal_list(items),
        AnnotationValue::Pairs(_) => {
            let name = param.unwrap_or("value");
            match named(annotation, name) {
                Some(ElementValue::Literal(lit)) => ResolvedValue::Single(lit.value()),
                Some(ElementValue::Array(items)) => match literal_list(items) {
                    ResolvedValue::List(values) => ResolvedValue::Flattened(values),
                    other => other,
                },
                _ => ResolvedValue::NotFound,
            }
        }
        AnnotationValue::Absent | AnnotationValue::Wrapped(_) => ResolvedValue::NotFound,
    };

    debug!(
        "Resolved @{}[{}] -> {:?}",
        annotation.name,
        param.unwrap_or("<implicit>"),
        resolved
    );
    resolved
}

/// Looks up an explicit `name = value` pair, ignoring implicit single-value forms.
pub fn named<'a>(annotation: &'a Annotation, name: &str) -> Option<&'a ElementValue> {
    match &annotation.value {
        AnnotationValue::Pairs(pairs) => pairs.iter().find(|p| p.name == name).map(|p| &p.value),
        _ => None,
    }
}

/// Reads a boolean parameter written either as a literal (`required = false`) or as a named
/// boolean reference (`required = Boolean.FALSE`).
pub fn named_bool(annotation: &Annotation, name: &str) -> Option<bool> {
    match named(annotation, name)? {
        ElementValue::Literal(lit) if lit.kind == LiteralKind::Boolean => Some(lit.raw == "true"),
        ElementValue::Reference(reference) => {
            let member = reference.rsplit('.').next().unwrap_or(reference);
            Some(member.eq_ignore_ascii_case("true"))
        }
        _ => None,
    }
}

/// Reads a string parameter from an explicit pair.
pub fn named_string(annotation: &Annotation, name: &str) -> Option<String> {
    match named(annotation, name)? {
        ElementValue::Literal(lit) => Some(lit.value()),
        _ => None,
    }
}

/// Renders every parameter of an annotation as `name=value`, joined with `", "`.
///
/// Literal values are unquoted; any other value is kept as source text. A bare implicit value
/// is rendered under the name `value`.
pub fn describe_pairs(annotation: &Annotation) -> Option<String> {
    let parts: Vec<String> = match &annotation.value {
        AnnotationValue::Pairs(pairs) => pairs
            .iter()
            .map(|p| format!("{}={}", p.name, p.value.to_plain()))
            .collect(),
        AnnotationValue::Literal(lit) => vec![format!("value={}", lit.value())],
        AnnotationValue::Array(items) => vec![format!(
            "value={}",
            ElementValue::Array(items.clone()).to_source()
        )],
        AnnotationValue::Wrapped(value) => vec![format!("value={}", value.to_plain())],
        AnnotationValue::Absent => Vec::new(),
    };

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Renders an annotation the way it reads in source, e.g. `@Size(min=16, max=19)`.
pub fn describe_annotation(annotation: &Annotation) -> String {
    match &annotation.value {
        AnnotationValue::Absent => format!("@{}", annotation.name),
        AnnotationValue::Literal(lit) => format!("@{}({})", annotation.name, lit.raw),
        AnnotationValue::Array(items) => format!(
            "@{}({})",
            annotation.name,
            ElementValue::Array(items.clone()).to_source()
        ),
        AnnotationValue::Wrapped(value) => format!("@{}({})", annotation.name, value.to_source()),
        AnnotationValue::Pairs(pairs) => {
            let params: Vec<String> = pairs
                .iter()
                .map(|p| format!("{}={}", p.name, p.value.to_source()))
                .collect();
            format!("@{}({})", annotation.name, params.join(", "))
        }
    }
}

fn literal_list(items: &[ElementValue]) -> ResolvedValue {
    let values: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            ElementValue::Literal(lit) => Some(lit.value()),
            _ => None,
        })
        .collect();

    if values.is_empty() {
        ResolvedValue::NotFound
    } else {
        ResolvedValue::List(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ElementValuePair, Literal};

    fn string(value: &str) -> ElementValue {
        ElementValue::Literal(Literal::new(LiteralKind::String, format!("\"{}\"", value)))
    }

    fn annotation(name: &str, value: AnnotationValue) -> Annotation {
        Annotation {
            name: name.to_string(),
            value,
            line: 1,
        }
    }

    fn pairs(entries: Vec<(&str, ElementValue)>) -> AnnotationValue {
        AnnotationValue::Pairs(
            entries
                .into_iter()
                .map(|(name, value)| ElementValuePair {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        )
    }

    #[test]
    fn test_bare_literal_answers_any_parameter() {
        let ann = annotation(
            "KafkaListener",
            AnnotationValue::Literal(Literal::new(LiteralKind::String, "\"orders\"")),
        );

        assert_eq!(resolve(&ann, Some("topics")), ResolvedValue::Single("orders".into()));
        assert_eq!(resolve(&ann, None), ResolvedValue::Single("orders".into()));
    }

    #[test]
    fn test_bare_array_resolves_to_list() {
        let ann = annotation(
            "Secured",
            AnnotationValue::Array(vec![string("ADMIN"), string("OPS")]),
        );

        assert_eq!(
            resolve(&ann, None),
            ResolvedValue::List(vec!["ADMIN".into(), "OPS".into()])
        );
        assert_eq!(resolve(&ann, None).first().as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_pairs_matched_by_name() {
        let ann = annotation(
            "KafkaListener",
            pairs(vec![("topics", string("payments")), ("groupId", string("g1"))]),
        );

        assert_eq!(resolve(&ann, Some("groupId")), ResolvedValue::Single("g1".into()));
        assert_eq!(resolve(&ann, Some("concurrency")), ResolvedValue::NotFound);
    }

    #[test]
    fn test_pair_with_array_is_flattened() {
        let ann = annotation(
            "KafkaListener",
            pairs(vec![(
                "topics",
                ElementValue::Array(vec![string("a"), string("b")]),
            )]),
        );

        let resolved = resolve(&ann, Some("topics"));
        assert_eq!(resolved.joined().as_deref(), Some("a, b"));
        assert_eq!(resolved.items(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(resolved.first().as_deref(), Some("a"));
    }

    #[test]
    fn test_single_value_keeps_commas() {
        let ann = annotation(
            "GetMapping",
            AnnotationValue::Literal(Literal::new(LiteralKind::String, "\"/geo/{lat},{lng}\"")),
        );

        let resolved = resolve(&ann, Some("value"));
        assert_eq!(resolved.items(), vec!["/geo/{lat},{lng}".to_string()]);
        assert_eq!(resolved.first().as_deref(), Some("/geo/{lat},{lng}"));
    }

    #[test]
    fn test_unsupported_shapes_are_not_found() {
        let wrapped = annotation(
            "RequestMapping",
            AnnotationValue::Wrapped(ElementValue::Reference("Routes.ORDERS".into())),
        );
        assert_eq!(resolve(&wrapped, Some("value")), ResolvedValue::NotFound);

        let marker = annotation("Component", AnnotationValue::Absent);
        assert_eq!(resolve(&marker, None), ResolvedValue::NotFound);
        assert!(!resolve(&marker, None).is_found());

        let reference = annotation(
            "KafkaListener",
            pairs(vec![("topics", ElementValue::Reference("Topics.ORDERS".into()))]),
        );
        assert_eq!(resolve(&reference, Some("topics")), ResolvedValue::NotFound);
    }

    #[test]
    fn test_named_ignores_implicit_value() {
        let ann = annotation(
            "RequestParam",
            AnnotationValue::Literal(Literal::new(LiteralKind::String, "\"page\"")),
        );
        assert!(named(&ann, "defaultValue").is_none());
    }

    #[test]
    fn test_named_bool_reads_literals_and_references() {
        let literal = annotation(
            "RequestParam",
            pairs(vec![(
                "required",
                ElementValue::Literal(Literal::new(LiteralKind::Boolean, "false")),
            )]),
        );
        assert_eq!(named_bool(&literal, "required"), Some(false));

        let reference = annotation(
            "RequestParam",
            pairs(vec![("required", ElementValue::Reference("Boolean.TRUE".into()))]),
        );
        assert_eq!(named_bool(&reference, "required"), Some(true));

        assert_eq!(named_bool(&reference, "defaultValue"), None);
    }

    #[test]
    fn test_describe_pairs() {
        let ann = annotation(
            "Scheduled",
            pairs(vec![
                ("cron", string("0 0 * * * *")),
                ("zone", string("UTC")),
            ]),
        );
        assert_eq!(
            describe_pairs(&ann).as_deref(),
            Some("cron=0 0 * * * *, zone=UTC")
        );

        let marker = annotation("Scheduled", AnnotationValue::Absent);
        assert_eq!(describe_pairs(&marker), None);
    }

    #[test]
    fn test_describe_annotation_keeps_source_form() {
        let ann = annotation(
            "Size",
            pairs(vec![
                ("min", ElementValue::Literal(Literal::new(LiteralKind::Number, "16"))),
                ("max", ElementValue::Literal(Literal::new(LiteralKind::Number, "19"))),
            ]),
        );
        assert_eq!(describe_annotation(&ann), "@Size(min=16, max=19)");

        let marker = annotation("NotNull", AnnotationValue::Absent);
        assert_eq!(describe_annotation(&marker), "@NotNull");

        let single = annotation(
            "DecimalMin",
            AnnotationValue::Literal(Literal::new(LiteralKind::String, "\"0.01\"")),
        );
        assert_eq!(describe_annotation(&single), "@DecimalMin(\"0.01\")");
    }
}
