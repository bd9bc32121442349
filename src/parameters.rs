use crate::annotation_value::{self, ResolvedValue};
use crate::ast::{Annotation, FormalParameter};
use crate::type_string::canonical;
use log::debug;
use serde::Serialize;

/// Where an endpoint argument is bound from in the incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Query,
    Path,
    Body,
    Header,
    /// No recognized binding marker
    Unclassified,
}

/// One argument of an endpoint method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    /// Canonical type string
    #[serde(rename = "type")]
    pub type_name: String,
    /// Simple names of the markers attached to the argument
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub param_type: ParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Request-side name when it differs from the argument name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Maps a binding marker to the parameter location it declares.
fn binding_of(annotation: &str) -> Option<ParamType> {
    match annotation {
        "RequestParam" | "QueryParam" => Some(ParamType::Query),
        "PathVariable" | "PathParam" => Some(ParamType::Path),
        "RequestBody" => Some(ParamType::Body),
        "RequestHeader" | "HeaderParam" => Some(ParamType::Header),
        _ => None,
    }
}

/// Extracts binding metadata for every argument of a method, in declaration order.
///
/// Path- and body-bound arguments are always required. Query- and header-bound arguments
/// default to optional and read `required`, `defaultValue` and `value`/`name` from their
/// marker.
pub fn extract_parameters(parameters: &[FormalParameter]) -> Vec<ParameterInfo> {
    parameters.iter().map(extract_parameter).collect()
}

fn extract_parameter(param: &FormalParameter) -> ParameterInfo {
    let mut info = ParameterInfo {
        name: param.name.clone(),
        type_name: canonical(Some(&param.type_ref)),
        annotations: param.annotations.iter().map(|a| a.name.clone()).collect(),
        param_type: ParamType::Unclassified,
        required: false,
        default_value: None,
        alias: None,
    };

    for ann in &param.annotations {
        if ann.name == "DefaultValue" {
            // JAX-RS carries the default in its own marker
            info.default_value = annotation_value::resolve(ann, None).first();
            continue;
        }

        let Some(binding) = binding_of(&ann.name) else {
            continue;
        };
        info.param_type = binding;

        match binding {
            ParamType::Path => {
                info.required = true;
                info.alias = alias_of(ann);
            }
            ParamType::Body => info.required = true,
            ParamType::Query | ParamType::Header => read_request_details(ann, &mut info),
            ParamType::Unclassified => {}
        }
    }

    debug!(
        "Parameter {}: {:?} (required: {})",
        info.name, info.param_type, info.required
    );
    info
}

fn read_request_details(ann: &Annotation, info: &mut ParameterInfo) {
    if let Some(default_value) = annotation_value::named_string(ann, "defaultValue") {
        info.default_value = Some(default_value);
    }
    if let Some(required) = annotation_value::named_bool(ann, "required") {
        info.required = required;
    }
    info.alias = alias_of(ann);
}

fn alias_of(ann: &Annotation) -> Option<String> {
    ["value", "name"]
        .into_iter()
        .map(|param| annotation_value::resolve(ann, Some(param)))
        .find_map(|resolved| match resolved {
            ResolvedValue::Single(name) if !name.is_empty() => Some(name),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstParser;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn params_of(signature: &str) -> Vec<ParameterInfo> {
        let source = format!("class C {{ void m({}) {{}} }}", signature);
        let unit = AstParser::parse_source(Path::new("C.java"), &source).unwrap();
        extract_parameters(&unit.types[0].methods[0].parameters)
    }

    #[test]
    fn test_body_and_path_are_always_required() {
        let params = params_of("@PathVariable(\"id\") Long orderId, @RequestBody @Valid Order order");

        assert_eq!(params[0].param_type, ParamType::Path);
        assert!(params[0].required);
        assert_eq!(params[0].alias.as_deref(), Some("id"));

        assert_eq!(params[1].param_type, ParamType::Body);
        assert!(params[1].required);
        assert_eq!(params[1].type_name, "Order");
        assert_eq!(
            params[1].annotations,
            vec!["RequestBody".to_string(), "Valid".to_string()]
        );
    }

    #[test]
    fn test_query_parameter_details() {
        let params = params_of(
            "@RequestParam(value = \"page_no\", defaultValue = \"0\", required = false) int page",
        );

        assert_eq!(
            params[0],
            ParameterInfo {
                name: "page".to_string(),
                type_name: "int".to_string(),
                annotations: vec!["RequestParam".to_string()],
                param_type: ParamType::Query,
                required: false,
                default_value: Some("0".to_string()),
                alias: Some("page_no".to_string()),
            }
        );
    }

    #[test]
    fn test_required_read_from_boolean_reference() {
        let params = params_of("@RequestHeader(name = \"X-Tenant\", required = Boolean.TRUE) String tenant");

        assert_eq!(params[0].param_type, ParamType::Header);
        assert!(params[0].required);
        assert_eq!(params[0].alias.as_deref(), Some("X-Tenant"));
    }

    #[test]
    fn test_query_defaults_to_optional() {
        let params = params_of("@RequestParam String q");
        assert_eq!(params[0].param_type, ParamType::Query);
        assert!(!params[0].required);
        assert_eq!(params[0].alias, None);
    }

    #[test]
    fn test_unannotated_parameter_is_unclassified() {
        let params = params_of("java.security.Principal principal");
        assert_eq!(params[0].param_type, ParamType::Unclassified);
        assert_eq!(params[0].type_name, "Principal");
        assert!(params[0].annotations.is_empty());
        assert!(!params[0].required);
    }

    #[test]
    fn test_jaxrs_bindings() {
        let params = params_of(
            "@PathParam(\"id\") String id, @QueryParam(\"limit\") @DefaultValue(\"20\") int limit",
        );

        assert_eq!(params[0].param_type, ParamType::Path);
        assert!(params[0].required);
        assert_eq!(params[1].param_type, ParamType::Query);
        assert_eq!(params[1].alias.as_deref(), Some("limit"));
        assert_eq!(params[1].default_value.as_deref(), Some("20"));
    }
}
