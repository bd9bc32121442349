use crate::annotation_value::{self, ResolvedValue};
use crate::ast::{Annotation, ElementValue};
use crate::extractor::{
    join_paths, plain_values, ClassContext, EntryPoint, EntryPointDetails, EntryPointExtractor,
    HttpMethod, RestDetails,
};
use crate::parameters::extract_parameters;
use crate::security::{effective_security, resolve_security};
use crate::type_string::canonical;
use log::debug;

/// Method-level mapping markers and the verb each one implies.
///
/// `RequestMapping` implies no verb of its own; it reads `method = RequestMethod.X` and
/// falls back to GET.
const MAPPING_MARKERS: &[(&str, Option<HttpMethod>)] = &[
    ("GetMapping", Some(HttpMethod::Get)),
    ("PostMapping", Some(HttpMethod::Post)),
    ("PutMapping", Some(HttpMethod::Put)),
    ("DeleteMapping", Some(HttpMethod::Delete)),
    ("PatchMapping", Some(HttpMethod::Patch)),
    ("RequestMapping", None),
];

/// Spring MVC controller extractor
pub struct SpringMvcExtractor;

impl EntryPointExtractor for SpringMvcExtractor {
    fn name(&self) -> &'static str {
        "Spring MVC controller"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class.has_marker("RestController") || class.has_marker("Controller")
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        let base_path = class
            .class
            .annotation("RequestMapping")
            .map(mapping_path)
            .unwrap_or_default();
        let class_security = resolve_security(&class.class.annotations);

        let mut entry_points = Vec::new();

        for method in &class.class.methods {
            for (marker, implied) in MAPPING_MARKERS {
                let Some(mapping) = method.annotation(marker) else {
                    continue;
                };

                let http_method = implied
                    .or_else(|| explicit_method(mapping))
                    .unwrap_or(HttpMethod::Get);
                let path = join_paths(&base_path, &mapping_path(mapping));

                debug!(
                    "{}.{}: {:?} {} via @{}",
                    class.class_name, method.name, http_method, path, marker
                );

                let details = RestDetails {
                    http_method,
                    path,
                    framework: "Spring MVC".to_string(),
                    parameters: extract_parameters(&method.parameters),
                    return_type: canonical(method.return_type.as_ref()),
                    consumes: media_types(mapping, "consumes"),
                    produces: media_types(mapping, "produces"),
                    security: effective_security(class_security.as_ref(), &method.annotations),
                };

                entry_points.push(class.entry_point(
                    &method.name,
                    method.line,
                    EntryPointDetails::Rest(details),
                ));
            }
        }

        entry_points
    }
}

/// Path declared on a mapping marker, through `value` then `path`. Array forms take the first
/// path.
fn mapping_path(mapping: &Annotation) -> String {
    ["value", "path"]
        .into_iter()
        .map(|param| annotation_value::resolve(mapping, Some(param)))
        .find(ResolvedValue::is_found)
        .and_then(|resolved| resolved.first())
        .unwrap_or_default()
}

/// Verb given as `method = RequestMethod.POST` (or an array of them; the first wins).
fn explicit_method(mapping: &Annotation) -> Option<HttpMethod> {
    let reference = match annotation_value::named(mapping, "method")? {
        ElementValue::Array(items) => items.first()?.to_plain(),
        other => other.to_plain(),
    };
    let verb = reference.rsplit('.').next().unwrap_or(&reference);
    HttpMethod::from_name(verb)
}

fn media_types(mapping: &Annotation, name: &str) -> Vec<String> {
    annotation_value::named(mapping, name)
        .map(plain_values)
        .unwrap_or_default()
}
