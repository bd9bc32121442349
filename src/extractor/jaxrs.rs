use crate::annotation_value;
use crate::ast::Annotation;
use crate::extractor::{
    join_paths, ClassContext, EntryPoint, EntryPointDetails, EntryPointExtractor, HttpMethod,
    RestDetails,
};
use crate::parameters::extract_parameters;
use crate::security::{effective_security, resolve_security};
use crate::type_string::canonical;
use log::debug;

/// Verb markers, in the order they are checked on a method.
const VERB_MARKERS: &[(&str, HttpMethod)] = &[
    ("GET", HttpMethod::Get),
    ("POST", HttpMethod::Post),
    ("PUT", HttpMethod::Put),
    ("DELETE", HttpMethod::Delete),
    ("PATCH", HttpMethod::Patch),
    ("HEAD", HttpMethod::Head),
    ("OPTIONS", HttpMethod::Options),
];

/// JAX-RS resource extractor
///
/// Claims classes carrying `@Path`. A method becomes an endpoint for every verb marker on it;
/// its own `@Path` is appended to the class path.
pub struct JaxRsExtractor;

impl EntryPointExtractor for JaxRsExtractor {
    fn name(&self) -> &'static str {
        "JAX-RS resource"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class.has_marker("Path")
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        let base_path = path_of(&class.class.annotations);
        let class_security = resolve_security(&class.class.annotations);
        let class_consumes = media_of(class.class.annotation("Consumes"));
        let class_produces = media_of(class.class.annotation("Produces"));

        let mut entry_points = Vec::new();

        for method in &class.class.methods {
            for (marker, http_method) in VERB_MARKERS {
                if !method.has_annotation(marker) {
                    continue;
                }

                let path = join_paths(&base_path, &path_of(&method.annotations));
                debug!("{}.{}: {:?} {}", class.class_name, method.name, http_method, path);

                let consumes = method
                    .annotation("Consumes")
                    .map(|ann| media_of(Some(ann)))
                    .unwrap_or_else(|| class_consumes.clone());
                let produces = method
                    .annotation("Produces")
                    .map(|ann| media_of(Some(ann)))
                    .unwrap_or_else(|| class_produces.clone());

                let details = RestDetails {
                    http_method: *http_method,
                    path,
                    framework: "JAX-RS".to_string(),
                    parameters: extract_parameters(&method.parameters),
                    return_type: canonical(method.return_type.as_ref()),
                    consumes,
                    produces,
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

fn path_of(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .find(|a| a.name == "Path")
        .and_then(|ann| annotation_value::resolve(ann, None).first())
        .unwrap_or_default()
}

fn media_of(annotation: Option<&Annotation>) -> Vec<String> {
    annotation
        .map(|ann| annotation_value::resolve(ann, None).items())
        .unwrap_or_default()
}
