//! Authorization metadata attached to classes and methods.
//!
//! Recognized markers: `@PreAuthorize` (role expression), `@Secured` (role list),
//! `@RolesAllowed` (role list), `@PermitAll` and `@DenyAll`. The resolver distinguishes "no
//! security metadata" (`None`) from "explicitly public" (`PermitAll`, `requires_auth: false`).

use crate::annotation_value;
use crate::ast::Annotation;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Single-quoted tokens inside a security expression: `hasRole('ADMIN')`.
static QUOTED_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']+)'").expect("role pattern is a valid regex"));

/// Expression functions whose quoted arguments are role or authority names.
const ROLE_FUNCTIONS: &[&str] = &["hasRole", "hasAnyRole", "hasAuthority", "hasAnyAuthority"];

/// Resolved authorization requirement of an entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityInfo {
    /// Name of the marker that produced this requirement
    #[serde(rename = "type")]
    pub kind: String,
    pub requires_auth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub denied: bool,
}

impl SecurityInfo {
    fn new(kind: &str, requires_auth: bool) -> Self {
        Self {
            kind: kind.to_string(),
            requires_auth,
            expression: None,
            roles: Vec::new(),
            denied: false,
        }
    }
}

/// Resolves the security requirement declared by a set of annotations.
///
/// When several security markers are present they are applied in source order, each one
/// updating the requirement built so far.
pub fn resolve_security(annotations: &[Annotation]) -> Option<SecurityInfo> {
    let mut info: Option<SecurityInfo> = None;

    for ann in annotations {
        match ann.name.as_str() {
            "PreAuthorize" => {
                let current = apply(&mut info, "PreAuthorize", true);
                if let Some(expression) = annotation_value::resolve(ann, None).joined() {
                    if ROLE_FUNCTIONS.iter().any(|f| expression.contains(f)) {
                        current.roles = roles_in_expression(&expression);
                    }
                    current.expression = Some(expression);
                }
            }
            "Secured" | "RolesAllowed" => {
                let current = apply(&mut info, &ann.name, true);
                let roles = annotation_value::resolve(ann, None).items();
                if !roles.is_empty() {
                    current.roles = roles;
                }
            }
            "PermitAll" => {
                apply(&mut info, "PermitAll", false);
            }
            "DenyAll" => {
                apply(&mut info, "DenyAll", true).denied = true;
            }
            _ => {}
        }
    }

    if let Some(found) = &info {
        debug!("Resolved security: {} (roles: {:?})", found.kind, found.roles);
    }
    info
}

/// Picks the method-level requirement when present, the class-level one otherwise.
///
/// Method-level metadata replaces the class-level requirement wholesale; the two are never
/// merged.
pub fn effective_security(
    class_security: Option<&SecurityInfo>,
    method_annotations: &[Annotation],
) -> Option<SecurityInfo> {
    resolve_security(method_annotations).or_else(|| class_security.cloned())
}

fn apply<'a>(info: &'a mut Option<SecurityInfo>, kind: &str, requires_auth: bool) -> &'a mut SecurityInfo {
    let current = info.get_or_insert_with(|| SecurityInfo::new(kind, requires_auth));
    current.kind = kind.to_string();
    current.requires_auth = requires_auth;
    current
}

fn roles_in_expression(expression: &str) -> Vec<String> {
    QUOTED_ROLE
        .captures_iter(expression)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
