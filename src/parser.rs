use crate::ast::{
    Annotation, AnnotationValue, CompilationUnit, ElementValue, ElementValuePair,
    FieldDeclaration, FormalParameter, Literal, LiteralKind, MethodDeclaration, TypeDeclaration,
    TypeKind, TypeRef, VariableDeclarator, WildcardBound,
};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Front-end parser for Java source files.
///
/// The `AstParser` drives the `tree-sitter-java` grammar and lowers the resulting concrete
/// syntax tree into the crate's declaration model ([`CompilationUnit`]). Any error or missing
/// node in the tree makes the whole file a syntax error: a file either parses completely or
/// contributes nothing.
///
/// # Example
///
/// ```no_run
/// use entrypoint_discovery::parser::AstParser;
/// use std::path::Path;
///
/// let unit = AstParser::parse_file(Path::new("src/main/java/App.java")).unwrap();
/// println!("Parsed {} top-level types", unit.types.len());
/// ```
pub struct AstParser;

impl AstParser {
    /// Parses a single Java source file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Java syntax
    pub fn parse_file(path: &Path) -> Result<CompilationUnit> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)?;
        Self::parse_source(path, &content)
    }

    /// Parses Java source text that was read from `path`.
    pub fn parse_source(path: &Path, source: &str) -> Result<CompilationUnit> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::LANGUAGE.into())?;

        let tree = parser.parse(source, None).ok_or_else(|| Error::ParseError {
            file: path.to_path_buf(),
            line: 0,
            message: "parser produced no tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, message) = match first_error(root) {
                Some(node) => (node.start_position().row + 1, describe_error(node, source)),
                None => (0, "malformed source".to_string()),
            };
            return Err(Error::ParseError {
                file: path.to_path_buf(),
                line,
                message,
            });
        }

        let lowering = Lowering {
            source: source.as_bytes(),
        };
        let unit = lowering.compilation_unit(root, path);

        debug!(
            "Successfully parsed {} ({} top-level types)",
            path.display(),
            unit.types.len()
        );
        Ok(unit)
    }

    /// Parses multiple files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings; each input path gets one result.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<CompilationUnit>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<CompilationUnit>> = paths
            .iter()
            .map(|path| match Self::parse_file(path) {
                Ok(unit) => Ok(unit),
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// Depth-first search for the first error or missing node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn describe_error(node: Node, source: &str) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let text = node.utf8_text(source.as_bytes()).unwrap_or("");
    let snippet: String = text.chars().take(40).collect();
    format!("unexpected `{}`", snippet.trim())
}

fn is_type_kind(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "void_type"
            | "annotated_type"
            | "wildcard"
    )
}

fn simple_name(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).trim().to_string()
}

/// Lowers tree-sitter nodes into the declaration model.
struct Lowering<'a> {
    source: &'a [u8],
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Node text with all whitespace removed, for dotted names split over lines.
    fn compact_text(&self, node: Node) -> String {
        self.text(node).split_whitespace().collect()
    }

    fn line(node: Node) -> usize {
        node.start_position().row + 1
    }

    fn named_children(node: Node<'a>) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .collect();
        children
    }

    fn compilation_unit(&self, root: Node<'a>, path: &Path) -> CompilationUnit {
        let mut package = String::new();
        let mut types = Vec::new();

        for child in Self::named_children(root) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name) = Self::named_children(child)
                        .into_iter()
                        .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
                    {
                        package = self.compact_text(name);
                    }
                }
                _ => {
                    if let Some(decl) = self.type_declaration(child) {
                        types.push(decl);
                    }
                }
            }
        }

        CompilationUnit {
            path: path.to_path_buf(),
            package,
            types,
        }
    }

    fn type_declaration(&self, node: Node<'a>) -> Option<TypeDeclaration> {
        let kind = match node.kind() {
            "class_declaration" => TypeKind::Class,
            "record_declaration" => TypeKind::Record,
            "interface_declaration" | "annotation_type_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            _ => return None,
        };

        let name = self.text(node.child_by_field_name("name")?).to_string();
        let (annotations, modifiers) = self.modifiers(node);

        let record_components = if kind == TypeKind::Record {
            node.child_by_field_name("parameters")
                .map(|params| self.formal_parameters(params))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut decl = TypeDeclaration {
            name,
            kind,
            annotations,
            modifiers,
            fields: Vec::new(),
            methods: Vec::new(),
            record_components,
            nested: Vec::new(),
            line: Self::line(node),
        };

        if let Some(body) = node.child_by_field_name("body") {
            self.body_members(body, &mut decl);
        }

        debug!(
            "Lowered {:?} {} ({} fields, {} methods)",
            decl.kind,
            decl.name,
            decl.fields.len(),
            decl.methods.len()
        );
        Some(decl)
    }

    fn body_members(&self, body: Node<'a>, decl: &mut TypeDeclaration) {
        for member in Self::named_children(body) {
            match member.kind() {
                "field_declaration" | "constant_declaration" => {
                    if let Some(field) = self.field_declaration(member) {
                        decl.fields.push(field);
                    }
                }
                "method_declaration" => {
                    if let Some(method) = self.method_declaration(member) {
                        decl.methods.push(method);
                    }
                }
                "enum_body_declarations" => self.body_members(member, decl),
                _ => {
                    if let Some(nested) = self.type_declaration(member) {
                        decl.nested.push(nested);
                    }
                }
            }
        }
    }

    /// Annotations and keyword modifiers of a declaration.
    fn modifiers(&self, node: Node<'a>) -> (Vec<Annotation>, Vec<String>) {
        let mut annotations = Vec::new();
        let mut modifiers = Vec::new();

        let mut cursor = node.walk();
        let modifiers_node = node
            .children(&mut cursor)
            .find(|child| child.kind() == "modifiers");

        if let Some(mods) = modifiers_node {
            let mut cursor = mods.walk();
            for child in mods.children(&mut cursor) {
                match child.kind() {
                    "annotation" | "marker_annotation" => {
                        annotations.push(self.annotation(child));
                    }
                    _ if !child.is_named() => modifiers.push(child.kind().to_string()),
                    _ => {}
                }
            }
        }

        (annotations, modifiers)
    }

    fn annotation(&self, node: Node<'a>) -> Annotation {
        let name = node
            .child_by_field_name("name")
            .map(|n| simple_name(&self.compact_text(n)))
            .unwrap_or_default();

        let value = if node.kind() == "marker_annotation" {
            AnnotationValue::Absent
        } else {
            node.child_by_field_name("arguments")
                .map(|args| self.annotation_arguments(args))
                .unwrap_or(AnnotationValue::Absent)
        };

        Annotation {
            name,
            value,
            line: Self::line(node),
        }
    }

    fn annotation_arguments(&self, args: Node<'a>) -> AnnotationValue {
        let children = Self::named_children(args);
        let Some(first) = children.first() else {
            return AnnotationValue::Absent;
        };

        if first.kind() == "element_value_pair" {
            let pairs = children
                .iter()
                .filter(|child| child.kind() == "element_value_pair")
                .filter_map(|pair| {
                    let key = pair.child_by_field_name("key")?;
                    let value = pair.child_by_field_name("value")?;
                    Some(ElementValuePair {
                        name: self.text(key).to_string(),
                        value: self.element_value(value),
                    })
                })
                .collect();
            return AnnotationValue::Pairs(pairs);
        }

        match self.element_value(*first) {
            ElementValue::Literal(lit) => AnnotationValue::Literal(lit),
            ElementValue::Array(items) => AnnotationValue::Array(items),
            other => AnnotationValue::Wrapped(other),
        }
    }

    fn element_value(&self, node: Node<'a>) -> ElementValue {
        let literal = |kind| ElementValue::Literal(Literal::new(kind, self.text(node)));

        match node.kind() {
            "string_literal" => literal(LiteralKind::String),
            "character_literal" => literal(LiteralKind::Char),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal" => literal(LiteralKind::Number),
            "true" | "false" => literal(LiteralKind::Boolean),
            "null_literal" => literal(LiteralKind::Null),
            "element_value_array_initializer" | "array_initializer" => ElementValue::Array(
                Self::named_children(node)
                    .into_iter()
                    .map(|item| self.element_value(item))
                    .collect(),
            ),
            "identifier" | "field_access" | "scoped_identifier" => {
                ElementValue::Reference(self.compact_text(node))
            }
            "annotation" | "marker_annotation" => {
                ElementValue::Annotation(Box::new(self.annotation(node)))
            }
            _ => ElementValue::Expression(self.text(node).to_string()),
        }
    }

    fn type_ref(&self, node: Node<'a>) -> TypeRef {
        match node.kind() {
            "scoped_type_identifier" => {
                let mut segments = Vec::new();
                self.scoped_segments(node, &mut segments);
                TypeRef::Qualified(segments)
            }
            "generic_type" => {
                let children = Self::named_children(node);
                let base = children
                    .iter()
                    .find(|c| matches!(c.kind(), "type_identifier" | "scoped_type_identifier"))
                    .map(|c| self.type_ref(*c))
                    .unwrap_or_else(|| TypeRef::simple("Unknown"));
                let args = children
                    .iter()
                    .find(|c| c.kind() == "type_arguments")
                    .map(|targs| {
                        Self::named_children(*targs)
                            .into_iter()
                            .filter(|c| is_type_kind(c.kind()))
                            .map(|c| self.type_ref(c))
                            .collect()
                    })
                    .unwrap_or_default();
                TypeRef::Generic {
                    base: Box::new(base),
                    args,
                }
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|e| self.type_ref(e))
                    .unwrap_or_else(|| TypeRef::simple("Unknown"));
                let dimensions = node
                    .child_by_field_name("dimensions")
                    .map(|d| self.count_dimensions(d))
                    .unwrap_or(1);
                with_dimensions(element, dimensions)
            }
            "annotated_type" => Self::named_children(node)
                .into_iter()
                .filter(|c| is_type_kind(c.kind()))
                .last()
                .map(|c| self.type_ref(c))
                .unwrap_or_else(|| TypeRef::simple("Unknown")),
            "wildcard" => {
                let mut bound_kind = None;
                let mut bound_type = None;
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    match child.kind() {
                        "extends" => bound_kind = Some(WildcardBound::Extends),
                        "super" => bound_kind = Some(WildcardBound::Super),
                        kind if is_type_kind(kind) => bound_type = Some(self.type_ref(child)),
                        _ => {}
                    }
                }
                let bound = match (bound_kind, bound_type) {
                    (Some(kind), Some(ty)) => Some((kind, Box::new(ty))),
                    _ => None,
                };
                TypeRef::Wildcard { bound }
            }
            _ => TypeRef::Simple(self.compact_text(node)),
        }
    }

    fn scoped_segments(&self, node: Node<'a>, out: &mut Vec<String>) {
        for child in Self::named_children(node) {
            match child.kind() {
                "scoped_type_identifier" => self.scoped_segments(child, out),
                "type_identifier" => out.push(self.text(child).to_string()),
                "generic_type" => out.push(self.type_ref(child).base_name()),
                _ => {}
            }
        }
    }

    fn count_dimensions(&self, node: Node<'a>) -> usize {
        let mut cursor = node.walk();
        let count = node.children(&mut cursor).filter(|c| c.kind() == "[").count();
        count.max(1)
    }

    fn method_declaration(&self, node: Node<'a>) -> Option<MethodDeclaration> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let (annotations, modifiers) = self.modifiers(node);

        let return_type = node
            .child_by_field_name("type")
            .filter(|ty| ty.kind() != "void_type")
            .map(|ty| self.type_ref(ty));

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| self.formal_parameters(params))
            .unwrap_or_default();

        Some(MethodDeclaration {
            name,
            annotations,
            modifiers,
            return_type,
            parameters,
            line: Self::line(node),
        })
    }

    fn formal_parameters(&self, node: Node<'a>) -> Vec<FormalParameter> {
        let mut parameters = Vec::new();

        for child in Self::named_children(node) {
            match child.kind() {
                "formal_parameter" => {
                    let (annotations, _) = self.modifiers(child);
                    let Some(ty) = child.child_by_field_name("type") else {
                        continue;
                    };
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    let mut type_ref = self.type_ref(ty);
                    if let Some(dims) = child.child_by_field_name("dimensions") {
                        type_ref = with_dimensions(type_ref, self.count_dimensions(dims));
                    }
                    parameters.push(FormalParameter {
                        annotations,
                        type_ref,
                        name: self.text(name).to_string(),
                    });
                }
                "spread_parameter" => {
                    let (annotations, _) = self.modifiers(child);
                    let children = Self::named_children(child);
                    let ty = children.iter().find(|c| is_type_kind(c.kind()));
                    let name = children
                        .iter()
                        .find(|c| c.kind() == "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"));
                    if let (Some(ty), Some(name)) = (ty, name) {
                        parameters.push(FormalParameter {
                            annotations,
                            type_ref: with_dimensions(self.type_ref(*ty), 1),
                            name: self.text(name).to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        parameters
    }

    fn field_declaration(&self, node: Node<'a>) -> Option<FieldDeclaration> {
        let (annotations, modifiers) = self.modifiers(node);
        let type_ref = self.type_ref(node.child_by_field_name("type")?);

        let mut cursor = node.walk();
        let declarator_nodes: Vec<Node<'a>> =
            node.children_by_field_name("declarator", &mut cursor).collect();

        let declarators = declarator_nodes
            .into_iter()
            .filter_map(|declarator| {
                let name = declarator.child_by_field_name("name")?;
                Some(VariableDeclarator {
                    name: self.text(name).to_string(),
                    dimensions: declarator
                        .child_by_field_name("dimensions")
                        .map(|d| self.count_dimensions(d))
                        .unwrap_or(0),
                    initializer: declarator
                        .child_by_field_name("value")
                        .map(|value| self.element_value(value)),
                })
            })
            .collect();

        Some(FieldDeclaration {
            annotations,
            modifiers,
            type_ref,
            declarators,
            line: Self::line(node),
        })
    }
}

/// Wraps a type in array dimensions, merging with dimensions it already has.
pub(crate) fn with_dimensions(type_ref: TypeRef, dimensions: usize) -> TypeRef {
    if dimensions == 0 {
        return type_ref;
    }
    match type_ref {
        TypeRef::Array {
            element,
            dimensions: existing,
        } => TypeRef::Array {
            element,
            dimensions: existing + dimensions,
        },
        other => TypeRef::Array {
            element: Box::new(other),
            dimensions,
        },
    }
}
