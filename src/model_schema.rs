//! Payload schemas for request body types.
//!
//! Given a type name, the [`ModelSchemaExtractor`] locates the file declaring it, parses it
//! and describes each field: canonical type, required flag, validation tags, default value and
//! collection shape. Classes without explicit fields get their fields inferred from accessor
//! methods; record components are always required.
//!
//! Declaration lookup is delegated to [`DeclarationLocator`] strategies tried in order. The
//! default pair is a file-name index ([`FileNameIndex`]) backed by a linear text scan
//! ([`TextScan`]).

use crate::annotation_value::describe_annotation;
use crate::ast::{
    Annotation, CompilationUnit, FieldDeclaration, FormalParameter, TypeDeclaration, TypeKind,
    TypeRef,
};
use crate::extractor::EntryPoint;
use crate::parameters::ParamType;
use crate::parser::{with_dimensions, AstParser};
use crate::type_string::canonical;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Validation tags whose presence makes a field mandatory.
pub const REQUIRED_ANNOTATIONS: &[&str] = &["NotNull", "NotEmpty", "NotBlank", "NonNull"];

/// Every validation tag preserved on a field.
pub const VALIDATION_ANNOTATIONS: &[&str] = &[
    "NotNull",
    "NotEmpty",
    "NotBlank",
    "NonNull",
    "Size",
    "Min",
    "Max",
    "Range",
    "Email",
    "Pattern",
    "URL",
    "Positive",
    "PositiveOrZero",
    "Negative",
    "NegativeOrZero",
    "Past",
    "PastOrPresent",
    "Future",
    "FutureOrPresent",
    "Digits",
    "DecimalMin",
    "DecimalMax",
    "Valid",
];

const COLLECTION_TYPES: &[&str] = &[
    "List",
    "Set",
    "Collection",
    "ArrayList",
    "HashSet",
    "LinkedList",
];
const MAP_TYPES: &[&str] = &["Map", "HashMap", "LinkedHashMap", "TreeMap"];

/// Built-in names never resolved to a schema.
const EXCLUDED_TYPES: &[&str] = &["Object", "String", "Map", "Void", "void"];

/// One field of a payload type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub validations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// `List`, `Set`, `Map`, `Array`, ... for container-typed fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_kind: Option<String>,
    /// Element type of a collection or array, value type of a map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
}

impl FieldSchema {
    fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            validations: Vec::new(),
            default_value: None,
            collection_kind: None,
            element_type: None,
        }
    }
}

/// Structural description of a payload type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSchema {
    pub class_name: String,
    pub package_name: String,
    pub fields: Vec<FieldSchema>,
    pub file_path: PathBuf,
}

/// Strategy for finding the file that declares a type.
pub trait DeclarationLocator {
    /// Short label used in log output.
    fn name(&self) -> &'static str;

    /// Candidate file for the simple type name, if this strategy knows one.
    fn locate(&self, type_name: &str) -> Option<PathBuf>;
}

/// Looks types up by file name: `Order` is expected in `Order.java`.
pub struct FileNameIndex {
    index: HashMap<String, PathBuf>,
}

impl FileNameIndex {
    /// Builds the index once. When two files share a stem, the first one wins.
    pub fn new(files: &[PathBuf]) -> Self {
        let mut index = HashMap::new();
        for file in files {
            if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
                index.entry(stem.to_string()).or_insert_with(|| file.clone());
            }
        }
        debug!("Indexed {} source files by name", index.len());
        Self { index }
    }
}

impl DeclarationLocator for FileNameIndex {
    fn name(&self) -> &'static str {
        "file name index"
    }

    fn locate(&self, type_name: &str) -> Option<PathBuf> {
        self.index.get(type_name).cloned()
    }
}

/// Reads every file looking for `class Name` or `record Name`.
pub struct TextScan {
    files: Vec<PathBuf>,
}

impl TextScan {
    pub fn new(files: &[PathBuf]) -> Self {
        Self {
            files: files.to_vec(),
        }
    }
}

impl DeclarationLocator for TextScan {
    fn name(&self) -> &'static str {
        "text scan"
    }

    fn locate(&self, type_name: &str) -> Option<PathBuf> {
        self.files
            .iter()
            .find(|file| match fs::read_to_string(file) {
                Ok(content) => declares(&content, type_name),
                Err(e) => {
                    debug!("Skipping unreadable {}: {}", file.display(), e);
                    false
                }
            })
            .cloned()
    }
}

/// True when `content` contains `class Name` or `record Name` not followed by another
/// identifier character.
fn declares(content: &str, type_name: &str) -> bool {
    ["class ", "record "].iter().any(|keyword| {
        let needle = format!("{}{}", keyword, type_name);
        content.match_indices(&needle).any(|(idx, _)| {
            content[idx + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'))
        })
    })
}

/// Resolves type names to model schemas, caching every successful lookup.
pub struct ModelSchemaExtractor {
    locators: Vec<Box<dyn DeclarationLocator>>,
    cache: HashMap<String, ModelSchema>,
}

impl ModelSchemaExtractor {
    /// Creates an extractor over the given source files with the default lookup strategies.
    pub fn new(files: &[PathBuf]) -> Self {
        Self::with_locators(vec![
            Box::new(FileNameIndex::new(files)),
            Box::new(TextScan::new(files)),
        ])
    }

    pub fn with_locators(locators: Vec<Box<dyn DeclarationLocator>>) -> Self {
        Self {
            locators,
            cache: HashMap::new(),
        }
    }

    /// Number of schemas resolved so far.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Resolves a type by simple or qualified name.
    ///
    /// Repeated requests for the same simple name return the cached schema without touching
    /// the file system again.
    pub fn resolve(&mut self, type_name: &str) -> Option<&ModelSchema> {
        let simple = type_name.rsplit('.').next().unwrap_or(type_name);

        if !self.cache.contains_key(simple) {
            let schema = self.load(simple)?;
            debug!(
                "Resolved schema for {} ({} fields)",
                simple,
                schema.fields.len()
            );
            self.cache.insert(simple.to_string(), schema);
        }

        self.cache.get(simple)
    }

    /// Resolves the types of every body-bound parameter of the given entry points.
    ///
    /// Collection-typed bodies resolve through their element type. Built-in placeholder names
    /// and type variables are skipped.
    pub fn schemas_for_entry_points(
        &mut self,
        entry_points: &[EntryPoint],
    ) -> BTreeMap<String, ModelSchema> {
        let mut wanted: Vec<String> = Vec::new();
        let mut seen = HashSet::new();

        for ep in entry_points {
            for param in ep.details.parameters() {
                if param.param_type != ParamType::Body {
                    continue;
                }
                if let Some(name) = payload_type(&param.type_name) {
                    if seen.insert(name.clone()) {
                        wanted.push(name);
                    }
                }
            }
        }

        info!("Resolving schemas for {} body types", wanted.len());

        let mut schemas = BTreeMap::new();
        for name in wanted {
            match self.resolve(&name) {
                Some(schema) => {
                    schemas.insert(name, schema.clone());
                }
                None => debug!("No declaration found for {}", name),
            }
        }
        schemas
    }

    fn load(&self, simple: &str) -> Option<ModelSchema> {
        for locator in &self.locators {
            let Some(path) = locator.locate(simple) else {
                continue;
            };
            debug!("{} located {} in {}", locator.name(), simple, path.display());

            let unit = match AstParser::parse_file(&path) {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("Could not parse {} for schema: {}", path.display(), e);
                    continue;
                }
            };

            let declaration = unit.all_types().into_iter().find(|ty| {
                ty.name == simple && matches!(ty.kind, TypeKind::Class | TypeKind::Record)
            });
            if let Some(declaration) = declaration {
                return Some(schema_of(&unit, declaration, &path));
            }
        }
        None
    }
}

fn schema_of(unit: &CompilationUnit, declaration: &TypeDeclaration, path: &Path) -> ModelSchema {
    let fields = if declaration.kind == TypeKind::Record {
        declaration
            .record_components
            .iter()
            .map(record_component_schema)
            .collect()
    } else {
        let explicit: Vec<FieldSchema> = declaration
            .fields
            .iter()
            .filter(|field| !field.is_static())
            .flat_map(field_schemas)
            .collect();
        if explicit.is_empty() {
            infer_from_accessors(declaration)
        } else {
            explicit
        }
    };

    ModelSchema {
        class_name: declaration.name.clone(),
        package_name: unit.package.clone(),
        fields,
        file_path: path.to_path_buf(),
    }
}

/// One schema per declarator: `int a, b;` yields two fields.
fn field_schemas(field: &FieldDeclaration) -> Vec<FieldSchema> {
    field
        .declarators
        .iter()
        .map(|declarator| {
            let type_ref = with_dimensions(field.type_ref.clone(), declarator.dimensions);
            let mut schema = FieldSchema::new(&declarator.name, canonical(Some(&type_ref)));
            apply_shape(&mut schema, &type_ref);
            apply_validations(&mut schema, &field.annotations);
            schema.default_value = declarator.initializer.as_ref().map(|v| v.to_plain());
            schema
        })
        .collect()
}

fn record_component_schema(component: &FormalParameter) -> FieldSchema {
    let mut schema = FieldSchema::new(&component.name, canonical(Some(&component.type_ref)));
    apply_shape(&mut schema, &component.type_ref);
    apply_validations(&mut schema, &component.annotations);
    schema.required = true;
    schema
}

fn apply_validations(schema: &mut FieldSchema, annotations: &[Annotation]) {
    for ann in annotations {
        if REQUIRED_ANNOTATIONS.contains(&ann.name.as_str()) {
            schema.required = true;
        }
        if VALIDATION_ANNOTATIONS.contains(&ann.name.as_str()) {
            schema.validations.push(describe_annotation(ann));
        }
    }
}

fn apply_shape(schema: &mut FieldSchema, type_ref: &TypeRef) {
    if let Some((kind, element)) = collection_shape(type_ref) {
        schema.collection_kind = Some(kind);
        schema.element_type = Some(element);
    }
}

/// Container kind and element type of collection, map and array types.
fn collection_shape(type_ref: &TypeRef) -> Option<(String, String)> {
    if let TypeRef::Array {
        element,
        dimensions,
    } = type_ref
    {
        let component = with_dimensions((**element).clone(), dimensions.saturating_sub(1));
        return Some(("Array".to_string(), canonical(Some(&component))));
    }

    let base = type_ref.base_name();
    let args = type_ref.type_args();
    let element = if COLLECTION_TYPES.contains(&base.as_str()) {
        args.first()
    } else if MAP_TYPES.contains(&base.as_str()) {
        args.get(1)
    } else {
        return None;
    };

    let element = element
        .map(|ty| canonical(Some(ty)))
        .unwrap_or_else(|| "Object".to_string());
    Some((base, element))
}

/// Infers fields from `getX()` / `isX()` accessors.
fn infer_from_accessors(declaration: &TypeDeclaration) -> Vec<FieldSchema> {
    let mut fields = Vec::new();
    let mut seen = HashSet::new();

    for method in &declaration.methods {
        let (property, type_name) = if let Some(rest) = accessor_suffix(&method.name, "get") {
            let type_name = method
                .return_type
                .as_ref()
                .map(|ty| canonical(Some(ty)))
                .unwrap_or_else(|| "Object".to_string());
            (rest, type_name)
        } else if let Some(rest) = accessor_suffix(&method.name, "is") {
            (rest, "boolean".to_string())
        } else {
            continue;
        };

        let name = decapitalize(property);
        if seen.insert(name.clone()) {
            fields.push(FieldSchema::new(name, type_name));
        }
    }

    debug!(
        "Inferred {} fields from accessors of {}",
        fields.len(),
        declaration.name
    );
    fields
}

fn accessor_suffix<'a>(method_name: &'a str, prefix: &str) -> Option<&'a str> {
    method_name
        .strip_prefix(prefix)
        .filter(|rest| rest.chars().next().is_some_and(char::is_uppercase))
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Type whose schema describes a body of the given canonical type.
fn payload_type(type_name: &str) -> Option<String> {
    let type_name = type_name.trim().trim_end_matches("[]");

    let name = match type_name.find('<') {
        Some(open) if type_name.ends_with('>') => {
            let base = &type_name[..open];
            let args = split_type_args(&type_name[open + 1..type_name.len() - 1]);
            if COLLECTION_TYPES.contains(&base) {
                return args.first().and_then(|arg| payload_type(arg));
            }
            if MAP_TYPES.contains(&base) {
                return args.get(1).and_then(|arg| payload_type(arg));
            }
            base.to_string()
        }
        _ => type_name.to_string(),
    };

    let is_type_variable = name.len() == 1 && name.chars().all(|c| c.is_ascii_uppercase());
    if name.is_empty() || is_type_variable || EXCLUDED_TYPES.contains(&name.as_str()) {
        return None;
    }
    Some(name)
}

/// Splits `A, B<C, D>` into its top-level arguments.
fn split_type_args(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in args.chars() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}
