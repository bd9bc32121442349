//! Declaration model produced by the front-end parser.
//!
//! The analysis stages never look at the concrete syntax tree. The [`parser`](crate::parser)
//! lowers every Java file into the small set of types defined here, which carry exactly the
//! information the classifier, the extractors and the schema extractor need: declarations,
//! their annotations, their type references and their source lines.

use std::path::PathBuf;

/// A parsed Java source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Path of the file this unit was parsed from
    pub path: PathBuf,
    /// Declared package, empty for the default package
    pub package: String,
    /// Top-level type declarations, in source order
    pub types: Vec<TypeDeclaration>,
}

impl CompilationUnit {
    /// Iterates over every type declaration in the unit, nested ones included, depth-first.
    pub fn all_types(&self) -> Vec<&TypeDeclaration> {
        let mut out = Vec::new();
        for ty in &self.types {
            ty.collect_into(&mut out);
        }
        out
    }

    /// Fully qualified name of a type declared in this unit.
    pub fn qualified_name(&self, type_name: &str) -> String {
        if self.package.is_empty() {
            type_name.to_string()
        } else {
            format!("{}.{}", self.package, type_name)
        }
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Record,
    Interface,
    Enum,
}

/// A class, record, interface or enum declaration.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<String>,
    pub fields: Vec<FieldDeclaration>,
    pub methods: Vec<MethodDeclaration>,
    /// Components of a record header; empty for every other kind
    pub record_components: Vec<FormalParameter>,
    pub nested: Vec<TypeDeclaration>,
    /// 1-based line of the declaration
    pub line: usize,
}

impl TypeDeclaration {
    fn collect_into<'a>(&'a self, out: &mut Vec<&'a TypeDeclaration>) {
        out.push(self);
        for nested in &self.nested {
            nested.collect_into(out);
        }
    }

    /// Simple names of the annotations placed directly on this declaration.
    pub fn annotation_names(&self) -> Vec<&str> {
        self.annotations.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

/// A field declaration. One declaration may introduce several members of the same type.
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<String>,
    pub type_ref: TypeRef,
    pub declarators: Vec<VariableDeclarator>,
    pub line: usize,
}

impl FieldDeclaration {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

/// One `name [= initializer]` entry of a field declaration.
#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub name: String,
    /// Extra `[]` written after the name (`int values[]`)
    pub dimensions: usize,
    pub initializer: Option<ElementValue>,
}

/// A method declaration. Constructors are not represented.
#[derive(Debug, Clone)]
pub struct MethodDeclaration {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<String>,
    /// `None` when the method is declared `void`
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<FormalParameter>,
    pub line: usize,
}

impl MethodDeclaration {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

/// A method parameter or a record component.
#[derive(Debug, Clone)]
pub struct FormalParameter {
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
}

/// An annotation as written on a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Simple name; qualified names are reduced to their last segment
    pub name: String,
    pub value: AnnotationValue,
    pub line: usize,
}

/// The payload of an annotation.
///
/// Annotation metadata shows up in several structurally different shapes. They are all
/// normalized into this one type by the parser and consumed through
/// [`annotation_value::resolve`](crate::annotation_value::resolve). A new payload shape is
/// added here, never special-cased inside an extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Marker form: `@Component`, `@Scheduled()`
    Absent,
    /// Single implicit parameter given as a literal: `@Path("/orders")`
    Literal(Literal),
    /// Explicit `name = value` pairs: `@KafkaListener(topics = "t", groupId = "g")`
    Pairs(Vec<ElementValuePair>),
    /// Single implicit parameter given as an array: `@Secured({"ADMIN", "OPS"})`
    Array(Vec<ElementValue>),
    /// Single implicit parameter that is neither a literal nor an array:
    /// `@RequestMapping(Routes.ORDERS)`, `@Repeatable(@Other)`
    Wrapped(ElementValue),
}

/// A `name = value` entry in an annotation argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
    pub name: String,
    pub value: ElementValue,
}

/// A value appearing inside an annotation argument list or as a field initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Literal(Literal),
    Array(Vec<ElementValue>),
    /// A name or a dotted name: `TRUE`, `RequestMethod.POST`
    Reference(String),
    Annotation(Box<Annotation>),
    /// Any other expression, kept as source text
    Expression(String),
}

impl ElementValue {
    /// Source-like rendering used in descriptive strings.
    pub fn to_source(&self) -> String {
        match self {
            ElementValue::Literal(lit) => lit.raw.clone(),
            ElementValue::Array(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.to_source()).collect();
                format!("{{{}}}", inner.join(", "))
            }
            ElementValue::Reference(name) => name.clone(),
            ElementValue::Annotation(ann) => format!("@{}", ann.name),
            ElementValue::Expression(text) => text.clone(),
        }
    }

    /// Value as plain text: literals unquoted, everything else as source.
    pub fn to_plain(&self) -> String {
        match self {
            ElementValue::Literal(lit) => lit.value(),
            other => other.to_source(),
        }
    }
}

/// Category of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Char,
    Number,
    Boolean,
    Null,
}

/// A literal as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Source text, quotes included
    pub raw: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    /// Literal value with surrounding quotes removed and simple escapes resolved.
    pub fn value(&self) -> String {
        match self.kind {
            LiteralKind::String => {
                let inner = if self.raw.starts_with("\"\"\"") && self.raw.len() >= 6 {
                    self.raw[3..self.raw.len() - 3].trim()
                } else {
                    self.raw.trim_matches('"')
                };
                unescape(inner)
            }
            LiteralKind::Char => unescape(self.raw.trim_matches('\'')),
            _ => self.raw.clone(),
        }
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A reference to a type as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `String`, `int`, `T`
    Simple(String),
    /// `java.math.BigDecimal`
    Qualified(Vec<String>),
    /// `Map<String, List<Item>>`
    Generic { base: Box<TypeRef>, args: Vec<TypeRef> },
    /// `byte[]`, `String[][]`
    Array { element: Box<TypeRef>, dimensions: usize },
    /// `?`, `? extends Number`, `? super T`
    Wildcard { bound: Option<(WildcardBound, Box<TypeRef>)> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardBound {
    Extends,
    Super,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeRef::Simple(name.into())
    }

    /// Simple name of the outermost type, ignoring type arguments and array dimensions.
    pub fn base_name(&self) -> String {
        match self {
            TypeRef::Simple(name) => name.clone(),
            TypeRef::Qualified(parts) => parts.last().cloned().unwrap_or_default(),
            TypeRef::Generic { base, .. } => base.base_name(),
            TypeRef::Array { element, .. } => element.base_name(),
            TypeRef::Wildcard { bound } => match bound {
                Some((_, ty)) => ty.base_name(),
                None => "?".to_string(),
            },
        }
    }

    /// Type arguments of a generic instantiation, empty otherwise.
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Generic { args, .. } => args,
            _ => &[],
        }
    }
}
