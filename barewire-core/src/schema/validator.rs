//! Schema validation: cycle detection and structural invariants.
//!
//! The validator accumulates every violation it finds rather than stopping
//! at the first one; callers either get a clean pass or the complete list.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::model::SchemaType;
use crate::platform::TypeKind;

/// A validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The type of error.
    pub kind: ValidationErrorKind,
    /// The location in the schema (e.g., "Order.items.key").
    pub location: String,
    /// Human-readable error message.
    pub message: String,
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The designated root name does not resolve.
    MissingRoot,
    /// A type reference names an undefined type.
    UndefinedType,
    /// A cycle exists in the type-reference graph.
    CyclicTypeReference,
    /// Void used outside a union case payload.
    InvalidVoidUsage,
    /// An enum with no variants.
    EmptyEnum,
    /// A union with no cases.
    EmptyUnion,
    /// A struct with no fields.
    EmptyStruct,
    /// A map key that is not a plain non-float, non-void primitive.
    InvalidMapKeyType,
    /// A fixed list or fixed data length that is not positive.
    InvalidFixedLength,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingRoot => "MISSING_ROOT",
            Self::UndefinedType => "UNDEFINED_TYPE",
            Self::CyclicTypeReference => "CYCLIC_TYPE_REFERENCE",
            Self::InvalidVoidUsage => "INVALID_VOID_USAGE",
            Self::EmptyEnum => "EMPTY_ENUM",
            Self::EmptyUnion => "EMPTY_UNION",
            Self::EmptyStruct => "EMPTY_STRUCT",
            Self::InvalidMapKeyType => "INVALID_MAP_KEY_TYPE",
            Self::InvalidFixedLength => "INVALID_FIXED_LENGTH",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        kind: ValidationErrorKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a missing-root error.
    pub fn missing_root() -> Self {
        Self::new(
            ValidationErrorKind::MissingRoot,
            "root",
            "schema has no root type",
        )
    }

    /// Create an undefined-type error.
    pub fn undefined_type(location: impl Into<String>, name: &str) -> Self {
        Self::new(
            ValidationErrorKind::UndefinedType,
            location,
            format!("reference to undefined type `{}`", name),
        )
    }

    /// Create a cyclic-reference error.
    pub fn cyclic(location: impl Into<String>, name: &str) -> Self {
        Self::new(
            ValidationErrorKind::CyclicTypeReference,
            location,
            format!("type `{}` participates in a reference cycle", name),
        )
    }
}

/// One step in the structural walk, used to render error locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// The named type being walked.
    TypeRoot(String),
    /// A struct field.
    StructField(String),
    /// A union case payload.
    UnionCase(u32),
    /// The payload of an optional.
    OptionalValue,
    /// A list or fixed-list element.
    ListItem,
    /// A map key.
    MapKey,
    /// A map value.
    MapValue,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeRoot(name) => write!(f, "{}", name),
            Self::StructField(name) => write!(f, ".{}", name),
            Self::UnionCase(tag) => write!(f, ".union[{}]", tag),
            Self::OptionalValue => write!(f, ".some"),
            Self::ListItem => write!(f, ".item"),
            Self::MapKey => write!(f, ".key"),
            Self::MapValue => write!(f, ".value"),
        }
    }
}

fn render_path(path: &[PathSegment]) -> String {
    path.iter().map(|s| s.to_string()).collect()
}

/// Result of a validation run: clean, or the complete error list.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validator for schema type maps.
pub struct SchemaValidator {
    errors: Vec<ValidationError>,
}

impl SchemaValidator {
    /// Create a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Validate a type map against a designated root.
    pub fn validate(mut self, types: &BTreeMap<String, SchemaType>, root: &str) -> ValidationResult {
        if !types.contains_key(root) {
            self.add_error(ValidationError::undefined_type("root", root));
        }

        self.detect_cycles(types);

        for (name, ty) in types {
            let mut path = vec![PathSegment::TypeRoot(name.clone())];
            self.check_invariants(ty, &mut path);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(errors = self.errors.len(), "schema validation failed");
            Err(self.errors)
        }
    }

    fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    // =========================================================================
    // Phase 1: cycle detection over TypeRef edges
    // =========================================================================

    fn detect_cycles(&mut self, types: &BTreeMap<String, SchemaType>) {
        let mut visited: HashSet<String> = HashSet::new();
        for name in types.keys() {
            let mut path: Vec<String> = Vec::new();
            self.visit_named(name, types, &mut path, &mut visited);
        }
    }

    fn visit_named(
        &mut self,
        name: &str,
        types: &BTreeMap<String, SchemaType>,
        path: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) {
        if path.iter().any(|p| p == name) {
            self.add_error(ValidationError::cyclic(path.join(" -> "), name));
            return;
        }
        if visited.contains(name) {
            // Completed subtrees are known acyclic.
            return;
        }
        path.push(name.to_string());
        if let Some(ty) = types.get(name) {
            self.visit_refs(ty, types, path, visited);
        }
        path.pop();
        visited.insert(name.to_string());
    }

    fn visit_refs(
        &mut self,
        ty: &SchemaType,
        types: &BTreeMap<String, SchemaType>,
        path: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) {
        match ty {
            SchemaType::TypeRef(target) => {
                if types.contains_key(target) {
                    self.visit_named(target, types, path, visited);
                } else {
                    self.add_error(ValidationError::undefined_type(path.join(" -> "), target));
                }
            }
            SchemaType::Optional(inner) | SchemaType::List(inner) => {
                self.visit_refs(inner, types, path, visited);
            }
            SchemaType::FixedList { element, .. } => {
                self.visit_refs(element, types, path, visited);
            }
            SchemaType::Map { key, value } => {
                self.visit_refs(key, types, path, visited);
                self.visit_refs(value, types, path, visited);
            }
            SchemaType::Union { cases } => {
                for case in cases.values() {
                    self.visit_refs(case, types, path, visited);
                }
            }
            SchemaType::Struct { fields } => {
                for field in fields {
                    self.visit_refs(&field.ty, types, path, visited);
                }
            }
            SchemaType::Primitive { .. } | SchemaType::FixedData { .. } | SchemaType::Enum { .. } => {}
        }
    }

    // =========================================================================
    // Phase 2: structural invariants with breadcrumb locations
    // =========================================================================

    fn check_invariants(&mut self, ty: &SchemaType, path: &mut Vec<PathSegment>) {
        match ty {
            SchemaType::Primitive { kind, .. } => {
                if *kind == TypeKind::Unit && !self.inside_union_case(path) {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::InvalidVoidUsage,
                        render_path(path),
                        "void is only legal as a union case payload",
                    ));
                }
            }
            SchemaType::FixedData { length } => {
                if *length == 0 {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::InvalidFixedLength,
                        render_path(path),
                        "fixed data length must be positive",
                    ));
                }
            }
            SchemaType::Enum { variants, .. } => {
                if variants.is_empty() {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::EmptyEnum,
                        render_path(path),
                        "enum must have at least one variant",
                    ));
                }
            }
            SchemaType::Optional(inner) => {
                path.push(PathSegment::OptionalValue);
                self.check_invariants(inner, path);
                path.pop();
            }
            SchemaType::List(element) => {
                path.push(PathSegment::ListItem);
                self.check_invariants(element, path);
                path.pop();
            }
            SchemaType::FixedList { element, length } => {
                if *length == 0 {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::InvalidFixedLength,
                        render_path(path),
                        "fixed list length must be positive",
                    ));
                }
                path.push(PathSegment::ListItem);
                self.check_invariants(element, path);
                path.pop();
            }
            SchemaType::Map { key, value } => {
                if !is_valid_map_key(key) {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::InvalidMapKeyType,
                        render_path(path),
                        format!("`{}` cannot be a map key", key),
                    ));
                }
                path.push(PathSegment::MapKey);
                self.check_invariants(key, path);
                path.pop();
                path.push(PathSegment::MapValue);
                self.check_invariants(value, path);
                path.pop();
            }
            SchemaType::Union { cases } => {
                if cases.is_empty() {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::EmptyUnion,
                        render_path(path),
                        "union must have at least one case",
                    ));
                }
                for (tag, case) in cases {
                    path.push(PathSegment::UnionCase(*tag));
                    self.check_invariants(case, path);
                    path.pop();
                }
            }
            SchemaType::Struct { fields } => {
                if fields.is_empty() {
                    self.add_error(ValidationError::new(
                        ValidationErrorKind::EmptyStruct,
                        render_path(path),
                        "struct must have at least one field",
                    ));
                }
                for field in fields {
                    path.push(PathSegment::StructField(field.name.clone()));
                    self.check_invariants(&field.ty, path);
                    path.pop();
                }
            }
            // Reference targets are checked as their own roots; resolution
            // errors were already collected by the cycle pass.
            SchemaType::TypeRef(_) => {}
        }
    }

    fn inside_union_case(&self, path: &[PathSegment]) -> bool {
        path.iter().any(|s| matches!(s, PathSegment::UnionCase(_)))
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Map keys must be plain primitives other than floats and void; fixed data,
/// aggregates, and references are never keys.
fn is_valid_map_key(key: &SchemaType) -> bool {
    match key {
        SchemaType::Primitive { kind, .. } => {
            !matches!(kind, TypeKind::F32 | TypeKind::F64 | TypeKind::Unit)
        }
        _ => false,
    }
}
