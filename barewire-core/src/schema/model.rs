//! Schema model: the algebraic representation of BARE types.
//!
//! A schema is built additively through [`SchemaBuilder`] and becomes an
//! immutable [`Schema`] only after the validator accepts it. There is no
//! mutation API on a built schema, so derived caches (sizes, layouts) can
//! never observe a type changing underneath them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::validator::{SchemaValidator, ValidationError};
use crate::error::{BareError, Result};
use crate::platform::TypeKind;

/// How a primitive is represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireEncoding {
    /// Little-endian fixed-width bytes.
    Fixed,
    /// ULEB128 (zigzag-mapped first when signed).
    VarInt,
    /// Varint byte length followed by that many payload bytes.
    LengthPrefixed,
}

/// A BARE schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaType {
    /// A primitive of the given kind with an explicit wire encoding.
    Primitive {
        /// The host type kind.
        kind: TypeKind,
        /// How the value is laid out on the wire.
        encoding: WireEncoding,
    },
    /// Exactly `length` raw bytes, no length prefix.
    FixedData {
        /// Number of bytes; must be positive.
        length: usize,
    },
    /// Named integer constants over a backing integer kind.
    Enum {
        /// The backing integer kind.
        base: TypeKind,
        /// Variant name to numeric value.
        variants: BTreeMap<String, u64>,
    },
    /// A value that may be absent.
    Optional(Box<SchemaType>),
    /// A length-prefixed sequence of values.
    List(Box<SchemaType>),
    /// Exactly `length` values, no length prefix.
    FixedList {
        /// The element type.
        element: Box<SchemaType>,
        /// Number of elements; must be positive.
        length: usize,
    },
    /// A length-prefixed sequence of key/value pairs.
    Map {
        /// The key type; must be a non-float, non-void primitive.
        key: Box<SchemaType>,
        /// The value type.
        value: Box<SchemaType>,
    },
    /// A tagged union; tags are unique but not required to be dense.
    Union {
        /// Case tag to payload type.
        cases: BTreeMap<u32, SchemaType>,
    },
    /// An ordered sequence of named fields; order is part of type identity.
    Struct {
        /// The fields in declaration order.
        fields: Vec<StructField>,
    },
    /// A reference to a named type in the owning schema.
    TypeRef(String),
}

impl SchemaType {
    /// A fixed-width primitive of the given kind.
    #[must_use]
    pub fn fixed(kind: TypeKind) -> Self {
        Self::Primitive {
            kind,
            encoding: WireEncoding::Fixed,
        }
    }

    /// A varint-encoded primitive of the given kind.
    #[must_use]
    pub fn varint(kind: TypeKind) -> Self {
        Self::Primitive {
            kind,
            encoding: WireEncoding::VarInt,
        }
    }

    /// The UTF-8 string type.
    #[must_use]
    pub fn string() -> Self {
        Self::Primitive {
            kind: TypeKind::Str,
            encoding: WireEncoding::LengthPrefixed,
        }
    }

    /// The variable-length byte blob type.
    #[must_use]
    pub fn data() -> Self {
        Self::Primitive {
            kind: TypeKind::Bytes,
            encoding: WireEncoding::LengthPrefixed,
        }
    }

    /// The unit (void) type, for tag-only union cases.
    #[must_use]
    pub fn unit() -> Self {
        Self::Primitive {
            kind: TypeKind::Unit,
            encoding: WireEncoding::Fixed,
        }
    }

    /// An optional wrapper around `inner`.
    #[must_use]
    pub fn optional(inner: SchemaType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// A list of `element` values.
    #[must_use]
    pub fn list(element: SchemaType) -> Self {
        Self::List(Box::new(element))
    }

    /// A fixed-length list of `element` values.
    #[must_use]
    pub fn fixed_list(element: SchemaType, length: usize) -> Self {
        Self::FixedList {
            element: Box::new(element),
            length,
        }
    }

    /// A map from `key` to `value`.
    #[must_use]
    pub fn map(key: SchemaType, value: SchemaType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// A union over the given tagged cases.
    #[must_use]
    pub fn union(cases: impl IntoIterator<Item = (u32, SchemaType)>) -> Self {
        Self::Union {
            cases: cases.into_iter().collect(),
        }
    }

    /// A struct over the given fields.
    #[must_use]
    pub fn record(fields: impl IntoIterator<Item = StructField>) -> Self {
        Self::Struct {
            fields: fields.into_iter().collect(),
        }
    }

    /// An enum over the given named constants.
    #[must_use]
    pub fn enumeration<N, I>(base: TypeKind, variants: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u64)>,
    {
        Self::Enum {
            base,
            variants: variants.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    /// A reference to the named type.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::TypeRef(name.into())
    }

    /// Check if this type is the unit (void) primitive.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(
            self,
            Self::Primitive {
                kind: TypeKind::Unit,
                ..
            }
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { kind, encoding } => match encoding {
                WireEncoding::VarInt => write!(f, "varint<{}>", kind),
                _ => write!(f, "{}", kind),
            },
            Self::FixedData { length } => write!(f, "data[{}]", length),
            Self::Enum { base, variants } => write!(f, "enum<{}>({} variants)", base, variants.len()),
            Self::Optional(inner) => write!(f, "optional<{}>", inner),
            Self::List(element) => write!(f, "list<{}>", element),
            Self::FixedList { element, length } => write!(f, "list<{}>[{}]", element, length),
            Self::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            Self::Union { cases } => write!(f, "union({} cases)", cases.len()),
            Self::Struct { fields } => write!(f, "struct({} fields)", fields.len()),
            Self::TypeRef(name) => write!(f, "{}", name),
        }
    }
}

/// A named field within a struct type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    /// The field name.
    pub name: String,
    /// The field type.
    pub ty: SchemaType,
}

impl StructField {
    /// Create a new struct field.
    pub fn new(name: impl Into<String>, ty: SchemaType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A validated, immutable schema: named types plus a designated root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    types: BTreeMap<String, SchemaType>,
    root: String,
}

impl Schema {
    /// Start building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Resolve a type name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// The name of the root type.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// The root type. Guaranteed to resolve on a validated schema.
    #[must_use]
    pub fn root_type(&self) -> &SchemaType {
        &self.types[&self.root]
    }

    /// Iterate over the defined types in name order.
    pub fn types(&self) -> impl Iterator<Item = (&str, &SchemaType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of defined types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the schema defines no types (never true once validated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Convert to the serializable document form.
    #[must_use]
    pub fn to_document(&self) -> SchemaDocument {
        SchemaDocument {
            types: self.types.clone(),
            root: self.root.clone(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BareError::invalid_value(format!("failed to serialize schema: {}", e)))
    }

    /// Parse and validate a schema from its JSON document form.
    pub fn from_json(input: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(input)
            .map_err(|e| BareError::invalid_value(format!("failed to parse schema: {}", e)))?;
        document.into_schema().map_err(validation_failure)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, ty) in &self.types {
            writeln!(f, "type {} = {}", name, ty)?;
        }
        writeln!(f, "root {}", self.root)
    }
}

/// Additive schema construction.
///
/// Adding a type under an existing name overwrites the previous definition;
/// `build` runs the validator and is the only way to obtain a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: BTreeMap<String, SchemaType>,
    root: Option<String>,
}

impl SchemaBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named type, replacing any previous definition of the name.
    #[must_use]
    pub fn add_type(mut self, name: impl Into<String>, ty: SchemaType) -> Self {
        self.types.insert(name.into(), ty);
        self
    }

    /// Designate the root type.
    #[must_use]
    pub fn root(mut self, name: impl Into<String>) -> Self {
        self.root = Some(name.into());
        self
    }

    /// Validate and freeze the schema.
    ///
    /// Returns the complete list of violations on failure; errors are
    /// accumulated, never reported one at a time.
    pub fn build(self) -> std::result::Result<Schema, Vec<ValidationError>> {
        let root = match self.root {
            Some(root) => root,
            None => return Err(vec![ValidationError::missing_root()]),
        };
        SchemaValidator::new().validate(&self.types, &root)?;
        tracing::debug!(
            types = self.types.len(),
            root = %root,
            "schema validated"
        );
        Ok(Schema {
            types: self.types,
            root,
        })
    }
}

/// Serializable document form of a schema.
///
/// Deserialization yields a document, not a schema: `into_schema` re-runs the
/// validator so that no unvalidated schema can enter the system from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// The named types.
    pub types: BTreeMap<String, SchemaType>,
    /// The root type name.
    pub root: String,
}

impl SchemaDocument {
    /// Validate the document into a schema.
    pub fn into_schema(self) -> std::result::Result<Schema, Vec<ValidationError>> {
        let mut builder = SchemaBuilder::new().root(self.root);
        for (name, ty) in self.types {
            builder = builder.add_type(name, ty);
        }
        builder.build()
    }
}

/// Collapse a validation error list into the library error type.
pub(crate) fn validation_failure(errors: Vec<ValidationError>) -> BareError {
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    BareError::SchemaValidation {
        cause: rendered.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_is_additive_and_overwrites() {
        let schema = Schema::builder()
            .add_type("Value", SchemaType::fixed(TypeKind::U8))
            .add_type("Value", SchemaType::fixed(TypeKind::U32))
            .root("Value")
            .build()
            .unwrap();

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.root_type(), &SchemaType::fixed(TypeKind::U32));
    }

    #[test]
    fn missing_root_is_rejected() {
        let errors = Schema::builder()
            .add_type("Value", SchemaType::fixed(TypeKind::U8))
            .build()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn document_round_trip_revalidates() {
        let schema = Schema::builder()
            .add_type(
                "Point",
                SchemaType::record([
                    StructField::new("x", SchemaType::fixed(TypeKind::F32)),
                    StructField::new("y", SchemaType::fixed(TypeKind::F32)),
                ]),
            )
            .root("Point")
            .build()
            .unwrap();

        let json = schema.to_json().unwrap();
        let restored = Schema::from_json(&json).unwrap();
        assert_eq!(restored, schema);
    }

    #[test]
    fn invalid_document_fails_validation_on_load() {
        // An empty struct is structurally well-formed JSON but semantically invalid.
        let json = r#"{"types": {"Bad": {"Struct": {"fields": []}}}, "root": "Bad"}"#;
        let err = Schema::from_json(json).unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn type_display_forms() {
        assert_eq!(SchemaType::fixed(TypeKind::U32).to_string(), "u32");
        assert_eq!(SchemaType::varint(TypeKind::U64).to_string(), "varint<u64>");
        assert_eq!(
            SchemaType::optional(SchemaType::string()).to_string(),
            "optional<string>"
        );
        assert_eq!(
            SchemaType::fixed_list(SchemaType::fixed(TypeKind::U8), 4).to_string(),
            "list<u8>[4]"
        );
        assert_eq!(SchemaType::FixedData { length: 16 }.to_string(), "data[16]");
    }
}
