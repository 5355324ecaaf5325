//! Schema system: model, validation, analysis, and compatibility.
//!
//! A schema is the single source of truth for both the wire codec and the
//! typed memory view. The lifecycle is strict:
//!
//! 1. Build the type map additively with [`SchemaBuilder`].
//! 2. Validation runs exactly once inside `build()`; violations are
//!    accumulated and returned as a batch.
//! 3. The resulting [`Schema`] is immutable; derived sizes and layouts can
//!    be cached safely.
//!
//! # Example
//!
//! ```ignore
//! use barewire_core::schema::{Schema, SchemaType, StructField};
//! use barewire_core::platform::{PlatformContext, TypeKind};
//!
//! let schema = Schema::builder()
//!     .add_type("Point", SchemaType::record([
//!         StructField::new("x", SchemaType::fixed(TypeKind::F32)),
//!         StructField::new("y", SchemaType::fixed(TypeKind::F32)),
//!     ]))
//!     .root("Point")
//!     .build()?;
//!
//! let ctx = PlatformContext::host();
//! let size = barewire_core::schema::size_of(&ctx, &schema, schema.root_type())?;
//! ```

mod analyzer;
mod compatibility;
mod model;
mod registry;
mod validator;

pub use analyzer::{align_of, align_up, size_of, SizeInfo, MAX_VARINT_BYTES};
pub use compatibility::{
    check_compatibility, report, Compatibility, CompatibilityReport, SchemaChange,
};
pub use model::{
    Schema, SchemaBuilder, SchemaDocument, SchemaType, StructField, WireEncoding,
};
pub use registry::SchemaRegistry;
pub use validator::{
    PathSegment, SchemaValidator, ValidationError, ValidationErrorKind, ValidationResult,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PlatformContext, TypeKind};

    #[test]
    fn integration_test_schema_lifecycle() {
        // Build a schema with references, validate, size it, and check
        // compatibility against an evolved version.
        let v1 = Schema::builder()
            .add_type(
                "Header",
                SchemaType::record([
                    StructField::new("version", SchemaType::fixed(TypeKind::U16)),
                    StructField::new("flags", SchemaType::fixed(TypeKind::U8)),
                ]),
            )
            .add_type(
                "Message",
                SchemaType::record([
                    StructField::new("header", SchemaType::reference("Header")),
                    StructField::new("body", SchemaType::string()),
                ]),
            )
            .root("Message")
            .build()
            .unwrap();

        let ctx = PlatformContext::lp64();
        let root_size = size_of(&ctx, &v1, v1.root_type()).unwrap();
        assert!(!root_size.is_fixed());
        // Header: u16 at 0, u8 at 2, rounded to 4; string min 1; the total
        // (5) is rounded up to the struct alignment (2).
        assert_eq!(root_size.min, 6);

        let v2 = Schema::builder()
            .add_type(
                "Header",
                SchemaType::record([
                    StructField::new("version", SchemaType::fixed(TypeKind::U16)),
                    StructField::new("flags", SchemaType::fixed(TypeKind::U8)),
                ]),
            )
            .add_type(
                "Message",
                SchemaType::record([
                    StructField::new("header", SchemaType::reference("Header")),
                    StructField::new("body", SchemaType::string()),
                    StructField::new("priority", SchemaType::fixed(TypeKind::U8)),
                ]),
            )
            .root("Message")
            .build()
            .unwrap();

        assert_eq!(
            check_compatibility(&v1, &v2),
            Compatibility::BackwardCompatible
        );
        assert!(check_compatibility(&v1, &v1).is_fully_compatible());

        let registry = SchemaRegistry::new();
        registry.register("message@v1", v1);
        registry.register("message@v2", v2);
        assert_eq!(registry.names().len(), 2);
    }
}
