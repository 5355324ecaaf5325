//! Field-offset computation for typed views.
//!
//! Given a validated schema whose root resolves to a struct, the layout
//! walks the fields in declaration order, aligns each to its natural
//! alignment, and records a slot per dotted field path. Nested structs
//! (direct or behind type references) extend the path with their field
//! names; variable-sized fields occupy their minimum size.

use std::collections::BTreeMap;

use crate::error::{BareError, Result};
use crate::platform::PlatformContext;
use crate::schema::{align_of, align_up, size_of, Schema, SchemaType};

/// The resolved placement of one field inside a view.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    /// Byte offset from the start of the view.
    pub offset: usize,
    /// The field's schema type, with type references resolved.
    pub ty: SchemaType,
    /// The field's size in bytes (minimum size for variable-sized fields).
    pub size: u64,
    /// The field's alignment in bytes.
    pub align: usize,
}

/// A precomputed, immutable map from dotted field paths to slots.
#[derive(Debug, Clone)]
pub struct ViewLayout {
    slots: BTreeMap<String, FieldSlot>,
    size: usize,
    align: usize,
}

impl ViewLayout {
    /// Compute the layout of a schema's root struct for a platform.
    pub fn compute(ctx: &PlatformContext, schema: &Schema) -> Result<Self> {
        let root = resolve_chain(schema, schema.root_type())?;
        let fields = match root {
            SchemaType::Struct { fields } => fields,
            other => {
                return Err(BareError::invalid_value(format!(
                    "view layouts require a struct root, found {}",
                    other
                )))
            }
        };

        let mut slots = BTreeMap::new();
        let (end, max_align) = walk_struct(ctx, schema, fields, "", 0, &mut slots)?;
        let size = align_up(end, max_align);
        tracing::debug!(
            root = %schema.root_name(),
            size,
            align = max_align,
            slots = slots.len(),
            "view layout computed"
        );
        Ok(Self {
            slots,
            size: size as usize,
            align: max_align as usize,
        })
    }

    /// Look up a slot by dotted field path.
    #[must_use]
    pub fn slot(&self, path: &str) -> Option<&FieldSlot> {
        self.slots.get(path)
    }

    /// Total size of the laid-out struct, rounded to its alignment.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment of the laid-out struct.
    #[must_use]
    pub fn alignment(&self) -> usize {
        self.align
    }

    /// Iterate over all slots in path order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &FieldSlot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn walk_struct(
    ctx: &PlatformContext,
    schema: &Schema,
    fields: &[crate::schema::StructField],
    prefix: &str,
    base: u64,
    slots: &mut BTreeMap<String, FieldSlot>,
) -> Result<(u64, u64)> {
    let mut cursor = base;
    let mut max_align = 1u64;

    for field in fields {
        let resolved = resolve_chain(schema, &field.ty)?;
        let align = align_of(ctx, schema, &field.ty)? as u64;
        let size = size_of(ctx, schema, &field.ty)?;

        cursor = align_up(cursor, align);
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        slots.insert(
            path.clone(),
            FieldSlot {
                offset: cursor as usize,
                ty: resolved.clone(),
                size: size.min,
                align: align as usize,
            },
        );

        if let SchemaType::Struct { fields: nested } = resolved {
            walk_struct(ctx, schema, nested, &path, cursor, slots)?;
        }

        cursor += size.min;
        max_align = max_align.max(align);
    }

    Ok((cursor, max_align))
}

fn resolve_chain<'a>(schema: &'a Schema, mut ty: &'a SchemaType) -> Result<&'a SchemaType> {
    while let SchemaType::TypeRef(name) = ty {
        ty = schema.resolve(name).ok_or_else(|| {
            BareError::invalid_value(format!("unresolved type reference `{}`", name))
        })?;
    }
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TypeKind;
    use crate::schema::StructField;

    fn sensor_schema() -> Schema {
        Schema::builder()
            .add_type(
                "Position",
                SchemaType::record([
                    StructField::new("x", SchemaType::fixed(TypeKind::F32)),
                    StructField::new("y", SchemaType::fixed(TypeKind::F32)),
                ]),
            )
            .add_type(
                "Sample",
                SchemaType::record([
                    StructField::new("flag", SchemaType::fixed(TypeKind::U8)),
                    StructField::new("position", SchemaType::reference("Position")),
                    StructField::new("timestamp", SchemaType::fixed(TypeKind::U64)),
                ]),
            )
            .root("Sample")
            .build()
            .unwrap()
    }

    #[test]
    fn offsets_are_aligned_and_monotonic() {
        let ctx = PlatformContext::lp64();
        let layout = ViewLayout::compute(&ctx, &sensor_schema()).unwrap();

        // flag at 0, position padded to 4, timestamp padded to 8.
        assert_eq!(layout.slot("flag").unwrap().offset, 0);
        assert_eq!(layout.slot("position").unwrap().offset, 4);
        assert_eq!(layout.slot("position.x").unwrap().offset, 4);
        assert_eq!(layout.slot("position.y").unwrap().offset, 8);
        assert_eq!(layout.slot("timestamp").unwrap().offset, 16);
        assert_eq!(layout.size(), 24);
        assert_eq!(layout.alignment(), 8);

        // Every offset is a multiple of its slot's alignment, and the total
        // is a multiple of the struct alignment.
        for (_, slot) in layout.slots() {
            assert_eq!(slot.offset % slot.align, 0);
        }
        assert_eq!(layout.size() % layout.alignment(), 0);
    }

    #[test]
    fn layout_depends_on_the_platform() {
        let schema = Schema::builder()
            .add_type(
                "Row",
                SchemaType::record([
                    StructField::new("a", SchemaType::fixed(TypeKind::U8)),
                    StructField::new("b", SchemaType::fixed(TypeKind::UInt)),
                ]),
            )
            .root("Row")
            .build()
            .unwrap();

        let layout32 = ViewLayout::compute(&PlatformContext::ilp32(), &schema).unwrap();
        let layout64 = ViewLayout::compute(&PlatformContext::lp64(), &schema).unwrap();
        assert_eq!(layout32.slot("b").unwrap().offset, 4);
        assert_eq!(layout64.slot("b").unwrap().offset, 8);
        assert_eq!(layout32.size(), 8);
        assert_eq!(layout64.size(), 16);
    }

    #[test]
    fn non_struct_root_is_rejected() {
        let ctx = PlatformContext::lp64();
        let schema = Schema::builder()
            .add_type("N", SchemaType::fixed(TypeKind::U32))
            .root("N")
            .build()
            .unwrap();
        let err = ViewLayout::compute(&ctx, &schema).unwrap_err();
        assert_eq!(err.code(), "E301");
    }

    #[test]
    fn type_ref_root_resolving_to_struct_is_accepted() {
        let ctx = PlatformContext::lp64();
        let schema = Schema::builder()
            .add_type(
                "Inner",
                SchemaType::record([StructField::new("v", SchemaType::fixed(TypeKind::U16))]),
            )
            .add_type("Alias", SchemaType::reference("Inner"))
            .root("Alias")
            .build()
            .unwrap();
        let layout = ViewLayout::compute(&ctx, &schema).unwrap();
        assert_eq!(layout.slot("v").unwrap().offset, 0);
        assert_eq!(layout.size(), 2);
    }

    #[test]
    fn variable_fields_occupy_their_minimum_size() {
        let ctx = PlatformContext::lp64();
        let schema = Schema::builder()
            .add_type(
                "Row",
                SchemaType::record([
                    StructField::new("name", SchemaType::string()),
                    StructField::new("id", SchemaType::fixed(TypeKind::U16)),
                ]),
            )
            .root("Row")
            .build()
            .unwrap();
        let layout = ViewLayout::compute(&ctx, &schema).unwrap();
        // string min size 1, align 1; u16 padded to 2.
        assert_eq!(layout.slot("name").unwrap().offset, 0);
        assert_eq!(layout.slot("id").unwrap().offset, 2);
        assert_eq!(layout.size(), 4);
    }
}
