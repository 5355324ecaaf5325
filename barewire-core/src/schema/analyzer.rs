//! Size and alignment analysis for schema types.
//!
//! Sizes are `(min, max)` byte bounds over the wire/memory form; a type is
//! fixed-size when the bounds coincide. Alignments follow the platform
//! context for primitives and the recursive maximum rule for aggregates.
//!
//! Enums are sized by their backing integer kind so that they stay
//! addressable inside typed views; the wire codec still writes them as
//! varints.

use super::model::{SchemaType, WireEncoding};
use crate::error::{BareError, Result};
use crate::schema::Schema;

/// Upper bound of a ULEB128-encoded integer in bytes.
pub const MAX_VARINT_BYTES: u64 = 10;

/// Byte-size bounds of a schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeInfo {
    /// Minimum encoded size in bytes.
    pub min: u64,
    /// Maximum encoded size in bytes; `None` means unbounded.
    pub max: Option<u64>,
}

impl SizeInfo {
    /// An exact size.
    #[must_use]
    pub const fn fixed(n: u64) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// A bounded range.
    #[must_use]
    pub const fn bounded(min: u64, max: u64) -> Self {
        Self { min, max: Some(max) }
    }

    /// A lower bound with no upper bound.
    #[must_use]
    pub const fn unbounded(min: u64) -> Self {
        Self { min, max: None }
    }

    /// A type is fixed-size iff min and max agree on a concrete value.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.max == Some(self.min)
    }
}

/// Round `value` up to the next multiple of `align`.
#[must_use]
pub fn align_up(value: u64, align: u64) -> u64 {
    debug_assert!(align > 0);
    value.div_ceil(align) * align
}

/// Compute the size bounds of a type within a validated schema.
pub fn size_of(
    ctx: &crate::platform::PlatformContext,
    schema: &Schema,
    ty: &SchemaType,
) -> Result<SizeInfo> {
    match ty {
        SchemaType::Primitive { kind, encoding } => match encoding {
            WireEncoding::Fixed => Ok(SizeInfo::fixed(ctx.size_of(*kind) as u64)),
            WireEncoding::VarInt => Ok(SizeInfo::bounded(1, MAX_VARINT_BYTES)),
            WireEncoding::LengthPrefixed => Ok(SizeInfo::unbounded(1)),
        },
        SchemaType::FixedData { length } => Ok(SizeInfo::fixed(*length as u64)),
        SchemaType::Enum { base, .. } => Ok(SizeInfo::fixed(ctx.size_of(*base) as u64)),
        SchemaType::Optional(inner) => {
            let inner = size_of(ctx, schema, inner)?;
            Ok(SizeInfo {
                min: 1,
                max: inner.max.map(|m| m + 1),
            })
        }
        SchemaType::List(_) | SchemaType::Map { .. } => Ok(SizeInfo::unbounded(1)),
        SchemaType::FixedList { element, length } => {
            let element = size_of(ctx, schema, element)?;
            let n = *length as u64;
            Ok(SizeInfo {
                min: element.min * n,
                max: element.max.map(|m| m * n),
            })
        }
        SchemaType::Union { cases } => {
            let mut min: Option<u64> = None;
            let mut max = Some(0u64);
            for case in cases.values() {
                let size = size_of(ctx, schema, case)?;
                min = Some(min.map_or(size.min, |m| m.min(size.min)));
                max = match (max, size.max) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                };
            }
            Ok(SizeInfo {
                min: 1 + min.unwrap_or(0),
                max: max.map(|m| MAX_VARINT_BYTES + m),
            })
        }
        SchemaType::Struct { fields } => {
            let mut cursor = 0u64;
            let mut max_align = 1u64;
            let mut fixed = true;
            for field in fields {
                let align = align_of(ctx, schema, &field.ty)? as u64;
                let size = size_of(ctx, schema, &field.ty)?;
                cursor = align_up(cursor, align) + size.min;
                max_align = max_align.max(align);
                fixed = fixed && size.is_fixed();
            }
            let total = align_up(cursor, max_align);
            if fixed {
                Ok(SizeInfo::fixed(total))
            } else {
                Ok(SizeInfo::unbounded(total))
            }
        }
        SchemaType::TypeRef(name) => {
            let target = resolve(schema, name)?;
            size_of(ctx, schema, target)
        }
    }
}

/// Compute the alignment of a type within a validated schema.
pub fn align_of(
    ctx: &crate::platform::PlatformContext,
    schema: &Schema,
    ty: &SchemaType,
) -> Result<usize> {
    match ty {
        SchemaType::Primitive { kind, encoding } => match encoding {
            WireEncoding::Fixed => Ok(ctx.align_of(*kind)),
            // Varint and length-prefixed forms are byte streams.
            _ => Ok(1),
        },
        SchemaType::FixedData { .. } => Ok(1),
        SchemaType::Enum { base, .. } => Ok(ctx.align_of(*base)),
        SchemaType::Optional(inner) => Ok(align_of(ctx, schema, inner)?.max(1)),
        SchemaType::List(element) => align_of(ctx, schema, element),
        SchemaType::FixedList { element, .. } => align_of(ctx, schema, element),
        SchemaType::Map { key, value } => {
            let key = align_of(ctx, schema, key)?;
            let value = align_of(ctx, schema, value)?;
            Ok(key.max(value))
        }
        SchemaType::Union { cases } => {
            let mut align = 1;
            for case in cases.values() {
                align = align.max(align_of(ctx, schema, case)?);
            }
            Ok(align)
        }
        SchemaType::Struct { fields } => {
            let mut align = 1;
            for field in fields {
                align = align.max(align_of(ctx, schema, &field.ty)?);
            }
            Ok(align)
        }
        SchemaType::TypeRef(name) => {
            let target = resolve(schema, name)?;
            align_of(ctx, schema, target)
        }
    }
}

fn resolve<'a>(schema: &'a Schema, name: &str) -> Result<&'a SchemaType> {
    schema
        .resolve(name)
        .ok_or_else(|| BareError::invalid_value(format!("unresolved type reference `{}`", name)))
}
