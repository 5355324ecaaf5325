//! Random-access reads and writes over a borrowed byte region.
//!
//! A view pairs a precomputed [`ViewLayout`] with a byte region. Read
//! access and write access are separate types: [`SchemaView`] borrows the
//! region shared and exposes `get` only, so a read-only capability can
//! never write; [`SchemaViewMut`] takes the exclusive borrow and adds
//! `set`. Neither can outlive the region it borrows.
//!
//! Only primitive, enum, and fixed-data leaves are addressable; aggregate
//! fields exist in the layout but refuse direct access.

use super::layout::{FieldSlot, ViewLayout};
use crate::error::{BareError, Result};
use crate::platform::TypeKind;
use crate::schema::{SchemaType, WireEncoding};
use crate::wire::primitives;
use crate::wire::WireValue;

/// A read-only view over a borrowed byte region.
#[derive(Debug)]
pub struct SchemaView<'a> {
    layout: &'a ViewLayout,
    region: &'a [u8],
}

impl<'a> SchemaView<'a> {
    /// Create a view; the region must cover the layout.
    pub fn new(layout: &'a ViewLayout, region: &'a [u8]) -> Result<Self> {
        check_region(layout, region.len())?;
        Ok(Self { layout, region })
    }

    /// Read the leaf at a dotted field path.
    pub fn get(&self, path: &str) -> Result<WireValue> {
        let slot = lookup(self.layout, path)?;
        read_leaf(self.region, slot)
    }

    /// The layout this view was built against.
    #[must_use]
    pub fn layout(&self) -> &ViewLayout {
        self.layout
    }
}

/// A mutable view over an exclusively borrowed byte region.
pub struct SchemaViewMut<'a> {
    layout: &'a ViewLayout,
    region: &'a mut [u8],
}

impl<'a> SchemaViewMut<'a> {
    /// Create a mutable view; the region must cover the layout.
    pub fn new(layout: &'a ViewLayout, region: &'a mut [u8]) -> Result<Self> {
        check_region(layout, region.len())?;
        Ok(Self { layout, region })
    }

    /// Read the leaf at a dotted field path.
    pub fn get(&self, path: &str) -> Result<WireValue> {
        let slot = lookup(self.layout, path)?;
        read_leaf(self.region, slot)
    }

    /// Write the leaf at a dotted field path.
    pub fn set(&mut self, path: &str, value: &WireValue) -> Result<()> {
        let slot = lookup(self.layout, path)?;
        write_leaf(self.region, slot, value)
    }
}

fn check_region(layout: &ViewLayout, region_len: usize) -> Result<()> {
    if region_len < layout.size() {
        return Err(BareError::OutOfBounds {
            offset: layout.size(),
            length: region_len,
        });
    }
    Ok(())
}

fn lookup<'a>(layout: &'a ViewLayout, path: &str) -> Result<&'a FieldSlot> {
    layout
        .slot(path)
        .ok_or_else(|| BareError::invalid_value(format!("field path not found: {}", path)))
}

fn not_addressable(ty: &SchemaType) -> BareError {
    BareError::invalid_value(format!("`{}` is not directly addressable in a view", ty))
}

fn read_leaf(region: &[u8], slot: &FieldSlot) -> Result<WireValue> {
    let at = slot.offset;
    match &slot.ty {
        SchemaType::Primitive {
            kind,
            encoding: WireEncoding::Fixed,
        } => match kind {
            TypeKind::U8 => Ok(WireValue::U8(primitives::read_u8(region, at)?)),
            TypeKind::U16 => Ok(WireValue::U16(primitives::read_u16(region, at)?)),
            TypeKind::U32 => Ok(WireValue::U32(primitives::read_u32(region, at)?)),
            TypeKind::U64 => Ok(WireValue::U64(primitives::read_u64(region, at)?)),
            TypeKind::I8 => Ok(WireValue::I8(primitives::read_i8(region, at)?)),
            TypeKind::I16 => Ok(WireValue::I16(primitives::read_i16(region, at)?)),
            TypeKind::I32 => Ok(WireValue::I32(primitives::read_i32(region, at)?)),
            TypeKind::I64 => Ok(WireValue::I64(primitives::read_i64(region, at)?)),
            TypeKind::F32 => Ok(WireValue::F32(primitives::read_f32(region, at)?)),
            TypeKind::F64 => Ok(WireValue::F64(primitives::read_f64(region, at)?)),
            TypeKind::Bool => Ok(WireValue::Bool(primitives::read_bool(region, at)?)),
            TypeKind::UInt => Ok(WireValue::U64(read_word(region, at, slot.size)?)),
            TypeKind::Int => Ok(WireValue::I64(read_word_signed(region, at, slot.size)?)),
            TypeKind::Unit | TypeKind::Str | TypeKind::Bytes => Err(not_addressable(&slot.ty)),
        },
        SchemaType::Enum { variants, .. } => {
            let number = read_word(region, at, slot.size)?;
            variants
                .iter()
                .find(|(_, v)| **v == number)
                .map(|(name, _)| WireValue::Enum(name.clone()))
                .ok_or_else(|| {
                    BareError::invalid_value(format!("unknown enum value {} in view", number))
                })
        }
        SchemaType::FixedData { length } => {
            let end = at
                .checked_add(*length)
                .filter(|end| *end <= region.len())
                .ok_or(BareError::OutOfBounds {
                    offset: at,
                    length: region.len(),
                })?;
            Ok(WireValue::Data(region[at..end].to_vec()))
        }
        other => Err(not_addressable(other)),
    }
}

fn write_leaf(region: &mut [u8], slot: &FieldSlot, value: &WireValue) -> Result<()> {
    let at = slot.offset;
    let mismatch = || BareError::type_mismatch(slot.ty.to_string(), value.type_name());
    match &slot.ty {
        SchemaType::Primitive {
            kind,
            encoding: WireEncoding::Fixed,
        } => match (kind, value) {
            (TypeKind::U8, WireValue::U8(v)) => primitives::write_u8(region, at, *v),
            (TypeKind::U16, WireValue::U16(v)) => primitives::write_u16(region, at, *v),
            (TypeKind::U32, WireValue::U32(v)) => primitives::write_u32(region, at, *v),
            (TypeKind::U64, WireValue::U64(v)) => primitives::write_u64(region, at, *v),
            (TypeKind::I8, WireValue::I8(v)) => primitives::write_i8(region, at, *v),
            (TypeKind::I16, WireValue::I16(v)) => primitives::write_i16(region, at, *v),
            (TypeKind::I32, WireValue::I32(v)) => primitives::write_i32(region, at, *v),
            (TypeKind::I64, WireValue::I64(v)) => primitives::write_i64(region, at, *v),
            (TypeKind::F32, WireValue::F32(v)) => primitives::write_f32(region, at, *v),
            (TypeKind::F64, WireValue::F64(v)) => primitives::write_f64(region, at, *v),
            (TypeKind::Bool, WireValue::Bool(v)) => primitives::write_bool(region, at, *v),
            (TypeKind::UInt, WireValue::U64(v)) => write_word(region, at, slot.size, *v),
            (TypeKind::Int, WireValue::I64(v)) => {
                write_word_signed(region, at, slot.size, *v)
            }
            (TypeKind::Unit | TypeKind::Str | TypeKind::Bytes, _) => {
                Err(not_addressable(&slot.ty))
            }
            _ => Err(mismatch()),
        },
        SchemaType::Enum { variants, .. } => match value {
            WireValue::Enum(name) => {
                let number = variants.get(name).ok_or_else(|| {
                    BareError::invalid_value(format!("unknown enum variant `{}`", name))
                })?;
                write_word(region, at, slot.size, *number)
            }
            _ => Err(mismatch()),
        },
        SchemaType::FixedData { length } => match value {
            WireValue::Data(bytes) if bytes.len() == *length => {
                let end = at
                    .checked_add(*length)
                    .filter(|end| *end <= region.len())
                    .ok_or(BareError::OutOfBounds {
                        offset: at,
                        length: region.len(),
                    })?;
                region[at..end].copy_from_slice(bytes);
                Ok(())
            }
            WireValue::Data(bytes) => Err(BareError::invalid_value(format!(
                "fixed data expects {} bytes, got {}",
                length,
                bytes.len()
            ))),
            _ => Err(mismatch()),
        },
        other => Err(not_addressable(other)),
    }
}

fn read_word(region: &[u8], at: usize, width: u64) -> Result<u64> {
    match width {
        1 => Ok(u64::from(primitives::read_u8(region, at)?)),
        2 => Ok(u64::from(primitives::read_u16(region, at)?)),
        4 => Ok(u64::from(primitives::read_u32(region, at)?)),
        8 => primitives::read_u64(region, at),
        other => Err(BareError::invalid_value(format!(
            "unsupported word width {}",
            other
        ))),
    }
}

fn read_word_signed(region: &[u8], at: usize, width: u64) -> Result<i64> {
    match width {
        1 => Ok(i64::from(primitives::read_i8(region, at)?)),
        2 => Ok(i64::from(primitives::read_i16(region, at)?)),
        4 => Ok(i64::from(primitives::read_i32(region, at)?)),
        8 => primitives::read_i64(region, at),
        other => Err(BareError::invalid_value(format!(
            "unsupported word width {}",
            other
        ))),
    }
}

fn write_word(region: &mut [u8], at: usize, width: u64, value: u64) -> Result<()> {
    let fits = match width {
        1 => value <= u64::from(u8::MAX),
        2 => value <= u64::from(u16::MAX),
        4 => value <= u64::from(u32::MAX),
        8 => true,
        other => {
            return Err(BareError::invalid_value(format!(
                "unsupported word width {}",
                other
            )))
        }
    };
    if !fits {
        return Err(BareError::invalid_value(format!(
            "value {} does not fit in {} bytes",
            value, width
        )));
    }
    match width {
        1 => primitives::write_u8(region, at, value as u8),
        2 => primitives::write_u16(region, at, value as u16),
        4 => primitives::write_u32(region, at, value as u32),
        _ => primitives::write_u64(region, at, value),
    }
}

fn write_word_signed(region: &mut [u8], at: usize, width: u64, value: i64) -> Result<()> {
    let fits = match width {
        4 => i64::from(i32::MIN) <= value && value <= i64::from(i32::MAX),
        8 => true,
        other => {
            return Err(BareError::invalid_value(format!(
                "unsupported word width {}",
                other
            )))
        }
    };
    if !fits {
        return Err(BareError::invalid_value(format!(
            "value {} does not fit in {} bytes",
            value, width
        )));
    }
    match width {
        4 => primitives::write_i32(region, at, value as i32),
        _ => primitives::write_i64(region, at, value),
    }
}
