//! Schema-directed encoding and decoding.
//!
//! The codec is not self-describing: the caller supplies the schema type,
//! and the wire carries no type tags beyond union tags and optional
//! presence bytes. Failures short-circuit; no partial value ever escapes a
//! failing call.

use super::buffer::WireBuffer;
use super::reader::WireReader;
use super::value::WireValue;
use crate::error::{BareError, Result};
use crate::platform::TypeKind;
use crate::schema::{Schema, SchemaType, WireEncoding};

/// Encode a value as the schema's root type into a fresh byte vector.
pub fn encode_to_vec(schema: &Schema, value: &WireValue) -> Result<Vec<u8>> {
    let mut buf = WireBuffer::new();
    encode(schema, value, &mut buf)?;
    Ok(buf.into_bytes())
}

/// Encode a value as the schema's root type.
pub fn encode(schema: &Schema, value: &WireValue, buf: &mut WireBuffer) -> Result<()> {
    encode_as(schema, schema.root_type(), value, buf)
}

/// Decode the schema's root type from a byte slice.
///
/// Trailing bytes after the decoded value are left unread; framing is the
/// caller's responsibility.
pub fn decode_from_slice(schema: &Schema, bytes: &[u8]) -> Result<WireValue> {
    let mut reader = WireReader::new(bytes);
    decode(schema, &mut reader)
}

/// Decode the schema's root type at the reader's current position.
pub fn decode(schema: &Schema, reader: &mut WireReader<'_>) -> Result<WireValue> {
    decode_as(schema, schema.root_type(), reader)
}

fn unencodable(ty: &SchemaType, value: &WireValue) -> BareError {
    BareError::encoding(format!(
        "cannot encode {} as {}",
        value.type_name(),
        ty
    ))
}

/// Encode a value as an explicit schema type.
pub fn encode_as(
    schema: &Schema,
    ty: &SchemaType,
    value: &WireValue,
    buf: &mut WireBuffer,
) -> Result<()> {
    match ty {
        SchemaType::Primitive { kind, encoding } => {
            encode_primitive(ty, *kind, *encoding, value, buf)
        }
        SchemaType::FixedData { length } => match value {
            WireValue::Data(bytes) if bytes.len() == *length => buf.write_bytes(bytes),
            WireValue::Data(bytes) => Err(BareError::encoding(format!(
                "fixed data expects {} bytes, got {}",
                length,
                bytes.len()
            ))),
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::Enum { variants, .. } => match value {
            WireValue::Enum(name) => match variants.get(name) {
                Some(number) => buf.write_uvarint(*number),
                None => Err(BareError::encoding(format!(
                    "unknown enum variant `{}`",
                    name
                ))),
            },
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::Optional(inner) => match value {
            WireValue::Optional(None) => buf.write_u8(0x00),
            WireValue::Optional(Some(present)) => {
                buf.write_u8(0x01)?;
                encode_as(schema, inner, present, buf)
            }
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::List(element) => match value {
            WireValue::List(items) => {
                buf.write_uvarint(items.len() as u64)?;
                for item in items {
                    encode_as(schema, element, item, buf)?;
                }
                Ok(())
            }
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::FixedList { element, length } => match value {
            WireValue::List(items) if items.len() == *length => {
                for item in items {
                    encode_as(schema, element, item, buf)?;
                }
                Ok(())
            }
            WireValue::List(items) => Err(BareError::encoding(format!(
                "fixed list expects {} elements, got {}",
                length,
                items.len()
            ))),
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::Map { key, value: val_ty } => match value {
            WireValue::Map(pairs) => {
                buf.write_uvarint(pairs.len() as u64)?;
                for (k, v) in pairs {
                    encode_as(schema, key, k, buf)?;
                    encode_as(schema, val_ty, v, buf)?;
                }
                Ok(())
            }
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::Union { cases } => match value {
            WireValue::Union { tag, value: payload } => {
                let case = cases.get(tag).ok_or_else(|| {
                    BareError::encoding(format!("union tag {} has no registered payload", tag))
                })?;
                buf.write_uvarint(u64::from(*tag))?;
                encode_as(schema, case, payload, buf)
            }
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::Struct { fields } => match value {
            WireValue::Struct(pairs) => {
                if pairs.len() != fields.len() {
                    return Err(BareError::encoding(format!(
                        "struct expects {} fields, got {}",
                        fields.len(),
                        pairs.len()
                    )));
                }
                for (field, (name, field_value)) in fields.iter().zip(pairs.iter()) {
                    if field.name != *name {
                        return Err(BareError::encoding(format!(
                            "struct field mismatch: expected `{}`, got `{}`",
                            field.name, name
                        )));
                    }
                    encode_as(schema, &field.ty, field_value, buf)?;
                }
                Ok(())
            }
            _ => Err(unencodable(ty, value)),
        },
        SchemaType::TypeRef(name) => {
            let target = resolve(schema, name)?;
            encode_as(schema, target, value, buf)
        }
    }
}

/// Decode a value as an explicit schema type.
pub fn decode_as(
    schema: &Schema,
    ty: &SchemaType,
    reader: &mut WireReader<'_>,
) -> Result<WireValue> {
    match ty {
        SchemaType::Primitive { kind, encoding } => decode_primitive(*kind, *encoding, reader),
        SchemaType::FixedData { length } => {
            Ok(WireValue::Data(reader.read_bytes(*length)?.to_vec()))
        }
        SchemaType::Enum { variants, .. } => {
            let number = reader.read_uvarint()?;
            let name = variants
                .iter()
                .find(|(_, v)| **v == number)
                .map(|(n, _)| n.clone())
                .ok_or_else(|| {
                    BareError::decoding(format!("unknown enum value {}", number))
                })?;
            Ok(WireValue::Enum(name))
        }
        SchemaType::Optional(inner) => match reader.read_u8()? {
            0x00 => Ok(WireValue::Optional(None)),
            0x01 => {
                let value = decode_as(schema, inner, reader)?;
                Ok(WireValue::some(value))
            }
            other => Err(BareError::decoding(format!(
                "invalid optional tag 0x{:02x}",
                other
            ))),
        },
        SchemaType::List(element) => {
            let count = reader.read_uvarint()?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(decode_as(schema, element, reader)?);
            }
            Ok(WireValue::List(items))
        }
        SchemaType::FixedList { element, length } => {
            // Exactly `length` elements, no prefix; trailing bytes are not
            // this decoder's concern.
            let mut items = Vec::with_capacity(*length);
            for _ in 0..*length {
                items.push(decode_as(schema, element, reader)?);
            }
            Ok(WireValue::List(items))
        }
        SchemaType::Map { key, value } => {
            let count = reader.read_uvarint()?;
            let mut pairs = Vec::new();
            for _ in 0..count {
                let k = decode_as(schema, key, reader)?;
                let v = decode_as(schema, value, reader)?;
                pairs.push((k, v));
            }
            Ok(WireValue::Map(pairs))
        }
        SchemaType::Union { cases } => {
            let raw = reader.read_uvarint()?;
            let tag = u32::try_from(raw)
                .map_err(|_| BareError::decoding(format!("union tag {} out of range", raw)))?;
            let case = cases.get(&tag).ok_or_else(|| {
                BareError::decoding(format!("union tag {} has no registered payload", tag))
            })?;
            let payload = decode_as(schema, case, reader)?;
            Ok(WireValue::union(tag, payload))
        }
        SchemaType::Struct { fields } => {
            let mut pairs = Vec::with_capacity(fields.len());
            for field in fields {
                let value = decode_as(schema, &field.ty, reader)?;
                pairs.push((field.name.clone(), value));
            }
            Ok(WireValue::Struct(pairs))
        }
        SchemaType::TypeRef(name) => {
            let target = resolve(schema, name)?;
            decode_as(schema, target, reader)
        }
    }
}

fn encode_primitive(
    ty: &SchemaType,
    kind: TypeKind,
    encoding: WireEncoding,
    value: &WireValue,
    buf: &mut WireBuffer,
) -> Result<()> {
    match encoding {
        WireEncoding::Fixed => match (kind, value) {
            (TypeKind::U8, WireValue::U8(v)) => buf.write_u8(*v),
            (TypeKind::U16, WireValue::U16(v)) => buf.write_u16(*v),
            (TypeKind::U32, WireValue::U32(v)) => buf.write_u32(*v),
            (TypeKind::U64, WireValue::U64(v)) => buf.write_u64(*v),
            (TypeKind::I8, WireValue::I8(v)) => buf.write_i8(*v),
            (TypeKind::I16, WireValue::I16(v)) => buf.write_i16(*v),
            (TypeKind::I32, WireValue::I32(v)) => buf.write_i32(*v),
            (TypeKind::I64, WireValue::I64(v)) => buf.write_i64(*v),
            (TypeKind::F32, WireValue::F32(v)) => buf.write_f32(*v),
            (TypeKind::F64, WireValue::F64(v)) => buf.write_f64(*v),
            (TypeKind::Bool, WireValue::Bool(v)) => buf.write_bool(*v),
            (TypeKind::Unit, WireValue::Unit) => Ok(()),
            (TypeKind::UInt | TypeKind::Int, _) => Err(BareError::encoding(
                "word-sized integers are varint-encoded on the wire",
            )),
            _ => Err(unencodable(ty, value)),
        },
        WireEncoding::VarInt => match (kind, value) {
            (TypeKind::U8, WireValue::U8(v)) => buf.write_uvarint(u64::from(*v)),
            (TypeKind::U16, WireValue::U16(v)) => buf.write_uvarint(u64::from(*v)),
            (TypeKind::U32, WireValue::U32(v)) => buf.write_uvarint(u64::from(*v)),
            (TypeKind::U64 | TypeKind::UInt, WireValue::U64(v)) => buf.write_uvarint(*v),
            (TypeKind::I8, WireValue::I8(v)) => buf.write_ivarint(i64::from(*v)),
            (TypeKind::I16, WireValue::I16(v)) => buf.write_ivarint(i64::from(*v)),
            (TypeKind::I32, WireValue::I32(v)) => buf.write_ivarint(i64::from(*v)),
            (TypeKind::I64 | TypeKind::Int, WireValue::I64(v)) => buf.write_ivarint(*v),
            _ => Err(unencodable(ty, value)),
        },
        WireEncoding::LengthPrefixed => match (kind, value) {
            (TypeKind::Str, WireValue::String(v)) => buf.write_string(v),
            (TypeKind::Bytes, WireValue::Data(v)) => buf.write_data(v),
            _ => Err(unencodable(ty, value)),
        },
    }
}

fn decode_primitive(
    kind: TypeKind,
    encoding: WireEncoding,
    reader: &mut WireReader<'_>,
) -> Result<WireValue> {
    match encoding {
        WireEncoding::Fixed => match kind {
            TypeKind::U8 => Ok(WireValue::U8(reader.read_u8()?)),
            TypeKind::U16 => Ok(WireValue::U16(reader.read_u16()?)),
            TypeKind::U32 => Ok(WireValue::U32(reader.read_u32()?)),
            TypeKind::U64 => Ok(WireValue::U64(reader.read_u64()?)),
            TypeKind::I8 => Ok(WireValue::I8(reader.read_i8()?)),
            TypeKind::I16 => Ok(WireValue::I16(reader.read_i16()?)),
            TypeKind::I32 => Ok(WireValue::I32(reader.read_i32()?)),
            TypeKind::I64 => Ok(WireValue::I64(reader.read_i64()?)),
            TypeKind::F32 => Ok(WireValue::F32(reader.read_f32()?)),
            TypeKind::F64 => Ok(WireValue::F64(reader.read_f64()?)),
            TypeKind::Bool => Ok(WireValue::Bool(reader.read_bool()?)),
            TypeKind::Unit => Ok(WireValue::Unit),
            TypeKind::UInt | TypeKind::Int => Err(BareError::decoding(
                "word-sized integers are varint-encoded on the wire",
            )),
            TypeKind::Str | TypeKind::Bytes => Err(BareError::decoding(
                "strings and blobs are length-prefixed on the wire",
            )),
        },
        WireEncoding::VarInt => {
            if kind.is_signed() {
                let raw = reader.read_ivarint()?;
                match kind {
                    TypeKind::I8 => narrow_signed::<i8>(raw).map(WireValue::I8),
                    TypeKind::I16 => narrow_signed::<i16>(raw).map(WireValue::I16),
                    TypeKind::I32 => narrow_signed::<i32>(raw).map(WireValue::I32),
                    _ => Ok(WireValue::I64(raw)),
                }
            } else {
                let raw = reader.read_uvarint()?;
                match kind {
                    TypeKind::U8 => narrow_unsigned::<u8>(raw).map(WireValue::U8),
                    TypeKind::U16 => narrow_unsigned::<u16>(raw).map(WireValue::U16),
                    TypeKind::U32 => narrow_unsigned::<u32>(raw).map(WireValue::U32),
                    TypeKind::U64 | TypeKind::UInt => Ok(WireValue::U64(raw)),
                    _ => Err(BareError::decoding(format!(
                        "{} cannot be varint-encoded",
                        kind
                    ))),
                }
            }
        }
        WireEncoding::LengthPrefixed => match kind {
            TypeKind::Str => Ok(WireValue::String(reader.read_string()?)),
            TypeKind::Bytes => Ok(WireValue::Data(reader.read_data()?)),
            _ => Err(BareError::decoding(format!(
                "{} cannot be length-prefixed",
                kind
            ))),
        },
    }
}

fn narrow_unsigned<T: TryFrom<u64>>(raw: u64) -> Result<T> {
    T::try_from(raw).map_err(|_| {
        BareError::decoding(format!(
            "varint value {} out of range for {}",
            raw,
            std::any::type_name::<T>()
        ))
    })
}

fn narrow_signed<T: TryFrom<i64>>(raw: i64) -> Result<T> {
    T::try_from(raw).map_err(|_| {
        BareError::decoding(format!(
            "varint value {} out of range for {}",
            raw,
            std::any::type_name::<T>()
        ))
    })
}

fn resolve<'a>(schema: &'a Schema, name: &str) -> Result<&'a SchemaType> {
    schema
        .resolve(name)
        .ok_or_else(|| BareError::invalid_value(format!("unresolved type reference `{}`", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StructField;

    fn single(ty: SchemaType) -> Schema {
        Schema::builder().add_type("T", ty).root("T").build().unwrap()
    }

    fn round_trip(schema: &Schema, value: &WireValue) -> WireValue {
        let bytes = encode_to_vec(schema, value).unwrap();
        decode_from_slice(schema, &bytes).unwrap()
    }

    #[test]
    fn optional_wire_form() {
        let schema = single(SchemaType::optional(SchemaType::fixed(TypeKind::U8)));

        let present = WireValue::some(WireValue::U8(5));
        assert_eq!(encode_to_vec(&schema, &present).unwrap(), vec![0x01, 0x05]);
        assert_eq!(round_trip(&schema, &present), present);

        let absent = WireValue::none();
        assert_eq!(encode_to_vec(&schema, &absent).unwrap(), vec![0x00]);
        assert_eq!(round_trip(&schema, &absent), absent);
    }

    #[test]
    fn invalid_optional_tag_fails() {
        let schema = single(SchemaType::optional(SchemaType::fixed(TypeKind::U8)));
        let err = decode_from_slice(&schema, &[0x02, 0x05]).unwrap_err();
        assert_eq!(err.code(), "E101");
    }

    #[test]
    fn list_wire_form() {
        let schema = single(SchemaType::list(SchemaType::fixed(TypeKind::U16)));
        let value = WireValue::List(vec![WireValue::U16(1), WireValue::U16(2)]);
        assert_eq!(
            encode_to_vec(&schema, &value).unwrap(),
            vec![0x02, 0x01, 0x00, 0x02, 0x00]
        );
        assert_eq!(round_trip(&schema, &value), value);
    }

    #[test]
    fn union_wire_form() {
        let schema = single(SchemaType::union([
            (0, SchemaType::unit()),
            (3, SchemaType::fixed(TypeKind::U16)),
        ]));
        let value = WireValue::union(3, WireValue::U16(7));
        assert_eq!(
            encode_to_vec(&schema, &value).unwrap(),
            vec![0x03, 0x07, 0x00]
        );
        assert_eq!(round_trip(&schema, &value), value);

        // Tag-only case.
        let unit_case = WireValue::union(0, WireValue::Unit);
        assert_eq!(encode_to_vec(&schema, &unit_case).unwrap(), vec![0x00]);
        assert_eq!(round_trip(&schema, &unit_case), unit_case);
    }

    #[test]
    fn unknown_union_tag_fails_both_ways() {
        let schema = single(SchemaType::union([(0, SchemaType::fixed(TypeKind::U16))]));

        let err = decode_from_slice(&schema, &[0x07, 0x01, 0x00]).unwrap_err();
        assert_eq!(err.code(), "E101");

        let err = encode_to_vec(&schema, &WireValue::union(7, WireValue::U16(1))).unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn string_wire_form() {
        let schema = single(SchemaType::string());
        let value = WireValue::from("hi");
        assert_eq!(
            encode_to_vec(&schema, &value).unwrap(),
            vec![0x02, 0x68, 0x69]
        );
        assert_eq!(round_trip(&schema, &value), value);
    }

    #[test]
    fn enum_wire_form() {
        let schema = single(SchemaType::enumeration(
            TypeKind::U8,
            [("idle", 0u64), ("busy", 300)],
        ));
        let value = WireValue::Enum("busy".to_string());
        assert_eq!(encode_to_vec(&schema, &value).unwrap(), vec![0xac, 0x02]);
        assert_eq!(round_trip(&schema, &value), value);

        // A wire value outside the variant set must not decode.
        let err = decode_from_slice(&schema, &[0x05]).unwrap_err();
        assert_eq!(err.code(), "E101");

        // An unknown name must not encode.
        let err =
            encode_to_vec(&schema, &WireValue::Enum("gone".to_string())).unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn fixed_data_wire_form() {
        let schema = single(SchemaType::FixedData { length: 4 });
        let value = WireValue::Data(vec![1, 2, 3, 4]);
        assert_eq!(encode_to_vec(&schema, &value).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(round_trip(&schema, &value), value);

        let err = encode_to_vec(&schema, &WireValue::Data(vec![1])).unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn fixed_list_consumes_exactly_n_elements() {
        let schema = single(SchemaType::fixed_list(SchemaType::fixed(TypeKind::U8), 2));

        // Trailing nonsense after the two elements is not detected; the
        // decoder consumes exactly two bytes and stops.
        let bytes = [0x0a, 0x0b, 0xff, 0xff, 0xff];
        let mut reader = WireReader::new(&bytes);
        let value = decode(&schema, &mut reader).unwrap();
        assert_eq!(
            value,
            WireValue::List(vec![WireValue::U8(0x0a), WireValue::U8(0x0b)])
        );
        assert_eq!(reader.position(), 2);

        // Wrong element count on encode is a caller error.
        let err = encode_to_vec(
            &schema,
            &WireValue::List(vec![WireValue::U8(1)]),
        )
        .unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn map_wire_form() {
        let schema = single(SchemaType::map(
            SchemaType::string(),
            SchemaType::varint(TypeKind::U64),
        ));
        let value = WireValue::Map(vec![
            (WireValue::from("a"), WireValue::U64(1)),
            (WireValue::from("b"), WireValue::U64(300)),
        ]);
        let bytes = encode_to_vec(&schema, &value).unwrap();
        assert_eq!(
            bytes,
            vec![0x02, 0x01, b'a', 0x01, 0x01, b'b', 0xac, 0x02]
        );
        assert_eq!(decode_from_slice(&schema, &bytes).unwrap(), value);
    }

    #[test]
    fn varint_primitives_narrow_on_decode() {
        let schema = single(SchemaType::varint(TypeKind::U8));
        // 300 does not fit a u8.
        let err = decode_from_slice(&schema, &[0xac, 0x02]).unwrap_err();
        assert_eq!(err.code(), "E101");

        assert_eq!(
            decode_from_slice(&schema, &[0x2a]).unwrap(),
            WireValue::U8(42)
        );
    }

    #[test]
    fn signed_varint_round_trip() {
        let schema = single(SchemaType::varint(TypeKind::I64));
        for v in [0i64, -1, 1, i64::MIN, i64::MAX] {
            let value = WireValue::I64(v);
            assert_eq!(round_trip(&schema, &value), value);
        }
        assert_eq!(
            encode_to_vec(&schema, &WireValue::I64(-1)).unwrap(),
            vec![0x01]
        );
    }

    #[test]
    fn struct_fields_encode_in_declaration_order() {
        let schema = single(SchemaType::record([
            StructField::new("a", SchemaType::fixed(TypeKind::U8)),
            StructField::new("b", SchemaType::fixed(TypeKind::U16)),
        ]));
        let value = WireValue::record([
            ("a", WireValue::U8(1)),
            ("b", WireValue::U16(0x0203)),
        ]);
        // No padding, no tags, declaration order.
        assert_eq!(
            encode_to_vec(&schema, &value).unwrap(),
            vec![0x01, 0x03, 0x02]
        );
        assert_eq!(round_trip(&schema, &value), value);

        // Out-of-order fields are rejected rather than silently reordered.
        let swapped = WireValue::record([
            ("b", WireValue::U16(0x0203)),
            ("a", WireValue::U8(1)),
        ]);
        let err = encode_to_vec(&schema, &swapped).unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn type_refs_resolve_during_coding() {
        let schema = Schema::builder()
            .add_type(
                "Inner",
                SchemaType::record([StructField::new("v", SchemaType::varint(TypeKind::U32))]),
            )
            .add_type(
                "Outer",
                SchemaType::record([
                    StructField::new("inner", SchemaType::reference("Inner")),
                    StructField::new("flag", SchemaType::fixed(TypeKind::Bool)),
                ]),
            )
            .root("Outer")
            .build()
            .unwrap();

        let value = WireValue::record([
            ("inner", WireValue::record([("v", WireValue::U32(300))])),
            ("flag", WireValue::Bool(true)),
        ]);
        assert_eq!(
            encode_to_vec(&schema, &value).unwrap(),
            vec![0xac, 0x02, 0x01]
        );
        assert_eq!(round_trip(&schema, &value), value);
    }

    #[test]
    fn nested_aggregates_round_trip() {
        let schema = single(SchemaType::list(SchemaType::optional(SchemaType::map(
            SchemaType::fixed(TypeKind::U8),
            SchemaType::string(),
        ))));
        let value = WireValue::List(vec![
            WireValue::none(),
            WireValue::some(WireValue::Map(vec![(
                WireValue::U8(1),
                WireValue::from("x"),
            )])),
        ]);
        assert_eq!(round_trip(&schema, &value), value);
    }

    #[test]
    fn wrong_value_shape_is_an_encoding_error() {
        let schema = single(SchemaType::fixed(TypeKind::U32));
        let err = encode_to_vec(&schema, &WireValue::from("nope")).unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn truncated_struct_decodes_to_nothing() {
        let schema = single(SchemaType::record([
            StructField::new("a", SchemaType::fixed(TypeKind::U32)),
            StructField::new("b", SchemaType::fixed(TypeKind::U32)),
        ]));
        let err = decode_from_slice(&schema, &[1, 0, 0, 0, 2]).unwrap_err();
        assert_eq!(err.code(), "E101");
    }
}
