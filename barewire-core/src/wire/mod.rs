//! The BARE wire codec.
//!
//! Two sequential APIs mirror each other: [`WireBuffer`] appends into an
//! owned growable buffer with a tracked position, and [`WireReader`]
//! consumes a borrowed slice behind an advancing cursor. On top of both,
//! [`codec`] drives schema-directed encoding of [`WireValue`]s.
//!
//! The format is bit-exact and platform-independent: multi-byte integers
//! are little-endian, floats are raw bit patterns, variable integers are
//! ULEB128 (zigzag-mapped when signed), and strings/blobs carry a varint
//! byte-length prefix.

pub mod codec;
pub mod primitives;
pub mod varint;

mod buffer;
mod reader;
mod value;

pub use buffer::{WireBuffer, DEFAULT_BUFFER_LIMIT};
pub use reader::WireReader;
pub use value::WireValue;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TypeKind;
    use crate::schema::{Schema, SchemaType, StructField};

    #[test]
    fn integration_test_message_round_trip() {
        // A realistic message: header struct, enum status, optional body,
        // list of tags, all behind type references.
        let schema = Schema::builder()
            .add_type(
                "Status",
                SchemaType::enumeration(TypeKind::U8, [("ok", 0u64), ("error", 1)]),
            )
            .add_type(
                "Message",
                SchemaType::record([
                    StructField::new("id", SchemaType::fixed(TypeKind::U64)),
                    StructField::new("status", SchemaType::reference("Status")),
                    StructField::new(
                        "body",
                        SchemaType::optional(SchemaType::string()),
                    ),
                    StructField::new("tags", SchemaType::list(SchemaType::string())),
                ]),
            )
            .root("Message")
            .build()
            .unwrap();

        let value = WireValue::record([
            ("id", WireValue::U64(42)),
            ("status", WireValue::Enum("ok".to_string())),
            ("body", WireValue::some(WireValue::from("hello"))),
            (
                "tags",
                WireValue::List(vec![WireValue::from("a"), WireValue::from("b")]),
            ),
        ]);

        let bytes = codec::encode_to_vec(&schema, &value).unwrap();
        let decoded = codec::decode_from_slice(&schema, &bytes).unwrap();
        assert_eq!(decoded, value);

        // The same bytes chained through an explicit reader land at the end.
        let mut reader = WireReader::new(&bytes);
        let _ = codec::decode(&schema, &mut reader).unwrap();
        assert!(reader.at_end());
    }
}
