//! The decoded dynamic value form.
//!
//! `WireValue` is what the schema-directed decoder produces and what the
//! encoder consumes. It mirrors the wire forms one-to-one: optionals are a
//! presence sum (never conflated with their tag byte), maps keep pair
//! order, unions carry their tag alongside the boxed payload.

/// A decoded BARE value.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer (also the carrier for word-sized `uint`).
    U64(u64),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer (also the carrier for word-sized `int`).
    I64(i64),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// Boolean.
    Bool(bool),
    /// The unit value (a tag-only union payload).
    Unit,
    /// UTF-8 string.
    String(String),
    /// Byte blob (length-prefixed or fixed).
    Data(Vec<u8>),
    /// An enum constant, by variant name.
    Enum(String),
    /// A possibly-absent value.
    Optional(Option<Box<WireValue>>),
    /// A sequence of values.
    List(Vec<WireValue>),
    /// Key/value pairs in encounter order.
    Map(Vec<(WireValue, WireValue)>),
    /// A tagged union case.
    Union {
        /// The case tag.
        tag: u32,
        /// The case payload.
        value: Box<WireValue>,
    },
    /// Named fields in declaration order.
    Struct(Vec<(String, WireValue)>),
}

impl WireValue {
    /// A short name for the value's shape, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bool(_) => "bool",
            Self::Unit => "void",
            Self::String(_) => "string",
            Self::Data(_) => "data",
            Self::Enum(_) => "enum",
            Self::Optional(_) => "optional",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Union { .. } => "union",
            Self::Struct(_) => "struct",
        }
    }

    /// Widen any unsigned integer variant to u64.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U8(v) => Some(u64::from(*v)),
            Self::U16(v) => Some(u64::from(*v)),
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Widen any signed integer variant to i64.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a float as f64.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Extract a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Data(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a struct field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&WireValue> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render the value as JSON for display purposes.
    ///
    /// Byte blobs render as lowercase hex strings; absent optionals render
    /// as `null`; maps with string keys render as objects, others as pair
    /// arrays.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{json, Value as Json};
        match self {
            Self::U8(v) => json!(v),
            Self::U16(v) => json!(v),
            Self::U32(v) => json!(v),
            Self::U64(v) => json!(v),
            Self::I8(v) => json!(v),
            Self::I16(v) => json!(v),
            Self::I32(v) => json!(v),
            Self::I64(v) => json!(v),
            Self::F32(v) => json!(v),
            Self::F64(v) => json!(v),
            Self::Bool(v) => json!(v),
            Self::Unit => Json::Null,
            Self::String(v) => json!(v),
            Self::Data(bytes) => json!(hex_string(bytes)),
            Self::Enum(name) => json!(name),
            Self::Optional(inner) => match inner {
                Some(v) => v.to_json(),
                None => Json::Null,
            },
            Self::List(items) => Json::Array(items.iter().map(WireValue::to_json).collect()),
            Self::Map(pairs) => {
                let all_string_keys = pairs.iter().all(|(k, _)| matches!(k, Self::String(_)));
                if all_string_keys {
                    let map = pairs
                        .iter()
                        .map(|(k, v)| {
                            let key = match k {
                                Self::String(s) => s.clone(),
                                _ => unreachable!(),
                            };
                            (key, v.to_json())
                        })
                        .collect();
                    Json::Object(map)
                } else {
                    Json::Array(
                        pairs
                            .iter()
                            .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                            .collect(),
                    )
                }
            }
            Self::Union { tag, value } => json!({ "tag": tag, "value": value.to_json() }),
            Self::Struct(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(name, v)| (name.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Wrap a value in a present optional.
    #[must_use]
    pub fn some(value: WireValue) -> Self {
        Self::Optional(Some(Box::new(value)))
    }

    /// The absent optional.
    #[must_use]
    pub fn none() -> Self {
        Self::Optional(None)
    }

    /// Build a union value.
    #[must_use]
    pub fn union(tag: u32, value: WireValue) -> Self {
        Self::Union {
            tag,
            value: Box::new(value),
        }
    }

    /// Build a struct value from named fields.
    #[must_use]
    pub fn record<N, I>(fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, WireValue)>,
    {
        Self::Struct(fields.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }
}

fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

impl From<u8> for WireValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for WireValue {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for WireValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for WireValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<bool> for WireValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors() {
        assert_eq!(WireValue::U16(7).as_u64(), Some(7));
        assert_eq!(WireValue::I8(-2).as_i64(), Some(-2));
        assert_eq!(WireValue::F32(1.5).as_f64(), Some(1.5));
        assert_eq!(WireValue::Bool(true).as_bool(), Some(true));
        assert_eq!(WireValue::from("x").as_str(), Some("x"));
        assert_eq!(WireValue::U16(7).as_i64(), None);
    }

    #[test]
    fn struct_field_lookup() {
        let value = WireValue::record([("a", WireValue::U8(1)), ("b", WireValue::U8(2))]);
        assert_eq!(value.field("b"), Some(&WireValue::U8(2)));
        assert_eq!(value.field("c"), None);
    }

    #[test]
    fn json_rendering() {
        let value = WireValue::record([
            ("id", WireValue::U32(7)),
            ("name", WireValue::from("ada")),
            ("blob", WireValue::Data(vec![0xde, 0xad])),
            ("missing", WireValue::none()),
            ("extra", WireValue::some(WireValue::Bool(true))),
        ]);
        let json = value.to_json();
        assert_eq!(json["id"], json!(7));
        assert_eq!(json["name"], json!("ada"));
        assert_eq!(json["blob"], json!("dead"));
        assert_eq!(json["missing"], serde_json::Value::Null);
        assert_eq!(json["extra"], json!(true));
    }

    #[test]
    fn json_map_rendering_depends_on_key_type() {
        let string_keys = WireValue::Map(vec![(
            WireValue::from("k"),
            WireValue::U8(1),
        )]);
        assert!(string_keys.to_json().is_object());

        let int_keys = WireValue::Map(vec![(WireValue::U8(3), WireValue::U8(1))]);
        assert!(int_keys.to_json().is_array());
    }

    #[test]
    fn union_json_carries_the_tag() {
        let value = WireValue::union(3, WireValue::U16(7));
        assert_eq!(value.to_json(), json!({"tag": 3, "value": 7}));
    }
}
