//! Convenience re-exports of the common surface.

pub use crate::error::{BareError, Result};
pub use crate::platform::{PlatformContext, TypeKind};
pub use crate::schema::{
    check_compatibility, size_of, Compatibility, Schema, SchemaBuilder, SchemaRegistry,
    SchemaType, SizeInfo, StructField, WireEncoding,
};
pub use crate::view::{SchemaView, SchemaViewMut, ViewLayout};
pub use crate::wire::{codec, WireBuffer, WireReader, WireValue};
