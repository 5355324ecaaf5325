//! BAREWire core library.
//!
//! Schema-driven binary serialization in the BARE (Binary Application
//! Record Encoding) wire format, with typed zero-copy memory views layered
//! on top of the same schemas.
//!
//! # Key components
//!
//! - **Schema**: algebraic type model, batch-accumulating validator,
//!   size/alignment analysis, and compatibility classification between
//!   schema versions
//! - **Wire**: streaming BARE encoder/decoder over every primitive and
//!   aggregate form (varints, length-prefixed strings and blobs, optionals,
//!   lists, maps, tagged unions, structs)
//! - **View**: schema-driven field-offset computation and random-access
//!   reads/writes over a borrowed byte region
//! - **Hardware**: peripheral descriptor shapes consumed by external
//!   register-map generators
//!
//! # Example
//!
//! ```ignore
//! use barewire_core::prelude::*;
//!
//! let schema = Schema::builder()
//!     .add_type("Point", SchemaType::record([
//!         StructField::new("x", SchemaType::fixed(TypeKind::F32)),
//!         StructField::new("y", SchemaType::fixed(TypeKind::F32)),
//!     ]))
//!     .root("Point")
//!     .build()?;
//!
//! let value = WireValue::record([
//!     ("x", WireValue::F32(1.0)),
//!     ("y", WireValue::F32(2.0)),
//! ]);
//! let bytes = codec::encode_to_vec(&schema, &value)?;
//! let decoded = codec::decode_from_slice(&schema, &bytes)?;
//! assert_eq!(decoded, value);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hardware;
pub mod platform;
pub mod prelude;
pub mod schema;
pub mod view;
pub mod wire;

// Re-export key types at crate root for convenience
pub use error::{BareError, Result};
pub use platform::{PlatformContext, TypeKind};
pub use schema::{Schema, SchemaBuilder, SchemaType, StructField};
pub use view::{SchemaView, SchemaViewMut, ViewLayout};
pub use wire::{WireBuffer, WireReader, WireValue};
