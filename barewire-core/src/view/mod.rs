//! Typed memory views: schema-driven field offsets and random access.
//!
//! [`ViewLayout`] turns a validated schema into a dotted-path offset map;
//! [`SchemaView`] and [`SchemaViewMut`] layer bounds-checked reads and
//! writes over a borrowed byte region. Concurrent reads through separate
//! shared views are safe; mutation requires the exclusive view.

mod layout;
#[allow(clippy::module_inception)]
mod view;

pub use layout::{FieldSlot, ViewLayout};
pub use view::{SchemaView, SchemaViewMut};
