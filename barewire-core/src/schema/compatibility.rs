//! Schema compatibility analysis.
//!
//! Compares the roots of two schema versions and classifies the pair as
//! fully, backward, or forward compatible, or incompatible. Classification
//! only — no migration is performed. Field renaming, reordering, and case
//! renumbering are deliberately not recognized.

use std::fmt;

use super::model::{Schema, SchemaType};

/// The verdict of a compatibility check between two schema versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Every message of either version decodes under the other.
    FullyCompatible,
    /// Messages of the old version decode under the new version.
    BackwardCompatible,
    /// Messages of the new version decode under the old version.
    ForwardCompatible,
    /// Neither direction is safe.
    Incompatible(String),
}

impl Compatibility {
    /// Check for full compatibility.
    #[must_use]
    pub fn is_fully_compatible(&self) -> bool {
        matches!(self, Self::FullyCompatible)
    }

    /// Check that at least one direction is safe.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        !matches!(self, Self::Incompatible(_))
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullyCompatible => write!(f, "fully compatible"),
            Self::BackwardCompatible => write!(f, "backward compatible"),
            Self::ForwardCompatible => write!(f, "forward compatible"),
            Self::Incompatible(reason) => write!(f, "incompatible: {}", reason),
        }
    }
}

/// Classify the compatibility of two schema versions by their roots.
#[must_use]
pub fn check_compatibility(old: &Schema, new: &Schema) -> Compatibility {
    let old_root = old.root_type();
    let new_root = new.root_type();

    match (old_root, new_root) {
        (SchemaType::Struct { fields: old_fields }, SchemaType::Struct { fields: new_fields }) => {
            let shared = old_fields.len().min(new_fields.len());
            for (old_field, new_field) in old_fields.iter().zip(new_fields.iter()).take(shared) {
                if old_field.name != new_field.name
                    || !structurally_compatible(&old_field.ty, &new_field.ty)
                {
                    return Compatibility::Incompatible("Incompatible struct types".to_string());
                }
            }
            if old_fields.len() == new_fields.len() {
                Compatibility::FullyCompatible
            } else if new_fields.len() > old_fields.len() {
                Compatibility::BackwardCompatible
            } else {
                Compatibility::Incompatible("Incompatible struct types".to_string())
            }
        }
        (SchemaType::Union { cases: old_cases }, SchemaType::Union { cases: new_cases }) => {
            let old_in_new = old_cases.iter().all(|(tag, payload)| {
                new_cases
                    .get(tag)
                    .is_some_and(|other| structurally_compatible(payload, other))
            });
            let new_in_old = new_cases.iter().all(|(tag, payload)| {
                old_cases
                    .get(tag)
                    .is_some_and(|other| structurally_compatible(other, payload))
            });
            match (old_in_new, new_in_old) {
                (true, true) => Compatibility::FullyCompatible,
                (true, false) => Compatibility::BackwardCompatible,
                (false, true) => Compatibility::ForwardCompatible,
                (false, false) => {
                    Compatibility::Incompatible("Incompatible union types".to_string())
                }
            }
        }
        _ => {
            if structurally_compatible(old_root, new_root) {
                Compatibility::FullyCompatible
            } else {
                Compatibility::Incompatible("Root types are different".to_string())
            }
        }
    }
}

/// Recursive structural compatibility over matching constructors.
///
/// Type references compare by name; no alpha-renaming is attempted.
fn structurally_compatible(old: &SchemaType, new: &SchemaType) -> bool {
    match (old, new) {
        (
            SchemaType::Primitive {
                kind: ok,
                encoding: oe,
            },
            SchemaType::Primitive {
                kind: nk,
                encoding: ne,
            },
        ) => ok == nk && oe == ne,
        (SchemaType::FixedData { length: ol }, SchemaType::FixedData { length: nl }) => ol == nl,
        (
            SchemaType::Enum {
                base: ob,
                variants: ov,
            },
            SchemaType::Enum {
                base: nb,
                variants: nv,
            },
        ) => ob == nb && ov == nv,
        (SchemaType::Optional(o), SchemaType::Optional(n)) => structurally_compatible(o, n),
        (SchemaType::List(o), SchemaType::List(n)) => structurally_compatible(o, n),
        (
            SchemaType::FixedList {
                element: oe,
                length: ol,
            },
            SchemaType::FixedList {
                element: ne,
                length: nl,
            },
        ) => ol == nl && structurally_compatible(oe, ne),
        (
            SchemaType::Map { key: ok, value: ov },
            SchemaType::Map { key: nk, value: nv },
        ) => structurally_compatible(ok, nk) && structurally_compatible(ov, nv),
        (SchemaType::Union { cases: oc }, SchemaType::Union { cases: nc }) => {
            oc.len() == nc.len()
                && oc.iter().all(|(tag, payload)| {
                    nc.get(tag)
                        .is_some_and(|other| structurally_compatible(payload, other))
                })
        }
        (SchemaType::Struct { fields: of }, SchemaType::Struct { fields: nf }) => {
            of.len() == nf.len()
                && of.iter().zip(nf.iter()).all(|(o, n)| {
                    o.name == n.name && structurally_compatible(&o.ty, &n.ty)
                })
        }
        (SchemaType::TypeRef(o), SchemaType::TypeRef(n)) => o == n,
        _ => false,
    }
}

/// A single field-level difference between two struct roots.
#[derive(Debug, Clone)]
pub struct SchemaChange {
    /// The name of the field affected by this change.
    pub field: String,
    /// The previous type of the field, if it existed.
    pub old_type: Option<String>,
    /// The new type of the field, if it exists.
    pub new_type: Option<String>,
    /// Human-readable description of what changed.
    pub description: String,
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if let (Some(old), Some(new)) = (&self.old_type, &self.new_type) {
            write!(f, " ({} -> {})", old, new)?;
        }
        Ok(())
    }
}

/// Compatibility verdict plus the field-level differences behind it.
#[derive(Debug, Clone)]
pub struct CompatibilityReport {
    /// The overall verdict.
    pub verdict: Compatibility,
    /// Field-level changes (populated for struct roots).
    pub changes: Vec<SchemaChange>,
}

/// Produce a verdict and, for struct roots, the per-field change list.
#[must_use]
pub fn report(old: &Schema, new: &Schema) -> CompatibilityReport {
    let verdict = check_compatibility(old, new);
    let mut changes = Vec::new();

    if let (SchemaType::Struct { fields: old_fields }, SchemaType::Struct { fields: new_fields }) =
        (old.root_type(), new.root_type())
    {
        let shared = old_fields.len().min(new_fields.len());
        for (old_field, new_field) in old_fields.iter().zip(new_fields.iter()).take(shared) {
            if old_field.name != new_field.name {
                changes.push(SchemaChange {
                    field: old_field.name.clone(),
                    old_type: Some(old_field.ty.to_string()),
                    new_type: Some(new_field.ty.to_string()),
                    description: format!(
                        "field renamed or reordered: `{}` became `{}`",
                        old_field.name, new_field.name
                    ),
                });
            } else if !structurally_compatible(&old_field.ty, &new_field.ty) {
                changes.push(SchemaChange {
                    field: old_field.name.clone(),
                    old_type: Some(old_field.ty.to_string()),
                    new_type: Some(new_field.ty.to_string()),
                    description: format!("field `{}` changed type", old_field.name),
                });
            }
        }
        for removed in &old_fields[shared..] {
            changes.push(SchemaChange {
                field: removed.name.clone(),
                old_type: Some(removed.ty.to_string()),
                new_type: None,
                description: format!("field `{}` removed", removed.name),
            });
        }
        for added in &new_fields[shared..] {
            changes.push(SchemaChange {
                field: added.name.clone(),
                old_type: None,
                new_type: Some(added.ty.to_string()),
                description: format!("field `{}` appended", added.name),
            });
        }
    }

    CompatibilityReport { verdict, changes }
}
