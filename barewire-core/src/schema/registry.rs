//! Named storage of validated schemas with JSON persistence.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::model::{validation_failure, Schema, SchemaDocument};
use crate::error::{BareError, Result};

/// Registry for validated schemas.
///
/// Schemas are immutable once built, so the registry hands out shared
/// handles; re-registering a name replaces the handle, never the schema
/// behind existing ones.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<Schema>>>,
}

/// On-disk registry format.
#[derive(Serialize, Deserialize)]
struct RegistryData {
    schemas: Vec<RegistryEntry>,
}

#[derive(Serialize, Deserialize)]
struct RegistryEntry {
    name: String,
    schema: SchemaDocument,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Register a schema under a name, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        tracing::debug!(name = %name, types = schema.len(), "registering schema");
        self.schemas.write().insert(name, Arc::new(schema));
    }

    /// Get a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Check if a schema is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Get all registered schema names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Persist the registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let schemas = self.schemas.read();
        let mut entries: Vec<RegistryEntry> = schemas
            .iter()
            .map(|(name, schema)| RegistryEntry {
                name: name.clone(),
                schema: schema.to_document(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let data = RegistryData { schemas: entries };
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| BareError::invalid_value(format!("failed to serialize registry: {}", e)))?;
        std::fs::write(path, json).map_err(|e| {
            BareError::invalid_value(format!("failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), count = schemas.len(), "registry saved");
        Ok(())
    }

    /// Load a registry from a JSON file, re-validating every schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BareError::invalid_value(format!("failed to read {}: {}", path.display(), e))
        })?;
        let data: RegistryData = serde_json::from_str(&json)
            .map_err(|e| BareError::invalid_value(format!("failed to parse registry: {}", e)))?;

        let registry = Self::new();
        for entry in data.schemas {
            let schema = entry.schema.into_schema().map_err(validation_failure)?;
            registry.register(entry.name, schema);
        }
        Ok(registry)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TypeKind;
    use crate::schema::model::{SchemaType, StructField};

    fn point_schema() -> Schema {
        Schema::builder()
            .add_type(
                "Point",
                SchemaType::record([
                    StructField::new("x", SchemaType::fixed(TypeKind::F32)),
                    StructField::new("y", SchemaType::fixed(TypeKind::F32)),
                ]),
            )
            .root("Point")
            .build()
            .unwrap()
    }

    #[test]
    fn register_and_get() {
        let registry = SchemaRegistry::new();
        registry.register("point@v1", point_schema());

        assert!(registry.contains("point@v1"));
        assert!(!registry.contains("point@v2"));
        assert_eq!(registry.len(), 1);

        let schema = registry.get("point@v1").unwrap();
        assert_eq!(schema.root_name(), "Point");
    }

    #[test]
    fn names_are_sorted() {
        let registry = SchemaRegistry::new();
        registry.register("b", point_schema());
        registry.register("a", point_schema());
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let registry = SchemaRegistry::new();
        registry.register("point@v1", point_schema());
        registry.save(&path).unwrap();

        let restored = SchemaRegistry::load(&path).unwrap();
        assert_eq!(restored.len(), 1);
        let schema = restored.get("point@v1").unwrap();
        assert_eq!(*schema, point_schema());
    }

    #[test]
    fn load_missing_file_fails() {
        let err = SchemaRegistry::load("/nonexistent/registry.json").unwrap_err();
        assert_eq!(err.code(), "E301");
    }
}
