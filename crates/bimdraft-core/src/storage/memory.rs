//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::drawing::Drawing;
use crate::wall_types::WallTypeRegistry;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    drawings: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, drawing: &Drawing) -> StorageResult<()> {
        let json = drawing
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut drawings = self.drawings.write().map_err(lock_error)?;
        drawings.insert(id.to_string(), json);
        Ok(())
    }

    fn load(&self, id: &str, registry: &WallTypeRegistry) -> StorageResult<Drawing> {
        let drawings = self.drawings.read().map_err(lock_error)?;
        let json = drawings
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Drawing::from_json(json, registry).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut drawings = self.drawings.write().map_err(lock_error)?;
        drawings.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let drawings = self.drawings.read().map_err(lock_error)?;
        Ok(drawings.keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let drawings = self.drawings.read().map_err(lock_error)?;
        Ok(drawings.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;
    use crate::geometry::Vector2;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut drawing = Drawing::new();
        let id = drawing.add_entity(Line::new(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0)));

        storage.save("test", &drawing).unwrap();
        let loaded = storage.load("test", &WallTypeRegistry::with_defaults()).unwrap();

        assert_eq!(drawing.id, loaded.id);
        assert!(loaded.contains(id));
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = storage.load("nonexistent", &WallTypeRegistry::with_defaults());

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let drawing = Drawing::new();

        assert!(!storage.exists("test").unwrap());
        storage.save("test", &drawing).unwrap();
        assert!(storage.exists("test").unwrap());
        storage.delete("test").unwrap();
        assert!(!storage.exists("test").unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        let drawing = Drawing::new();

        storage.save("doc1", &drawing).unwrap();
        storage.save("doc2", &drawing).unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"doc1".to_string()));
        assert!(list.contains(&"doc2".to_string()));
    }
}
