//! File-based storage: one JSON file per drawing.

use super::{Storage, StorageError, StorageResult};
use crate::drawing::Drawing;
use crate::wall_types::WallTypeRegistry;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores drawings as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/bimdraft/drawings/`
    /// On Windows: `%LOCALAPPDATA%\bimdraft\drawings\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("bimdraft").join("drawings"))
    }

    /// File path for a drawing id; anything outside `[A-Za-z0-9_-]` becomes `_`.
    fn drawing_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, drawing: &Drawing) -> StorageResult<()> {
        let path = self.drawing_path(id);
        let json = drawing
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Saved drawing {} to {}", id, path.display());
        Ok(())
    }

    fn load(&self, id: &str, registry: &WallTypeRegistry) -> StorageResult<Drawing> {
        let path = self.drawing_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Drawing::from_json(&json, registry).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.drawing_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                    ids.push(name.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.drawing_path(id).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityTrait, Wall};
    use crate::geometry::Vector2;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let registry = WallTypeRegistry::with_defaults();

        let mut drawing = Drawing::new();
        drawing.name = "Ground floor".to_string();
        let wall = Wall::with_type_id(Vector2::new(0.0, 0.0), Vector2::new(12.0, 0.0), "cmu-8", &registry).unwrap();
        let id = drawing.add_entity(wall);

        storage.save("ground-floor", &drawing).unwrap();
        let loaded = storage.load("ground-floor", &registry).unwrap();

        assert_eq!(loaded.name, "Ground floor");
        let wall = loaded.get(id).and_then(|e| e.as_wall()).unwrap();
        assert_eq!(wall.wall_type().id, "cmu-8");
        assert_eq!(wall.id(), id);
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = storage.load("nonexistent", &WallTypeRegistry::with_defaults());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let drawing = Drawing::new();
        storage.save("doc1", &drawing).unwrap();
        storage.save("doc2", &drawing).unwrap();

        let mut list = storage.list().unwrap();
        list.sort();
        assert_eq!(list, vec!["doc1".to_string(), "doc2".to_string()]);

        storage.delete("doc1").unwrap();
        assert!(!storage.exists("doc1").unwrap());
        storage.delete("doc1").unwrap();
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let drawing = Drawing::new();
        storage.save("level 1/plan:a*", &drawing).unwrap();
        assert!(dir.path().join("level_1_plan_a_.json").exists());

        let loaded = storage.load("level 1/plan:a*", &WallTypeRegistry::with_defaults()).unwrap();
        assert_eq!(loaded.id, drawing.id);
    }

    #[test]
    fn test_unknown_wall_type_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let registry = WallTypeRegistry::with_defaults();

        let mut drawing = Drawing::new();
        drawing.add_entity(Wall::with_type_id(Vector2::ZERO, Vector2::new(1.0, 0.0), "cmu-8", &registry).unwrap());
        storage.save("walls", &drawing).unwrap();

        let result = storage.load("walls", &WallTypeRegistry::new());
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
