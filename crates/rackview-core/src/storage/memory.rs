//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::layout::LayoutDocument;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory layout store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    layouts: RwLock<HashMap<String, LayoutDocument>>,
}

fn lock_error<T>(e: PoisonError<T>) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, document: &LayoutDocument) -> BoxFuture<'_, StorageResult<()>> {
        let document = document.clone();
        Box::pin(async move {
            let mut layouts = self.layouts.write().map_err(lock_error)?;
            layouts.insert(document.id().to_string(), document);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<LayoutDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(lock_error)?;
            layouts.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.layouts.write().map_err(lock_error)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(lock_error)?;
            Ok(layouts.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.layouts.read().map_err(lock_error)?.contains_key(&id)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use crate::storage::block_on;
    use kurbo::Point;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut doc = LayoutDocument::new("Bay 1");
        doc.add_component(ComponentType::Rack, Point::new(20.0, 20.0));

        block_on(storage.save(&doc)).unwrap();
        let loaded = block_on(storage.load(&doc.id().to_string())).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_save_overwrites() {
        let storage = MemoryStorage::new();
        let mut doc = LayoutDocument::new("Bay 1");
        block_on(storage.save(&doc)).unwrap();
        doc.add_component(ComponentType::Beam, Point::ZERO);
        block_on(storage.save(&doc)).unwrap();

        let id = doc.id().to_string();
        assert_eq!(block_on(storage.list()).unwrap(), vec![id.clone()]);
        assert_eq!(block_on(storage.load(&id)).unwrap().components.len(), 1);
    }

    #[test]
    fn test_delete() {
        let storage = MemoryStorage::new();
        let doc = LayoutDocument::new("Bay 1");
        let id = doc.id().to_string();

        block_on(storage.save(&doc)).unwrap();
        assert!(block_on(storage.exists(&id)).unwrap());
        block_on(storage.delete(&id)).unwrap();
        assert!(!block_on(storage.exists(&id)).unwrap());
        block_on(storage.delete(&id)).unwrap();
    }
}
