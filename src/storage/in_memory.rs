//! In-memory implementation of DataService for development and tests

use crate::core::entity::{Entity, EntityId};
use crate::core::service::DataService;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory data service for one entity type
///
/// Rows are kept ordered by id. Ids start at 1 and are never reused, even
/// after a delete. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    table: Arc<RwLock<Table<T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new empty service
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_indexed<T: Entity>(field: &str) -> Result<()> {
    if T::indexed_fields().contains(&field) {
        Ok(())
    } else {
        Err(anyhow!(
            "Field '{}' is not indexed for {}",
            field,
            T::resource_name()
        ))
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, mut entity: T) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = table.next_id;
        table.next_id += 1;
        entity.set_id(id);
        table.rows.insert(id, entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: EntityId) -> Result<Option<T>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, id: EntityId, mut entity: T) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let row = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| anyhow!("{} {} not found", T::resource_name_singular(), id))?;

        entity.set_id(id);
        *row = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<bool> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(table.rows.remove(&id).is_some())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        ensure_indexed::<T>(field)?;

        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table
            .rows
            .values()
            .filter(|row| row.field_value(field).as_deref() == Some(value))
            .cloned()
            .collect())
    }

    async fn delete_where(&self, field: &str, value: &str) -> Result<usize> {
        ensure_indexed::<T>(field)?;

        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let before = table.rows.len();
        table
            .rows
            .retain(|_, row| row.field_value(field).as_deref() != Some(value));

        Ok(before - table.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: EntityId,
        name: String,
        group: u64,
    }

    impl Item {
        fn new(name: &str, group: u64) -> Self {
            Self {
                id: 0,
                name: name.to_string(),
                group,
            }
        }
    }

    impl Entity for Item {
        fn resource_name() -> &'static str {
            "items"
        }

        fn resource_name_singular() -> &'static str {
            "item"
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn set_id(&mut self, id: EntityId) {
            self.id = id;
        }

        fn indexed_fields() -> &'static [&'static str] {
            &["name", "group"]
        }

        fn field_value(&self, field: &str) -> Option<String> {
            match field {
                "name" => Some(self.name.clone()),
                "group" => Some(self.group.to_string()),
                _ => None,
            }
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let service = InMemoryDataService::<Item>::new();

        let first = service.create(Item::new("book", 1)).await.unwrap();
        let second = service.create(Item::new("pen", 1)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let service = InMemoryDataService::<Item>::new();

        let first = service.create(Item::new("book", 1)).await.unwrap();
        assert!(service.delete(first.id).await.unwrap());

        let second = service.create(Item::new("pen", 1)).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let service = InMemoryDataService::<Item>::new();
        service.create(Item::new("book", 1)).await.unwrap();
        service.create(Item::new("pen", 2)).await.unwrap();

        let retrieved = service.get(2).await.unwrap();
        assert_eq!(retrieved.map(|i| i.name), Some("pen".to_string()));
        assert!(service.get(3).await.unwrap().is_none());

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["book", "pen"]);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let service = InMemoryDataService::<Item>::new();
        service.create(Item::new("book", 1)).await.unwrap();

        let updated = service.update(1, Item::new("novel", 1)).await.unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(service.get(1).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let service = InMemoryDataService::<Item>::new();
        assert!(service.update(9, Item::new("ghost", 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let service = InMemoryDataService::<Item>::new();
        assert!(!service.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_exact_match() {
        let service = InMemoryDataService::<Item>::new();
        service.create(Item::new("book", 1)).await.unwrap();
        service.create(Item::new("book", 2)).await.unwrap();
        service.create(Item::new("Book", 2)).await.unwrap();

        let books = service.search("name", "book").await.unwrap();
        assert_eq!(books.len(), 2);

        let group_two = service.search("group", "2").await.unwrap();
        assert_eq!(group_two.len(), 2);
    }

    #[tokio::test]
    async fn test_search_unindexed_field_fails() {
        let service = InMemoryDataService::<Item>::new();
        assert!(service.search("colour", "red").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_where() {
        let service = InMemoryDataService::<Item>::new();
        service.create(Item::new("book", 1)).await.unwrap();
        service.create(Item::new("pen", 1)).await.unwrap();
        service.create(Item::new("ink", 2)).await.unwrap();

        let removed = service.delete_where("group", "1").await.unwrap();
        assert_eq!(removed, 2);

        let remaining = service.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "ink");
    }
}
