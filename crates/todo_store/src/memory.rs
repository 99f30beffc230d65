//! In-memory todo store implementation for testing.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use entities::Todo;
use tokio::sync::RwLock;

use crate::{parse_id, TodoStore, TodoStoreResult, EXAMPLE_TODO_ID};

/// In-memory todo store for testing purposes.
///
/// Todos are kept ordered by id. Unlike the other stores, `update` holds the
/// write lock across the read and the write.
#[derive(Debug, Default, Clone)]
pub struct MemoryTodoStore {
    todos: Arc<RwLock<BTreeMap<i32, Todo>>>,
}

impl MemoryTodoStore {
    /// Creates a new in-memory todo store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn init_data(&self) -> TodoStoreResult<bool> {
        let mut todos = self.todos.write().await;
        if todos.is_empty() {
            todos.insert(EXAMPLE_TODO_ID, Todo::example(EXAMPLE_TODO_ID));
        }
        Ok(true)
    }

    async fn insert(&self, todo: &Todo) -> TodoStoreResult<bool> {
        let mut todos = self.todos.write().await;
        todos.insert(todo.id, todo.clone());
        Ok(true)
    }

    async fn get_all(&self) -> TodoStoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.values().cloned().collect())
    }

    async fn get_certain(&self, id: &str) -> TodoStoreResult<Option<Todo>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let todos = self.todos.read().await;
        Ok(todos.get(&id).cloned())
    }

    async fn update(&self, id: &str, new: &Todo) -> TodoStoreResult<Option<Todo>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let mut todos = self.todos.write().await;
        let Some(old) = todos.get_mut(&id) else {
            return Ok(None);
        };
        *old = old.merge(new);
        Ok(Some(old.clone()))
    }

    async fn delete(&self, id: &str) -> TodoStoreResult<bool> {
        if let Some(id) = parse_id(id) {
            self.todos.write().await.remove(&id);
        }
        Ok(true)
    }

    async fn delete_all(&self) -> TodoStoreResult<bool> {
        self.todos.write().await.clear();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryTodoStore::new();
        let todo = Todo::new(3, "write tests", false, 1, "http://localhost/todos/3");

        assert!(store.insert(&todo).await.unwrap());

        assert_eq!(store.get_certain("3").await.unwrap(), Some(todo));
        assert_eq!(store.get_certain("4").await.unwrap(), None);
        assert_eq!(store.get_certain("three").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_replaces_duplicate_id() {
        let store = MemoryTodoStore::new();
        store.insert(&Todo::new(1, "a", false, 1, "u")).await.unwrap();
        store.insert(&Todo::new(1, "b", true, 2, "u")).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_update_merges() {
        let store = MemoryTodoStore::new();
        store.insert(&Todo::new(5, "x", false, 1, "u")).await.unwrap();

        let patch = Todo {
            completed: Some(true),
            ..Default::default()
        };
        let merged = store.update("5", &patch).await.unwrap().unwrap();

        assert_eq!(merged, Todo::new(5, "x", true, 1, "u"));
        assert_eq!(store.get_certain("5").await.unwrap(), Some(merged));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryTodoStore::new();
        assert_eq!(store.update("8", &Todo::default()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryTodoStore::new();
        store.insert(&Todo::new(2, "x", false, 1, "u")).await.unwrap();

        assert!(store.delete("2").await.unwrap());
        assert!(store.delete("2").await.unwrap());
        assert_eq!(store.get_certain("2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_all_then_get_all_is_empty() {
        let store = MemoryTodoStore::new();
        store.init_data().await.unwrap();
        store.insert(&Todo::new(9, "x", false, 1, "u")).await.unwrap();

        assert!(store.delete_all().await.unwrap());
        assert!(store.delete_all().await.unwrap());
        assert!(store.get_all().await.unwrap().is_empty());
        assert_eq!(store.max_id().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_init_data_seeds_only_empty_store() {
        let store = MemoryTodoStore::new();
        assert!(store.init_data().await.unwrap());
        assert!(store.init_data().await.unwrap());
        assert_eq!(store.get_all().await.unwrap(), vec![Todo::example(EXAMPLE_TODO_ID)]);

        store.delete_all().await.unwrap();
        store.insert(&Todo::new(12, "mine", false, 1, "u")).await.unwrap();
        store.init_data().await.unwrap();
        assert_eq!(store.max_id().await.unwrap(), 12);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }
}
