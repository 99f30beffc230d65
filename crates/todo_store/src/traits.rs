//! Todo store trait definitions.

use async_trait::async_trait;
use entities::Todo;

use crate::TodoStoreResult;

/// Id of the example record seeded into an empty store.
pub const EXAMPLE_TODO_ID: i32 = 1;

/// Trait for todo storage operations.
///
/// Ids are passed as text, the way they arrive in request paths. An id that is
/// not a decimal integer never matches a stored todo.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Ensures the underlying storage exists and seeds the example todo when
    /// the collection is empty.
    async fn init_data(&self) -> TodoStoreResult<bool>;

    /// Stores a fully populated todo, replacing any todo with the same id.
    async fn insert(&self, todo: &Todo) -> TodoStoreResult<bool>;

    /// Lists every stored todo.
    async fn get_all(&self) -> TodoStoreResult<Vec<Todo>>;

    /// Gets a todo by ID.
    async fn get_certain(&self, id: &str) -> TodoStoreResult<Option<Todo>>;

    /// Merges `new` into the stored todo and writes the result back.
    ///
    /// Returns `None` if no todo has this id. The read and the write are
    /// separate store operations, so concurrent updates of the same todo can
    /// overwrite each other.
    async fn update(&self, id: &str, new: &Todo) -> TodoStoreResult<Option<Todo>>;

    /// Deletes a todo. Succeeds whether or not the todo existed.
    async fn delete(&self, id: &str) -> TodoStoreResult<bool>;

    /// Deletes every todo.
    async fn delete_all(&self) -> TodoStoreResult<bool>;

    /// Returns the largest stored id, or `0` for an empty store.
    async fn max_id(&self) -> TodoStoreResult<i32> {
        let todos = self.get_all().await?;
        Ok(todos.iter().map(|t| t.id).max().unwrap_or(0))
    }
}

/// Parses a textual todo id.
pub fn parse_id(id: &str) -> Option<i32> {
    id.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999"), None);
    }
}
