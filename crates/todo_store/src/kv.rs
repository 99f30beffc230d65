//! Key-value todo store backed by a Redis hash.
//!
//! All todos live in a single hash. The field is the todo id and the value is
//! the JSON-encoded todo.

use async_trait::async_trait;
use entities::Todo;
use redis::{aio::ConnectionManager, AsyncCommands, IntoConnectionInfo};
use tracing::{debug, info, warn};

use crate::{parse_id, TodoStore, TodoStoreResult, EXAMPLE_TODO_ID};

/// Key of the hash holding every todo.
pub const REDIS_TODO_KEY: &str = "todos";

/// Todo store on a Redis hash.
#[derive(Clone)]
pub struct RedisTodoStore {
    /// Connection manager, cloned per command
    conn: ConnectionManager,
    /// Redis URL for connecting
    redis_url: String,
}

impl RedisTodoStore {
    /// Connects to the Redis server at `redis_url`, authenticating with
    /// `password` when given.
    pub async fn connect(redis_url: &str, password: Option<&str>) -> TodoStoreResult<Self> {
        let mut info = redis_url.into_connection_info()?;
        if let Some(password) = password {
            info.redis.password = Some(password.to_string());
        }

        let client = redis::Client::open(info)?;
        let conn = ConnectionManager::new(client).await?;

        info!(redis_url = %redis_url, "Connected to Redis todo store");
        Ok(Self {
            conn,
            redis_url: redis_url.to_string(),
        })
    }

    /// Stores `todo` under its id.
    async fn write(&self, todo: &Todo) -> TodoStoreResult<()> {
        let encoded = todo.to_json()?;
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .hset(REDIS_TODO_KEY, todo.id.to_string(), encoded)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisTodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTodoStore")
            .field("redis_url", &self.redis_url)
            .finish()
    }
}

/// Decodes one hash value. A value that is not a valid todo counts as absent.
fn decode_entry(value: &str) -> Option<Todo> {
    match Todo::from_json(value) {
        Ok(todo) => Some(todo),
        Err(e) => {
            warn!("Skipping malformed todo entry: {}", e);
            None
        }
    }
}

/// Decodes the hash values, skipping entries that are not valid todos.
fn decode_all(values: Vec<String>) -> Vec<Todo> {
    values.iter().filter_map(|value| decode_entry(value)).collect()
}

#[async_trait]
impl TodoStore for RedisTodoStore {
    async fn init_data(&self) -> TodoStoreResult<bool> {
        let mut conn = self.conn.clone();
        let count: i64 = conn.hlen(REDIS_TODO_KEY).await?;
        if count > 0 {
            debug!(count, "Todo hash already populated");
            return Ok(true);
        }

        info!("Seeding example todo");
        self.insert(&Todo::example(EXAMPLE_TODO_ID)).await
    }

    async fn insert(&self, todo: &Todo) -> TodoStoreResult<bool> {
        self.write(todo).await?;
        Ok(true)
    }

    async fn get_all(&self) -> TodoStoreResult<Vec<Todo>> {
        let mut conn = self.conn.clone();
        let values: Vec<String> = conn.hvals(REDIS_TODO_KEY).await?;
        let mut todos = decode_all(values);
        todos.sort_by_key(|t| t.id);
        Ok(todos)
    }

    async fn get_certain(&self, id: &str) -> TodoStoreResult<Option<Todo>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(REDIS_TODO_KEY, id.to_string()).await?;
        Ok(value.as_deref().and_then(decode_entry))
    }

    async fn update(&self, id: &str, new: &Todo) -> TodoStoreResult<Option<Todo>> {
        let Some(old) = self.get_certain(id).await? else {
            return Ok(None);
        };

        let merged = old.merge(new);
        self.write(&merged).await?;
        Ok(Some(merged))
    }

    async fn delete(&self, id: &str) -> TodoStoreResult<bool> {
        if let Some(id) = parse_id(id) {
            let mut conn = self.conn.clone();
            let _: i64 = conn.hdel(REDIS_TODO_KEY, id.to_string()).await?;
        }
        Ok(true)
    }

    async fn delete_all(&self) -> TodoStoreResult<bool> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(REDIS_TODO_KEY).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_skips_malformed_entries() {
        let values = vec![
            Todo::new(2, "b", false, 2, "u").to_json().unwrap(),
            "{not json".to_string(),
            Todo::new(1, "a", true, 1, "u").to_json().unwrap(),
        ];

        let todos = decode_all(values);

        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].id, 2);
        assert_eq!(todos[1].id, 1);
    }

    #[test]
    fn test_malformed_entry_reads_as_absent() {
        assert_eq!(decode_entry("{not json"), None);
        assert_eq!(decode_entry(r#"{"completed":"yes"}"#), None);

        let todo = Todo::new(3, "c", false, 3, "u");
        assert_eq!(decode_entry(&todo.to_json().unwrap()), Some(todo));
    }

    #[test]
    fn test_hash_value_round_trip() {
        let todo = Todo::new(5, "buy milk", false, 1, "http://localhost:8082/todos/5");
        let stored = todo.to_json().unwrap();
        assert_eq!(decode_all(vec![stored]), vec![todo]);
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisTodoStore::connect("not a redis url", None).await;
        assert!(result.is_err());
    }

    /// Needs a Redis server at `REDIS_URL`. Clears the todo hash.
    #[tokio::test]
    #[ignore]
    async fn test_against_live_server() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let store = RedisTodoStore::connect(&url, None).await.unwrap();

        assert!(store.delete_all().await.unwrap());
        assert!(store.init_data().await.unwrap());
        assert_eq!(store.get_all().await.unwrap(), vec![Todo::example(EXAMPLE_TODO_ID)]);

        let todo = Todo::new(7, "x", false, 3, "http://localhost/todos/7");
        assert!(store.insert(&todo).await.unwrap());
        assert_eq!(store.get_certain("7").await.unwrap(), Some(todo));

        let patch = Todo {
            completed: Some(true),
            ..Default::default()
        };
        let merged = store.update("7", &patch).await.unwrap().unwrap();
        assert_eq!(merged, Todo::new(7, "x", true, 3, "http://localhost/todos/7"));
        assert_eq!(store.update("70", &patch).await.unwrap(), None);

        assert!(store.delete("7").await.unwrap());
        assert!(store.delete("7").await.unwrap());
        assert_eq!(store.get_certain("7").await.unwrap(), None);

        assert!(store.delete_all().await.unwrap());
        assert!(store.delete_all().await.unwrap());
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
