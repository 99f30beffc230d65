//! Relational todo store backed by SQLite.

use async_trait::async_trait;
use entities::Todo;
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow},
    Decode, Row, Sqlite, Type,
};
use tracing::{debug, info};

use crate::{parse_id, TodoStore, TodoStoreResult, EXAMPLE_TODO_ID};

const SQL_CREATE: &str = r#"CREATE TABLE IF NOT EXISTS todo (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT,
    completed BOOLEAN,
    "order" INTEGER,
    url TEXT
)"#;

// Statements taking a whole todo number their parameters after `bind_todo`.
const SQL_INSERT: &str =
    r#"INSERT OR REPLACE INTO todo (id, title, completed, "order", url) VALUES (?1, ?2, ?3, ?4, ?5)"#;
const SQL_UPDATE: &str =
    r#"UPDATE todo SET title = ?2, completed = ?3, "order" = ?4, url = ?5 WHERE id = ?1"#;

const SQL_QUERY: &str = "SELECT * FROM todo WHERE id = ?";
const SQL_QUERY_ALL: &str = "SELECT * FROM todo ORDER BY id";
const SQL_COUNT: &str = "SELECT COUNT(*) FROM todo";
const SQL_DELETE: &str = "DELETE FROM todo WHERE id = ?";
const SQL_DELETE_ALL: &str = "DELETE FROM todo";

/// Todo store on a SQL table.
#[derive(Debug, Clone)]
pub struct SqlTodoStore {
    pool: SqlitePool,
}

impl SqlTodoStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool for `database_url`.
    pub async fn connect(database_url: &str, max_pool_size: u32) -> TodoStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect(database_url)
            .await?;

        info!(max_pool_size, "Connected to SQL todo store");
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Binds every field of `todo` in column order.
fn bind_todo<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    todo: &'q Todo,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(todo.id)
        .bind(todo.title.as_deref())
        .bind(todo.completed)
        .bind(todo.order)
        .bind(todo.url.as_deref())
}

/// Reads a nullable column by name. Missing columns read as `None`.
fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Option<T>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get::<Option<T>, _>(name).ok().flatten()
}

fn todo_from_row(row: &SqliteRow) -> Todo {
    Todo {
        id: column(row, "id").unwrap_or_default(),
        title: column(row, "title"),
        completed: column(row, "completed"),
        order: column(row, "order"),
        url: column(row, "url"),
    }
}

#[async_trait]
impl TodoStore for SqlTodoStore {
    async fn init_data(&self) -> TodoStoreResult<bool> {
        sqlx::query(SQL_CREATE).execute(&self.pool).await?;

        let count: i64 = sqlx::query_scalar(SQL_COUNT).fetch_one(&self.pool).await?;
        if count > 0 {
            debug!(count, "Todo table already populated");
            return Ok(true);
        }

        info!("Seeding example todo");
        self.insert(&Todo::example(EXAMPLE_TODO_ID)).await
    }

    async fn insert(&self, todo: &Todo) -> TodoStoreResult<bool> {
        let result = bind_todo(sqlx::query(SQL_INSERT), todo)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_all(&self) -> TodoStoreResult<Vec<Todo>> {
        let rows = sqlx::query(SQL_QUERY_ALL).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(todo_from_row).collect())
    }

    async fn get_certain(&self, id: &str) -> TodoStoreResult<Option<Todo>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query(SQL_QUERY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(todo_from_row))
    }

    async fn update(&self, id: &str, new: &Todo) -> TodoStoreResult<Option<Todo>> {
        let Some(old) = self.get_certain(id).await? else {
            return Ok(None);
        };

        let merged = old.merge(new);
        let result = bind_todo(sqlx::query(SQL_UPDATE), &merged)
            .execute(&self.pool)
            .await?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(merged))
    }

    async fn delete(&self, id: &str) -> TodoStoreResult<bool> {
        if let Some(id) = parse_id(id) {
            sqlx::query(SQL_DELETE).bind(id).execute(&self.pool).await?;
        }
        Ok(true)
    }

    async fn delete_all(&self) -> TodoStoreResult<bool> {
        sqlx::query(SQL_DELETE_ALL).execute(&self.pool).await?;
        Ok(true)
    }
}
