//! Append-only store for extracted values.
//!
//! Two independent SQLite tables, `emails` and `phones`, created at startup
//! if absent. Rows are never updated or deleted and duplicates accumulate
//! freely; there is deliberately no uniqueness constraint.

use rusqlite::{params, Connection};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Errors raised by the record store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying SQLite failure
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Which of the two record tables an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Extracted email addresses
    Email,
    /// Extracted phone numbers
    Phone,
}

impl RecordKind {
    const fn table(self) -> &'static str {
        match self {
            Self::Email => "emails",
            Self::Phone => "phones",
        }
    }

    const fn column(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// Record store adapter over a single SQLite connection.
///
/// The connection is guarded by an async mutex; each append or list takes
/// the lock for the duration of one statement. Constructed once at process
/// start and passed to handlers as an explicit dependency.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) the database file and both tables.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self::from_connection(conn)?;
        info!("Record store opened at {}", path);
        Ok(store)
    }

    /// Opens a throwaway in-memory store, used by tests.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS emails (
                id    TEXT PRIMARY KEY,
                email TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS phones (
                id    TEXT PRIMARY KEY,
                phone TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Appends one value to the given table with a fresh generated id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the insert fails.
    pub async fn append(&self, kind: RecordKind, value: &str) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {} (id, {}) VALUES (?1, ?2)",
            kind.table(),
            kind.column()
        );
        let conn = self.conn.lock().await;
        conn.execute(&sql, params![Uuid::new_v4().to_string(), value])?;
        Ok(())
    }

    /// Returns every stored value of the given kind in storage order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the query fails.
    pub async fn list_all(&self, kind: RecordKind) -> Result<Vec<String>, StorageError> {
        let sql = format!("SELECT {} FROM {} ORDER BY rowid", kind.column(), kind.table());
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_list_round_trip() -> Result<(), StorageError> {
        let store = Store::open_in_memory()?;
        store.append(RecordKind::Email, "a@b.com").await?;
        store.append(RecordKind::Email, "x@y.org").await?;

        let emails = store.list_all(RecordKind::Email).await?;
        assert_eq!(emails, vec!["a@b.com", "x@y.org"]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicates_are_kept() -> Result<(), StorageError> {
        let store = Store::open_in_memory()?;
        store.append(RecordKind::Phone, "+79123456789").await?;
        store.append(RecordKind::Phone, "+79123456789").await?;

        let phones = store.list_all(RecordKind::Phone).await?;
        assert_eq!(phones.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn tables_are_independent() -> Result<(), StorageError> {
        let store = Store::open_in_memory()?;
        store.append(RecordKind::Email, "a@b.com").await?;

        assert!(store.list_all(RecordKind::Phone).await?.is_empty());
        assert_eq!(store.list_all(RecordKind::Email).await?.len(), 1);
        Ok(())
    }
}
