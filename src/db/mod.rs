//! Database module for persistent storage.
//!
//! Provides async SQLite access using SQLx for phonebook entries and phone
//! numbers. Each entity gets a repository implementing [`CrudRepository`].

mod phone_numbers;
mod phonebook_entries;
mod sort;

pub use phone_numbers::PhoneNumberRepository;
pub use phonebook_entries::PhonebookEntryRepository;
pub use sort::{Direction, Sort, SortError};

use crate::domain::Entity;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{entity} references a missing record")]
    MissingReference { entity: &'static str },
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Classify a failed write, turning foreign key violations into
    /// [`DbError::MissingReference`].
    pub(crate) fn on_write(entity: &'static str, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::MissingReference { entity }
            }
            _ => DbError::Sqlx(err),
        }
    }
}

/// Generic per-entity store.
///
/// `save` inserts when the entity has no id (assigning one) and updates the
/// matching row otherwise.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Entity: Entity + Serialize + Send + Sync + 'static;

    /// Sortable properties as `(json property, column)` pairs.
    const SORT_COLUMNS: &'static [(&'static str, &'static str)];

    async fn save(&self, entity: Self::Entity) -> Result<Self::Entity, DbError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Self::Entity>, DbError>;

    async fn find_all(&self, sort: &Sort) -> Result<Vec<Self::Entity>, DbError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, DbError>;

    /// Returns whether a row was removed. Absent ids are not an error.
    async fn delete_by_id(&self, id: i64) -> Result<bool, DbError>;

    async fn count(&self) -> Result<i64, DbError>;
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents connection storms from blocking indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a new database connection, running migrations if needed.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let pool = if path == ":memory:" {
            // Uniquely named shared-cache database per call so parallel tests
            // never see each other's rows.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:phonebook-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .foreign_keys(true)
                .create_if_missing(true);

            // The database lives only as long as its last connection.
            SqlitePoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(
                    path = %parent.display(),
                    error = %e,
                    "Failed to create database directory"
                );
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        Self::run_migrations(&pool).await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Internal(format!(
                "database integrity check failed: {}",
                integrity_result
            )));
        }

        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }

    /// Get phone number repository.
    pub fn phone_numbers(&self) -> PhoneNumberRepository<'_> {
        PhoneNumberRepository::new(&self.pool)
    }

    /// Get phonebook entry repository.
    pub fn phonebook_entries(&self) -> PhonebookEntryRepository<'_> {
        PhonebookEntryRepository::new(&self.pool)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}
