use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePool,
    SqlitePoolOptions, SqliteQueryResult, SqliteRow,
};
use sqlx::{FromRow, Transaction};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::error::DbError;

type TxSlot = Arc<Mutex<Option<Transaction<'static, Sqlite>>>>;

/// Owner of the single SQLite connection pool.
///
/// The pool is safe for unbounded concurrent use; all mutable state lives
/// in the store. Cloning a manager clones the pool handle, not the pool.
#[derive(Clone)]
pub struct DbManager {
    pool: SqlitePool,
}

impl DbManager {
    /// Open the database file, creating it if missing, with foreign keys
    /// enforced and WAL journaling.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let mut pool_options = SqlitePoolOptions::new();
        if config.max_connections > 0 {
            pool_options = pool_options.max_connections(config.max_connections);
        }
        if config.min_connections > 0 {
            pool_options = pool_options.min_connections(config.min_connections);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::wrap(e, "open database"))?;

        info!(path = %config.path, "database pool opened");
        Ok(Self { pool })
    }

    /// In-memory database on a single pooled connection, for tests.
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        // One connection that never recycles, or the data vanishes.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::wrap(e, "open in-memory database"))?;

        Ok(Self { pool })
    }

    /// Liveness check against the store.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::wrap(e, "ping database"))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A context with no transaction; queries resolve to the pool.
    pub fn context(&self) -> DbContext {
        DbContext {
            pool: self.pool.clone(),
            tx: None,
        }
    }

    /// Run `f` inside a transaction.
    ///
    /// The closure receives a context carrying the transaction, so every
    /// repository call made through it joins the same unit of work. If the
    /// given context already carries a transaction it is reused - there is
    /// no nesting and no savepoints. Commit on `Ok`, rollback on `Err`;
    /// a rollback failure reports both errors.
    pub async fn run_in_transaction<F, Fut, R>(&self, ctx: &DbContext, f: F) -> Result<R, DbError>
    where
        F: FnOnce(DbContext) -> Fut,
        Fut: Future<Output = Result<R, DbError>>,
    {
        if ctx.in_transaction() {
            return f(ctx.clone()).await;
        }

        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::wrap(e, "begin transaction"))?;
        let slot: TxSlot = Arc::new(Mutex::new(Some(tx)));
        let tx_ctx = DbContext {
            pool: self.pool.clone(),
            tx: Some(slot.clone()),
        };

        match f(tx_ctx).await {
            Ok(value) => {
                let tx = slot
                    .lock()
                    .await
                    .take()
                    .ok_or_else(|| DbError::database("transaction no longer active"))?;
                tx.commit()
                    .await
                    .map_err(|e| DbError::wrap(e, "commit transaction"))?;
                Ok(value)
            }
            Err(err) => match slot.lock().await.take() {
                Some(tx) => match tx.rollback().await {
                    Ok(()) => Err(err),
                    Err(rollback) => Err(DbError::RollbackFailed {
                        source: Box::new(err),
                        rollback,
                    }),
                },
                None => Err(err),
            },
        }
    }

    /// Close the pool. Called once during graceful shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// Execution context passed to every repository method.
///
/// Resolves each query against the transaction it carries, if any, and the
/// shared pool otherwise. This is what makes repositories
/// transaction-transparent: they never know whether they run inside a unit
/// of work. Failures are translated into the `DbError` taxonomy with the
/// operation label supplied at the call site.
#[derive(Clone)]
pub struct DbContext {
    pool: SqlitePool,
    tx: Option<TxSlot>,
}

impl DbContext {
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    pub async fn fetch_one<'q, T>(
        &self,
        operation: &str,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    ) -> Result<T, DbError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        match &self.tx {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let tx = Self::active(&mut guard)?;
                query
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(|e| DbError::wrap(e, operation))
            }
            None => query
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DbError::wrap(e, operation)),
        }
    }

    pub async fn fetch_optional<'q, T>(
        &self,
        operation: &str,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    ) -> Result<Option<T>, DbError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        match &self.tx {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let tx = Self::active(&mut guard)?;
                query
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| DbError::wrap(e, operation))
            }
            None => query
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DbError::wrap(e, operation)),
        }
    }

    pub async fn fetch_all<'q, T>(
        &self,
        operation: &str,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    ) -> Result<Vec<T>, DbError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        match &self.tx {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let tx = Self::active(&mut guard)?;
                query
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(|e| DbError::wrap(e, operation))
            }
            None => query
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DbError::wrap(e, operation)),
        }
    }

    pub async fn execute<'q>(
        &self,
        operation: &str,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Result<SqliteQueryResult, DbError> {
        match &self.tx {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let tx = Self::active(&mut guard)?;
                query
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| DbError::wrap(e, operation))
            }
            None => query
                .execute(&self.pool)
                .await
                .map_err(|e| DbError::wrap(e, operation)),
        }
    }

    fn active<'a>(
        guard: &'a mut Option<Transaction<'static, Sqlite>>,
    ) -> Result<&'a mut Transaction<'static, Sqlite>, DbError> {
        guard
            .as_mut()
            .ok_or_else(|| DbError::database("transaction no longer active"))
    }
}
