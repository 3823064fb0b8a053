//! PostgreSQL access: the connection pool and the `hits` counter table.
//!
//! `Database` owns a sqlx `PgPool`. Every statement runs against the pool, which
//! checks a connection out for the duration of the statement and returns it when
//! the statement finishes, whether it succeeded or not. The pool is opened lazily,
//! so no socket is created until the first request touches the database.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::{DbConfig, DB_ACQUIRE_TIMEOUT_SECS};
use crate::error::DbError;

/// Primary key of the only counter row
pub const COUNTER_ID: i32 = 1;

const CREATE_HITS_TABLE: &str = "CREATE TABLE IF NOT EXISTS hits (
    id INT PRIMARY KEY,
    count INT NOT NULL
)";

const INSERT_COUNTER_ROW: &str =
    "INSERT INTO hits (id, count) VALUES ($1, 0) ON CONFLICT (id) DO NOTHING";

const INCREMENT_COUNTER: &str = "UPDATE hits SET count = count + 1 WHERE id = $1 RETURNING count";

const SELECT_COUNTER: &str = "SELECT count FROM hits WHERE id = $1";

/// Shared handle to the database, cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Build a pool for the given settings without connecting.
    ///
    /// Pool sizing is left at the sqlx default. Acquiring a connection gives up
    /// after `DB_ACQUIRE_TIMEOUT_SECS`.
    pub fn connect_lazy(config: &DbConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
            .connect_lazy_with(options);

        Self::from_pool(pool)
    }

    /// Wrap an already configured pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query to prove the database is reachable.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the `hits` table and its counter row if they are missing.
    ///
    /// Both statements are idempotent and run separately, outside a transaction.
    /// An existing row keeps its count.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        sqlx::query(CREATE_HITS_TABLE).execute(&self.pool).await?;
        sqlx::query(INSERT_COUNTER_ROW)
            .bind(COUNTER_ID)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Add one to the counter and return the new value.
    ///
    /// The increment and the read happen in a single statement, so concurrent
    /// callers never lose an update.
    pub async fn increment_hits(&self) -> Result<i32, DbError> {
        let count = sqlx::query_scalar::<_, i32>(INCREMENT_COUNTER)
            .bind(COUNTER_ID)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Current counter value, or `None` before the row exists.
    pub async fn current_hits(&self) -> Result<Option<i32>, DbError> {
        let count = sqlx::query_scalar::<_, i32>(SELECT_COUNTER)
            .bind(COUNTER_ID)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count)
    }
}
