//! Product store seeding

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use gantry_config::DatabaseConfig;
use gantry_core::ProductRecord;

use crate::error::{StorageError, StorageResult};

/// The schema the services under test share. Created only if absent so a
/// store that already carries it is left intact.
const CREATE_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS product (
    id SERIAL PRIMARY KEY,
    name TEXT,
    description TEXT,
    brand TEXT,
    category TEXT,
    price NUMERIC,
    currency TEXT,
    stock INTEGER,
    ean TEXT,
    color TEXT,
    size TEXT,
    availability TEXT,
    internal_id TEXT
)";

/// Row reset including the identity sequence, so seeded ids always start
/// at 1 and the load engines can draw uniformly from [1, corpus_size].
const TRUNCATE_SQL: &str = "TRUNCATE TABLE product RESTART IDENTITY CASCADE";

const INSERT_SQL: &str = "\
INSERT INTO product (name, description, brand, category, price, currency, \
stock, ean, color, size, availability, internal_id) \
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)";

/// Resets and repopulates the shared backing store.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Ensure the schema exists, then atomically replace all rows with the
    /// given corpus. Repeated invocations always leave exactly
    /// `records.len()` rows.
    async fn seed(&self, records: &[ProductRecord]) -> StorageResult<()>;
}

/// sqlx/Postgres implementation of [`ProductStore`]
pub struct PgStore {
    config: DatabaseConfig,
}

impl PgStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Connect with a bounded timeout so an unreachable store is a prompt
    /// seeding failure rather than a hang.
    async fn connect(&self) -> StorageResult<PgPool> {
        let options = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(self.config.connect_timeout);

        let url = self.config.connection_url();
        let connecting = options.connect(&url);
        match tokio::time::timeout(self.config.connect_timeout, connecting).await {
            Ok(pool) => Ok(pool?),
            Err(_) => Err(StorageError::ConnectTimeout {
                seconds: self.config.connect_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn seed(&self, records: &[ProductRecord]) -> StorageResult<()> {
        let pool = self.connect().await?;
        debug!(
            "Seeding {} at {}:{}",
            self.config.database, self.config.host, self.config.port
        );

        // One transaction for the whole reset: an early return on any `?`
        // drops the transaction, which rolls it back.
        let mut tx = pool.begin().await?;
        sqlx::query(CREATE_TABLE_SQL).execute(&mut *tx).await?;
        sqlx::query(TRUNCATE_SQL).execute(&mut *tx).await?;

        for record in records {
            sqlx::query(INSERT_SQL)
                .bind(&record.name)
                .bind(&record.description)
                .bind(&record.brand)
                .bind(&record.category)
                .bind(record.price)
                .bind(&record.currency)
                .bind(record.stock)
                .bind(&record.ean)
                .bind(&record.color)
                .bind(&record.size)
                .bind(&record.availability)
                .bind(&record.internal_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!("Seeded {} product rows", records.len());
        Ok(())
    }
}
