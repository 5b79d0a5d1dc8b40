use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{Carrier, CarrierCode, CarrierStore, CarrierStoreError, NewCarrier, Result};

/// SQLSTATE raised by PostgreSQL when a relation does not exist.
const UNDEFINED_TABLE: &str = "42P01";

const CARRIER_COLUMNS: &str = "id, code, name, app_id, app_token, shipment_methods, enabled, \
                               api_endpoint_url, created_at, modified_at";

/// PostgreSQL-backed carrier directory.
#[derive(Clone)]
pub struct PostgresCarrierStore {
    pool: PgPool,
}

impl PostgresCarrierStore {
    /// Creates a new PostgreSQL carrier store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_carrier(row: PgRow) -> Result<Carrier> {
        let methods_json: serde_json::Value = row.try_get("shipment_methods")?;
        let shipment_methods: BTreeMap<String, String> = serde_json::from_value(methods_json)?;

        Ok(Carrier {
            id: row.try_get("id")?,
            code: CarrierCode::from_name(row.try_get::<&str, _>("code")?),
            name: row.try_get("name")?,
            app_id: row.try_get("app_id")?,
            app_token: row.try_get("app_token")?,
            shipment_methods,
            enabled: row.try_get("enabled")?,
            api_endpoint_url: row.try_get("api_endpoint_url")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }

    async fn fetch_carriers(&self, enabled_only: bool) -> Result<Vec<Carrier>> {
        let filter = if enabled_only { "WHERE enabled" } else { "" };
        let sql = format!("SELECT {CARRIER_COLUMNS} FROM carriers {filter} ORDER BY id ASC");

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_database_error)?;

        rows.into_iter().map(Self::row_to_carrier).collect()
    }
}

/// Translates a missing `carriers` table into `NotMigrated`.
fn map_database_error(err: sqlx::Error) -> CarrierStoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.code().as_deref() == Some(UNDEFINED_TABLE)
    {
        return CarrierStoreError::NotMigrated;
    }
    CarrierStoreError::Database(err)
}

#[async_trait]
impl CarrierStore for PostgresCarrierStore {
    async fn list(&self) -> Result<Vec<Carrier>> {
        self.fetch_carriers(false).await
    }

    async fn list_enabled(&self) -> Result<Vec<Carrier>> {
        self.fetch_carriers(true).await
    }

    async fn insert(&self, carrier: NewCarrier) -> Result<Carrier> {
        let code = carrier.validate()?;
        let methods_json = serde_json::to_value(&carrier.shipment_methods)?;

        let sql = format!(
            r#"
            INSERT INTO carriers (code, name, app_id, app_token, shipment_methods, enabled, api_endpoint_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CARRIER_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(code.as_str())
            .bind(&carrier.name)
            .bind(&carrier.app_id)
            .bind(&carrier.app_token)
            .bind(methods_json)
            .bind(carrier.enabled)
            .bind(&carrier.api_endpoint_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("unique_carrier_code")
                {
                    return CarrierStoreError::DuplicateCode(code.clone());
                }
                map_database_error(e)
            })?;

        tracing::debug!(carrier = %code, "carrier stored");
        Self::row_to_carrier(row)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carriers")
            .fetch_one(&self.pool)
            .await
            .map_err(map_database_error)?;

        Ok(count as u64)
    }
}
