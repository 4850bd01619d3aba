use super::{single_row, StoreError, SubscriptionStore};
use crate::config::{DatabaseConfig, StorageKey};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::Connection;
use tracing::{debug, info};

const SELECT_BLOB: &str = r#"
    SELECT pvalue
    FROM pluginkeyvaluestore
    WHERE pluginid = $1 AND pkey = $2
"#;

// expireat = 0 means the row never expires
const UPSERT_BLOB: &str = r#"
    INSERT INTO pluginkeyvaluestore (pluginid, pkey, pvalue, expireat)
    VALUES ($1, $2, $3, 0)
    ON CONFLICT (pluginid, pkey) DO UPDATE SET
      pvalue = EXCLUDED.pvalue,
      expireat = EXCLUDED.expireat
"#;

/// Store backed by the plugin key-value table of a Mattermost Postgres database.
///
/// Holds a single connection for the whole run. Call [`PostgresStore::close`]
/// on the success path; on early exits the connection is released on drop.
pub struct PostgresStore {
    conn: PgConnection,
    key: StorageKey,
}

impl PostgresStore {
    /// Open the connection. Fails if the server cannot be reached or rejects the login.
    pub async fn connect(config: &DatabaseConfig, key: StorageKey) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .ssl_mode(PgSslMode::Disable);

        let conn = PgConnection::connect_with(&options).await?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to database"
        );

        Ok(Self { conn, key })
    }

    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for PostgresStore {
    async fn load_blob(&mut self) -> Result<Option<Vec<u8>>, StoreError> {
        let rows: Vec<Option<Vec<u8>>> = sqlx::query_scalar(SELECT_BLOB)
            .bind(&self.key.plugin_id)
            .bind(&self.key.key)
            .fetch_all(&mut self.conn)
            .await?;

        debug!(
            plugin_id = %self.key.plugin_id,
            key = %self.key.key,
            rows = rows.len(),
            "Queried stored subscriptions"
        );

        // A NULL value is treated like a missing row
        Ok(single_row(rows)?.flatten())
    }

    async fn upsert_blob(&mut self, blob: &[u8]) -> Result<u64, StoreError> {
        let rows_affected = sqlx::query(UPSERT_BLOB)
            .bind(&self.key.plugin_id)
            .bind(&self.key.key)
            .bind(blob)
            .execute(&mut self.conn)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
