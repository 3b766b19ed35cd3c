//! PostgreSQL implementation for ticket-classifier storage.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::{
    ConnectOptions, Connection,
    postgres::{PgConnectOptions, PgConnection},
};
use tracing::{debug, info, instrument};

use crate::base::{
    config::Config,
    types::{Res, TicketRow, Void},
};

use super::{DbClient, GenericDbClient};

const INSERT_TICKET: &str = r#"
    INSERT INTO tickets (input_text, label, reason, confidence, recommended_action)
    VALUES ($1, $2, $3, $4, $5)
"#;

// Extra methods on `DbClient` applied by the postgres implementation.

impl DbClient {
    pub fn postgres(config: &Config) -> Self {
        let client = PostgresDbClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

/// PostgreSQL client.
///
/// Holds only connection options: a connection is opened per insert and
/// released before the call returns.
#[derive(Clone)]
pub struct PostgresDbClient {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PostgresDbClient {
    /// Create a new database client.
    #[instrument(name = "PostgresDbClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.pg_host)
            .port(config.pg_port)
            .database(&config.pg_database)
            .username(&config.pg_user)
            .password(&config.pg_password)
            .application_name("ticket-classifier");

        info!("Database target `{}:{}/{}`.", config.pg_host, config.pg_port, config.pg_database);

        Self {
            options,
            connect_timeout: Duration::from_secs(config.pg_connect_timeout_secs.max(1)),
        }
    }

    async fn connect(&self) -> Res<PgConnection> {
        let connection = tokio::time::timeout(self.connect_timeout, self.options.connect())
            .await
            .map_err(|_| anyhow::anyhow!("Timed out connecting to the database after {:?}.", self.connect_timeout))??;

        Ok(connection)
    }
}

#[async_trait]
impl GenericDbClient for PostgresDbClient {
    #[instrument(name = "PostgresDbClient::insert_ticket", skip_all)]
    async fn insert_ticket(&self, row: &TicketRow) -> Void {
        let mut connection = self.connect().await?;

        // On error the connection is dropped here, which closes it.
        sqlx::query(INSERT_TICKET)
            .bind(&row.input_text)
            .bind(&row.label)
            .bind(&row.reason)
            .bind(row.confidence)
            .bind(&row.recommended_action)
            .execute(&mut connection)
            .await?;

        connection.close().await?;

        debug!("Inserted ticket labelled `{}`.", row.label);

        Ok(())
    }
}
