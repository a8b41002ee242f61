//! Connection pool for the storefront schema.

use std::collections::HashSet;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Statement,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cloneable handle to the pool; clones share connections
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Opens the pool and brings the schema up to date. Used by `serve`
    /// and the integration tests.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::open(config).await?;
        Migrator::up(&db.connection, None).await?;
        tracing::info!(
            max_connections = config.database_max_connections,
            "Database ready"
        );
        Ok(db)
    }

    /// Opens the pool and leaves the schema alone, for the `migrate` command
    pub async fn open(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(false);

        Ok(Self {
            connection: SeaDatabase::connect(options).await?,
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn migrate_up(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Reverts only the most recent migration
    pub async fn rollback_last(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Drops every table and rebuilds the schema from scratch
    pub async fn reset(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Every known migration paired with whether it has been applied
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|row| row.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| (m.name().to_string(), applied.contains(m.name())))
            .collect())
    }

    /// Round-trips `SELECT 1` for the health endpoint
    pub async fn ping(&self) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1".to_string()))
            .await
            .map(|_| ())
    }
}
