//! Migrate command - schema management for the storefront tables.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.migrate_up().await?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_last().await?;
            tracing::info!("Rolled back the latest migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &status {
                println!("{:<50} {}", name, if *applied { "applied" } else { "pending" });
            }
            println!("{} migration(s), {} pending", status.len(), pending);
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.reset().await?;
            tracing::info!("Database rebuilt");
        }
    }

    Ok(())
}
