use clap::Subcommand;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum MigrateCommands {
    #[command(about = "Apply all pending migrations")]
    Up,

    #[command(about = "Revert applied migrations")]
    Down {
        #[arg(long, default_value_t = 0, help = "Version to revert down to (0 reverts everything)")]
        target: i64,
    },
}

pub async fn handle(cmd: MigrateCommands) -> anyhow::Result<()> {
    // Only the database section matters here; no JWT secret required
    let config = AppConfig::profile_from_env()?;
    let pool = DatabaseManager::connect(&config.database).await?;

    let result = match cmd {
        MigrateCommands::Up => DatabaseManager::migrate_up(&pool).await,
        MigrateCommands::Down { target } => DatabaseManager::migrate_down(&pool, target).await,
    };

    DatabaseManager::close(pool).await;
    result?;
    Ok(())
}
