pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blog-api")]
#[command(about = "Blog API server - users, login and posts over PostgreSQL")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply or revert schema migrations")]
    Migrate {
        #[command(subcommand)]
        cmd: commands::migrate::MigrateCommands,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::server::handle().await,
        Commands::Migrate { cmd } => commands::migrate::handle(cmd).await,
    }
}
