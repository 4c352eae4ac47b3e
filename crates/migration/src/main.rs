use clap::{Parser, ValueEnum};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Action {
    Up,
    Down,
    Fresh,
    Status,
}

/// Apply or inspect the Waylo schema.
#[derive(Debug, Parser)]
#[command(name = "waylo_migration")]
struct Cli {
    #[arg(value_enum, default_value = "up")]
    action: Action,

    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./waylo.db?mode=rwc"
    )]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.action {
        Action::Up => migration::Migrator::up(&db, None).await?,
        // Only the latest migration is reverted.
        Action::Down => migration::Migrator::down(&db, Some(1)).await?,
        Action::Fresh => migration::Migrator::fresh(&db).await?,
        Action::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
