use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use console::Console;
use error::Result;
use settings::Settings;

mod console;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&settings.database_url).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .loan_days(settings.loan_days)
        .build()
        .await?;
    tracing::info!(loan_days = engine.loan_days(), "library desk ready");

    let stdin = std::io::stdin();
    let mut console = Console::new(
        engine,
        stdin.lock(),
        std::io::stdout(),
        settings.max_attempts,
    );
    console.run().await
}

async fn connect_db(url: &str) -> Result<DatabaseConnection> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
