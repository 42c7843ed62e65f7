use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./library.db?mode=rwc";

/// `migration [up|down|fresh|status] [database_url]`
///
/// Without an explicit URL the same variables as the console are honoured:
/// `LIBRARY_DESK_DATABASE_URL`, then `DATABASE_URL`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());
    let db_url = args
        .next()
        .or_else(|| std::env::var("LIBRARY_DESK_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        // Rolls back the single schema migration: every library table is dropped.
        "down" => migration::Migrator::down(&db, None).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => {
            eprintln!("Usage: cargo run -p migration -- [up|down|fresh|status] [database_url]");
            std::process::exit(2);
        }
    }

    Ok(())
}
