use std::error::Error;

use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};
use engine::{Audience, Engine, MoneyCents};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "library_admin")]
#[command(about = "Staff utilities for the library desk (catalog, events, fines)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./library.db?mode=rwc"
    )]
    database_url: String,

    /// Log level for the admin tool and the engine.
    #[arg(long, env = "LIBRARY_ADMIN_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Item(Item),
    Event(EventCmd),
    Fine(Fine),
    Member(Member),
}

#[derive(Args, Debug)]
struct Item {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    /// Add an item to the catalog.
    Add(ItemAddArgs),
}

#[derive(Args, Debug)]
struct ItemAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    author: String,
    #[arg(long, default_value = "Book")]
    category: String,
    #[arg(long)]
    genre: String,
}

#[derive(Args, Debug)]
struct EventCmd {
    #[command(subcommand)]
    command: EventCommand,
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    /// Schedule a new event.
    Add(EventAddArgs),
    /// Assign an event to a room.
    Room(EventRoomArgs),
}

#[derive(Args, Debug)]
struct EventAddArgs {
    #[arg(long)]
    name: String,
    /// Date as YYYY-MM-DD.
    #[arg(long)]
    date: String,
    /// Time as HH:MM.
    #[arg(long)]
    time: String,
    /// One of: All Ages, Children, Teens and Adults, Adults, Volunteers,
    /// Children and Families.
    #[arg(long, default_value = "All Ages")]
    audience: String,
    #[arg(long)]
    room: Option<i32>,
}

#[derive(Args, Debug)]
struct EventRoomArgs {
    #[arg(long)]
    event_id: i32,
    #[arg(long)]
    room: i32,
}

#[derive(Args, Debug)]
struct Fine {
    #[command(subcommand)]
    command: FineCommand,
}

#[derive(Subcommand, Debug)]
enum FineCommand {
    /// Record a fine against a loan.
    Record(FineRecordArgs),
}

#[derive(Args, Debug)]
struct FineRecordArgs {
    #[arg(long)]
    borrow_id: i32,
    /// Amount in dollars, e.g. 2.50.
    #[arg(long, value_parser = parse_amount)]
    amount: MoneyCents,
}

#[derive(Args, Debug)]
struct Member {
    #[command(subcommand)]
    command: MemberCommand,
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    /// List every registered member.
    List,
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
        .map_err(|_| format!("invalid time: {raw} (expected HH:MM)"))
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "library_admin={level},engine={level}",
            level = cli.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Item(Item {
            command: ItemCommand::Add(args),
        }) => {
            let item = engine
                .donate_item(&args.name, &args.author, &args.category, &args.genre)
                .await?;
            println!("added item: {} ({})", item.name, item.id);
        }
        Command::Event(EventCmd {
            command: EventCommand::Add(args),
        }) => {
            let date = engine::parse_date(&args.date)?;
            let time = parse_time(&args.time)?;
            let audience = Audience::try_from(args.audience.as_str())?;
            let event = match args.room {
                Some(room) => {
                    engine
                        .schedule_event_in_room(&args.name, date, time, audience, room)
                        .await?
                }
                None => {
                    engine
                        .schedule_event(&args.name, date, time, audience)
                        .await?
                }
            };
            println!(
                "scheduled event: {} ({}) on {} at {}",
                event.name,
                event.id,
                event.scheduled_date,
                event.scheduled_time.format("%H:%M")
            );
        }
        Command::Event(EventCmd {
            command: EventCommand::Room(args),
        }) => {
            engine.assign_room(args.event_id, args.room).await?;
            println!("event {} moved to room {}", args.event_id, args.room);
        }
        Command::Fine(Fine {
            command: FineCommand::Record(args),
        }) => {
            let fine = engine.record_fine(args.borrow_id, args.amount).await?;
            tracing::info!(borrow_id = fine.borrow_id, fine_id = fine.id, "fine recorded");
            println!(
                "recorded fine {} of {} on loan {}",
                fine.id, fine.amount, fine.borrow_id
            );
        }
        Command::Member(Member {
            command: MemberCommand::List,
        }) => {
            for member in engine.members().await? {
                println!("{}\t{}\t{}", member.email, member.name, member.birthday);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fine_record() {
        let cli = Cli::try_parse_from([
            "library_admin",
            "fine",
            "record",
            "--borrow-id",
            "4",
            "--amount",
            "2.50",
        ])
        .unwrap();
        match cli.command {
            Command::Fine(Fine {
                command: FineCommand::Record(args),
            }) => {
                assert_eq!(args.borrow_id, 4);
                assert_eq!(args.amount, MoneyCents::new(250));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_amount() {
        assert!(
            Cli::try_parse_from([
                "library_admin",
                "fine",
                "record",
                "--borrow-id",
                "4",
                "--amount",
                "2.505",
            ])
            .is_err()
        );
    }

    #[test]
    fn event_times() {
        assert_eq!(
            parse_time("18:30"),
            Ok(NaiveTime::from_hms_opt(18, 30, 0).unwrap())
        );
        assert!(parse_time("6pm").is_err());
    }
}
