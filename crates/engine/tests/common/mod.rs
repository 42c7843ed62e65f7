#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, Item};
use migration::MigratorTrait;

pub const ALICE: &str = "a@x.com";
pub const BOB: &str = "b@x.com";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    engine
        .register_member("Alice", day(1990, 1, 1), ALICE)
        .await
        .unwrap();
    engine
        .register_member("Bob", day(1985, 6, 15), BOB)
        .await
        .unwrap();

    (engine, db)
}

pub async fn donate(engine: &Engine, name: &str) -> Item {
    engine
        .donate_item(name, "Frank Herbert", "Book", "Science Fiction")
        .await
        .unwrap()
}

pub async fn count(db: &DatabaseConnection, sql: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap()
        .expect("count row");
    row.try_get::<i64>("", "n").unwrap()
}

pub async fn scalar_text(db: &DatabaseConnection, sql: &str) -> String {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap()
        .expect("row");
    row.try_get::<String>("", "v").unwrap()
}
