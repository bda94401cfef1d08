//! Test fixtures
//!
//! Shared in-memory SQLite database with the history, message and
//! gazetteer tables, plus insert helpers.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE inputs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        objects TEXT NOT NULL DEFAULT '[]',
        actors TEXT,
        times TEXT,
        places TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE cities (
        name TEXT NOT NULL,
        country_code TEXT NOT NULL
    )",
    "CREATE TABLE messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        route TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
];

/// One connection only: every `sqlite::memory:` connection is its own database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool
}

/// Fixed base time so stored timestamps sort lexically
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// `base_time()` shifted by whole minutes
pub fn minutes(offset: i64) -> String {
    stamp(base_time() + Duration::minutes(offset))
}

fn stamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn json(values: &[&str]) -> String {
    serde_json::to_string(values).unwrap()
}

/// A recorded turn; category columns are optional so NULLs can be tested
#[derive(Default)]
pub struct Turn<'a> {
    pub objects: &'a [&'a str],
    pub actors: Option<&'a [&'a str]>,
    pub times: Option<&'a [&'a str]>,
    pub places: Option<&'a [&'a str]>,
}

pub async fn insert_turn(pool: &SqlitePool, user_id: i64, turn: Turn<'_>, created_at: &str) {
    sqlx::query(
        "INSERT INTO inputs (user_id, objects, actors, times, places, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(user_id)
    .bind(json(turn.objects))
    .bind(turn.actors.map(json))
    .bind(turn.times.map(json))
    .bind(turn.places.map(json))
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

/// Inserts a turn with a raw, possibly malformed, objects column
pub async fn insert_raw_objects(pool: &SqlitePool, user_id: i64, objects: &str, created_at: &str) {
    sqlx::query("INSERT INTO inputs (user_id, objects, created_at) VALUES (?1, ?2, ?3)")
        .bind(user_id)
        .bind(objects)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_city(pool: &SqlitePool, name: &str, country_code: &str) {
    sqlx::query("INSERT INTO cities (name, country_code) VALUES (?1, ?2)")
        .bind(name)
        .bind(country_code)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_message(pool: &SqlitePool, user_id: i64, route: &str, created_at: &str) {
    sqlx::query("INSERT INTO messages (user_id, route, created_at) VALUES (?1, ?2, ?3)")
        .bind(user_id)
        .bind(route)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
}
