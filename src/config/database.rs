//! Database configuration module for `PennyQuest`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The composite unique index on daily
//! quests is added separately because it cannot be expressed on a single column.
//!
//! The schema is created over a dedicated single connection that is closed before the
//! application pool opens. `SQLite` connections cache the schema they have seen, and a
//! pooled connection opened before the index existed would reject the quest upsert.

use crate::entities::{Account, DailyQuest, GamificationProfile, Transaction, daily_quest};
use crate::errors::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::Index,
};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/penny_quest.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the database named by `DATABASE_URL` with its schema in place.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(get_database_url());
    options.sqlx_logging(false);
    init_database(options).await
}

/// Creates the schema, then opens the pool described by `options`.
///
/// In-memory databases exist per connection, so their pool is pinned to one connection and
/// the schema is created on it directly.
pub async fn init_database(mut options: ConnectOptions) -> Result<DatabaseConnection> {
    let url = options.get_url().to_string();

    if is_memory_url(&url) {
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await?;
        create_tables(&db).await?;
        return Ok(db);
    }

    ensure_sqlite_dir(&url)?;

    let mut setup_options = ConnectOptions::new(url);
    setup_options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let setup = Database::connect(setup_options).await?;
    create_tables(&setup).await?;
    setup.close().await?;

    Database::connect(options).await.map_err(Into::into)
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Creates the parent directory of a file-backed `SQLite` URL; `SQLite` will not.
fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    match std::path::Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables and indexes if they do not exist yet.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Account).await?;
    create_table(db, &schema, Transaction).await?;
    create_table(db, &schema, GamificationProfile).await?;
    create_table(db, &schema, DailyQuest).await?;

    let quest_index = Index::create()
        .name("idx_daily_quests_user_date_type")
        .table(DailyQuest)
        .col(daily_quest::Column::UserId)
        .col(daily_quest::Column::QuestDate)
        .col(daily_quest::Column::QuestType)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&quest_index)).await?;

    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        account::Model as AccountModel, daily_quest::Model as DailyQuestModel,
        gamification_profile::Model as ProfileModel, transaction::Model as TransactionModel,
    };
    use crate::core::{rules::GamificationRules, tracker};
    use sea_orm::{ActiveModelTrait, QuerySelect, Set};

    #[test]
    fn test_ensure_sqlite_dir() -> Result<()> {
        ensure_sqlite_dir("sqlite::memory:")?;
        ensure_sqlite_dir("sqlite://plain.sqlite?mode=rwc")?;

        let dir = std::env::temp_dir().join(format!("penny-quest-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/db.sqlite?mode=rwc", dir.display());
        ensure_sqlite_dir(&url)?;
        assert!(dir.join("nested").is_dir());
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[test]
    fn test_is_memory_url() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://shared?mode=memory&cache=shared"));
        assert!(!is_memory_url(DEFAULT_DATABASE_URL));
    }

    #[tokio::test]
    async fn test_file_pool_sees_quest_index() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}/nested/quests.sqlite?mode=rwc", dir.path().display());
        let mut options = ConnectOptions::new(url);
        options.max_connections(8).min_connections(4).sqlx_logging(false);
        let db = init_database(options).await?;

        let rules = GamificationRules::default();
        let expected = rules.catalog.definitions().len();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default();
        for _ in 0..10 {
            let quests = tracker::ensure_daily_quests(&db, "alice", date, &rules).await?;
            assert_eq!(quests.len(), expected);
        }

        // Reopening an existing file keeps the schema intact
        db.close().await?;
        let mut options = ConnectOptions::new(format!(
            "sqlite://{}/nested/quests.sqlite?mode=rwc",
            dir.path().display()
        ));
        options.max_connections(4).sqlx_logging(false);
        let db = init_database(options).await?;
        let quests = tracker::ensure_daily_quests(&db, "alice", date, &rules).await?;
        assert_eq!(quests.len(), expected);

        Ok(())
    }

    async fn memory_db() -> Result<DatabaseConnection> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        Ok(Database::connect(options).await?)
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = memory_db().await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        let _: Vec<ProfileModel> = GamificationProfile::find().limit(1).all(&db).await?;
        let _: Vec<DailyQuestModel> = DailyQuest::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = memory_db().await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_one_quest_per_user_day_and_type() -> Result<()> {
        let db = memory_db().await?;
        create_tables(&db).await?;

        let quest = || daily_quest::ActiveModel {
            user_id: Set("alice".to_string()),
            quest_date: Set(chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default()),
            quest_type: Set("record_expense".to_string()),
            title: Set("Track a purchase".to_string()),
            description: Set(String::new()),
            xp_reward: Set(20),
            target: Set(1),
            count: Set(0),
            progress: Set(0),
            status: Set("pending".to_string()),
            completed_at: Set(None),
            ..Default::default()
        };

        quest().insert(&db).await?;
        assert!(quest().insert(&db).await.is_err());
        Ok(())
    }
}
