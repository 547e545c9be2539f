//! Shared test utilities for `PennyQuest`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::database::init_database,
    core::{
        account::{self, AccountKind},
        transaction::{self, NewTransaction, RecordedTransaction, TransactionKind},
    },
    entities,
    errors::Result,
};
use sea_orm::{ConnectOptions, DatabaseConnection};
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// The pool is pinned to one connection: every new `SQLite` memory connection would
/// otherwise see its own empty database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.sqlx_logging(false);
    init_database(options).await
}

/// Creates a file-backed `SQLite` database in a temporary directory, served by a pool of
/// eight connections. Used by tests that need real concurrent writers.
///
/// Keep the returned `TempDir` alive for as long as the connection is used.
pub async fn setup_file_db() -> Result<(DatabaseConnection, TempDir)> {
    let dir = tempfile::tempdir()?;
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("penny_quest.sqlite").display()
    );
    let mut options = ConnectOptions::new(url);
    options.max_connections(8).sqlx_logging(false);
    let db = init_database(options).await?;
    Ok((db, dir))
}

/// Creates a test account with a zero balance.
pub async fn create_test_account(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    kind: AccountKind,
) -> Result<entities::account::Model> {
    account::create_account(db, user_id, name.to_string(), kind).await
}

/// Records an income into `account_id`.
///
/// # Defaults
/// * `category`: `"salary"`
/// * `description`: `"Test income"`
pub async fn create_test_income(
    db: &DatabaseConnection,
    user_id: &str,
    account_id: i64,
    amount: f64,
) -> Result<RecordedTransaction> {
    transaction::create_transaction(
        db,
        user_id,
        NewTransaction {
            account_id,
            to_account_id: None,
            kind: TransactionKind::Income,
            amount,
            category: Some("salary".to_string()),
            description: Some("Test income".to_string()),
        },
    )
    .await
}

/// Sets up a complete test environment with one checking account.
/// Returns (db, account) for common test scenarios.
pub async fn setup_with_account(
    user_id: &str,
) -> Result<(DatabaseConnection, entities::account::Model)> {
    let db = setup_test_db().await?;
    let account = create_test_account(&db, user_id, "Checking", AccountKind::Checking).await?;
    Ok((db, account))
}
