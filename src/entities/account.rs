//! Account entity - A place money lives (checking, savings, cash).
//!
//! Accounts are owned by a single user. Their balance is only ever changed through
//! transactions, using atomic `balance = balance + delta` updates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the account
    pub user_id: String,
    /// Human-readable name (e.g., "Main card", "Rainy day fund")
    pub name: String,
    /// Account kind: `"checking"`, `"savings"` or `"cash"`
    pub kind: String,
    /// Current balance
    pub balance: f64,
    /// When the account was opened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
