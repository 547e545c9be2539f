//! Transaction entity - Income, expense and transfer records.
//!
//! `amount` is always positive; `kind` decides which way money moves. Transfers carry
//! the destination in `to_account_id`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who recorded the transaction
    pub user_id: String,
    /// Source account (or the only account for income/expense)
    pub account_id: i64,
    /// Destination account, transfers only
    pub to_account_id: Option<i64>,
    /// `"income"`, `"expense"` or `"transfer"`
    pub kind: String,
    /// Positive amount
    pub amount: f64,
    /// Free-text category (e.g., "groceries")
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// When the transaction was recorded
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one source account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
