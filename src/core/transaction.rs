//! Transaction business logic - Handles income, expense and transfer records.
//!
//! Every transaction is inserted together with its balance changes inside one database
//! transaction. Amounts are always positive; the kind decides the direction. Balances may
//! not go below zero.

use crate::{
    core::{
        account::{is_savings, update_account_balance_atomic},
        tracker::Activity,
    },
    entities::{Transaction, account, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, instrument};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
    /// Money moving between two of the user's accounts
    Transfer,
}

impl TransactionKind {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            other => Err(Error::InvalidInput {
                message: format!("Unknown transaction kind '{other}'"),
            }),
        }
    }
}

/// Input for [`create_transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Source account (the only account for income/expense)
    pub account_id: i64,
    /// Destination account, required for transfers
    #[serde(default)]
    pub to_account_id: Option<i64>,
    /// Direction
    pub kind: TransactionKind,
    /// Positive, finite amount
    pub amount: f64,
    /// Free-text category
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
}

/// A stored transaction together with the destination account of a transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTransaction {
    /// The inserted row
    pub transaction: transaction::Model,
    /// Destination account after the balance update (transfers only)
    pub destination: Option<account::Model>,
}

impl RecordedTransaction {
    /// The gamification activity this transaction represents.
    #[must_use]
    pub fn activity(&self) -> Activity {
        let kind = self
            .transaction
            .kind
            .parse()
            .unwrap_or(TransactionKind::Expense);
        Activity::TransactionRecorded {
            kind,
            into_savings: self.destination.as_ref().is_some_and(is_savings),
        }
    }
}

fn validate(new: &NewTransaction) -> Result<()> {
    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    match (new.kind, new.to_account_id) {
        (TransactionKind::Transfer, None) => Err(Error::InvalidInput {
            message: "A transfer needs a destination account".to_string(),
        }),
        (TransactionKind::Transfer, Some(to)) if to == new.account_id => Err(Error::InvalidInput {
            message: "A transfer needs two different accounts".to_string(),
        }),
        (TransactionKind::Income | TransactionKind::Expense, Some(_)) => {
            Err(Error::InvalidInput {
                message: "Only transfers have a destination account".to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Records a transaction and moves the affected balances atomically.
///
/// Both accounts must belong to `user_id`. Expenses and transfers fail with
/// `Error::InsufficientFunds` when the source balance would go negative. The source balance
/// update is the first statement of the database transaction, so the write lock is held
/// before any balance is checked.
#[instrument(skip(db, new), fields(kind = %new.kind, amount = new.amount))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    new: NewTransaction,
) -> Result<RecordedTransaction> {
    validate(&new)?;

    let source_delta = match new.kind {
        TransactionKind::Income => new.amount,
        TransactionKind::Expense | TransactionKind::Transfer => -new.amount,
    };

    let txn = db.begin().await?;

    let source = update_account_balance_atomic(&txn, user_id, new.account_id, source_delta).await?;
    if source.balance < 0.0 {
        txn.rollback().await?;
        return Err(Error::InsufficientFunds {
            current: source.balance - source_delta,
            required: new.amount,
        });
    }

    let destination = match new.to_account_id {
        Some(to) => Some(update_account_balance_atomic(&txn, user_id, to, new.amount).await?),
        None => None,
    };

    let transaction_model = transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        account_id: Set(source.id),
        to_account_id: Set(destination.as_ref().map(|a| a.id)),
        kind: Set(new.kind.as_str().to_string()),
        amount: Set(new.amount),
        category: Set(new
            .category
            .map_or_else(|| "uncategorized".to_string(), |c| c.trim().to_lowercase())),
        description: Set(new.description.unwrap_or_default()),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let transaction = transaction_model.insert(&txn).await?;

    txn.commit().await?;
    debug!(transaction_id = transaction.id, "Transaction recorded");

    Ok(RecordedTransaction {
        transaction,
        destination,
    })
}

/// Lists a user's transactions, newest first.
pub async fn list_transactions(
    db: &DatabaseConnection,
    user_id: &str,
    limit: u64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Timestamp)
        .order_by_desc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
