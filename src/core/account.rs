//! Account business logic - Handles all account-related operations.
//!
//! Provides functions for opening, listing and looking up accounts, plus the atomic
//! balance update used by transactions. All functions are async and return Result types.

use crate::{
    entities::{Account, account},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What an account is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Everyday spending account
    Checking,
    /// Savings; transfers into it count towards the `save_money` quest
    Savings,
    /// Cash on hand
    Cash,
}

impl AccountKind {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "cash" => Ok(Self::Cash),
            other => Err(Error::InvalidInput {
                message: format!("Unknown account kind '{other}'"),
            }),
        }
    }
}

/// Returns true when the stored account is a savings account.
#[must_use]
pub fn is_savings(account: &account::Model) -> bool {
    account.kind == AccountKind::Savings.as_str()
}

/// Opens a new account with a zero balance.
///
/// The name is trimmed and must not be empty.
pub async fn create_account(
    db: &DatabaseConnection,
    user_id: &str,
    name: String,
    kind: AccountKind,
) -> Result<account::Model> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Account name cannot be empty".to_string(),
        });
    }

    let account = account::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.trim().to_string()),
        kind: Set(kind.as_str().to_string()),
        balance: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = account.insert(db).await?;
    Ok(result)
}

/// Lists a user's accounts, ordered alphabetically by name.
pub async fn list_accounts(db: &DatabaseConnection, user_id: &str) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::UserId.eq(user_id))
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an account owned by `user_id`; other users' accounts are reported as not found.
pub async fn get_account_for_user<C>(db: &C, user_id: &str, account_id: i64) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    Account::find_by_id(account_id)
        .filter(account::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })
}

/// Finds an account by name for a user (case-insensitive).
pub async fn find_account_by_name(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
) -> Result<Option<account::Model>> {
    let wanted = name.trim().to_lowercase();
    Ok(list_accounts(db, user_id)
        .await?
        .into_iter()
        .find(|a| a.name.to_lowercase() == wanted))
}

/// Updates the balance of a user's account by atomically adding an amount.
///
/// Uses a single `UPDATE accounts SET balance = balance + ? WHERE id = ? AND user_id = ?`
/// so concurrent transactions cannot lose each other's updates. Accounts owned by someone
/// else are reported as not found.
pub async fn update_account_balance_atomic<C>(
    db: &C,
    user_id: &str,
    account_id: i64,
    amount_delta: f64,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let result = Account::update_many()
        .col_expr(
            account::Column::Balance,
            Expr::col(account::Column::Balance).add(amount_delta),
        )
        .filter(account::Column::Id.eq(account_id))
        .filter(account::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::AccountNotFound { id: account_id });
    }

    Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_account_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_account(&db, "user1", "   ".to_string(), AccountKind::Cash).await;
        assert!(matches!(result, Err(Error::InvalidInput { message: _ })));
        assert!(list_accounts(&db, "user1").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_account_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let account = create_account(&db, "user1", "  Wallet ".to_string(), AccountKind::Cash)
            .await?;

        assert_eq!(account.name, "Wallet");
        assert_eq!(account.kind, "cash");
        assert_eq!(account.balance, 0.0);
        assert!(!is_savings(&account));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_accounts_only_returns_own_accounts() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_account(&db, "alice", "Savings", AccountKind::Savings).await?;
        create_test_account(&db, "alice", "Card", AccountKind::Checking).await?;
        create_test_account(&db, "bob", "Bob's card", AccountKind::Checking).await?;

        let accounts = list_accounts(&db, "alice").await?;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].name, "Card");
        assert_eq!(accounts[1].name, "Savings");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_account_for_other_user_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_account(&db, "alice", "Card", AccountKind::Checking).await?;

        assert!(get_account_for_user(&db, "alice", account.id).await.is_ok());
        let result = get_account_for_user(&db, "bob", account.id).await;
        assert!(matches!(result, Err(Error::AccountNotFound { id }) if id == account.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_account_by_name_ignores_case() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_account(&db, "alice", "Main Card", AccountKind::Checking).await?;

        let found = find_account_by_name(&db, "alice", "main card").await?;
        assert_eq!(found.unwrap().id, account.id);
        assert!(find_account_by_name(&db, "alice", "other").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_account_balance_atomic() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_account(&db, "alice", "Card", AccountKind::Checking).await?;

        update_account_balance_atomic(&db, "alice", account.id, 40.0).await?;
        let updated = update_account_balance_atomic(&db, "alice", account.id, -15.5).await?;
        assert_eq!(updated.balance, 24.5);

        let missing = update_account_balance_atomic(&db, "alice", 999, 1.0).await;
        assert!(matches!(missing, Err(Error::AccountNotFound { id: 999 })));

        let foreign = update_account_balance_atomic(&db, "bob", account.id, 1.0).await;
        assert!(matches!(foreign, Err(Error::AccountNotFound { id }) if id == account.id));
        let stored = Account::find_by_id(account.id).one(&db).await?.unwrap();
        assert_eq!(stored.balance, 24.5);

        Ok(())
    }

    #[test]
    fn test_account_kind_parsing() {
        assert_eq!("savings".parse::<AccountKind>().unwrap(), AccountKind::Savings);
        assert!("crypto".parse::<AccountKind>().is_err());
    }
}
