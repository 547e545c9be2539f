//! Money commands - `balance`, `spend` and `income`.
//!
//! Each command is also a gamification event source: the reply ends with the XP, quest
//! completions and streak change the action produced.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::describe_outcome, handlers::autocomplete},
        core::{
            account,
            tracker::Activity,
            transaction::{self, NewTransaction, TransactionKind},
        },
        entities,
        errors::{Error, Result},
        notify,
    };

    async fn find_account(
        ctx: poise::Context<'_, BotData, Error>,
        user_id: &str,
        name: &str,
    ) -> Result<Option<entities::AccountModel>> {
        let found = account::find_account_by_name(&ctx.data().database, user_id, name).await?;
        if found.is_none() {
            ctx.say(format!("❌ Account '{name}' not found.")).await?;
        }
        Ok(found)
    }

    async fn record(
        ctx: poise::Context<'_, BotData, Error>,
        kind: TransactionKind,
        account_name: String,
        amount: f64,
        category: Option<String>,
        description: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let Some(account) = find_account(ctx, &user_id, &account_name).await? else {
            return Ok(());
        };

        let recorded = transaction::create_transaction(
            &data.database,
            &user_id,
            NewTransaction {
                account_id: account.id,
                to_account_id: None,
                kind,
                amount,
                category,
                description,
            },
        )
        .await?;

        let outcome = notify::record_and_notify(
            &data.database,
            &data.rules,
            &data.dispatcher,
            &user_id,
            recorded.activity(),
        )
        .await;

        let verb = match kind {
            TransactionKind::Income => "Added",
            _ => "Spent",
        };
        ctx.say(format!(
            "✅ {verb} ${amount:.2} ({}) - '{}' (Transaction ID: {}){}",
            recorded.transaction.category,
            account.name,
            recorded.transaction.id,
            describe_outcome(outcome.as_ref())
        ))
        .await?;
        Ok(())
    }

    /// Shows the balance of one of your accounts.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account name"]
        #[autocomplete = "autocomplete::autocomplete_account_name"]
        account_name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let Some(account) = find_account(ctx, &user_id, &account_name).await? else {
            return Ok(());
        };

        let outcome = notify::record_and_notify(
            &data.database,
            &data.rules,
            &data.dispatcher,
            &user_id,
            Activity::BalanceViewed,
        )
        .await;

        ctx.say(format!(
            "💰 '{}' ({}): ${:.2}{}",
            account.name,
            account.kind,
            account.balance,
            describe_outcome(outcome.as_ref())
        ))
        .await?;
        Ok(())
    }

    /// Records an expense from one of your accounts.
    #[poise::command(slash_command, prefix_command)]
    pub async fn spend(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account to spend from"]
        #[autocomplete = "autocomplete::autocomplete_account_name"]
        account_name: String,
        #[description = "Amount to spend"] amount: f64,
        #[description = "Optional category"] category: Option<String>,
        #[description = "Optional description of the expense"] description: Option<String>,
    ) -> Result<()> {
        record(
            ctx,
            TransactionKind::Expense,
            account_name,
            amount,
            category,
            description,
        )
        .await
    }

    /// Records income into one of your accounts.
    #[poise::command(slash_command, prefix_command)]
    pub async fn income(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account receiving the money"]
        #[autocomplete = "autocomplete::autocomplete_account_name"]
        account_name: String,
        #[description = "Amount received"] amount: f64,
        #[description = "Optional category"] category: Option<String>,
        #[description = "Optional description of the income"] description: Option<String>,
    ) -> Result<()> {
        record(
            ctx,
            TransactionKind::Income,
            account_name,
            amount,
            category,
            description,
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
