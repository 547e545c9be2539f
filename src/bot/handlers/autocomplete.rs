//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, core::account, errors::Error};

/// Discord accepts at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

/// Suggests the caller's account names containing `partial` (case-insensitive).
pub async fn autocomplete_account_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let user_id = ctx.author().id.to_string();
    let Ok(accounts) = account::list_accounts(&ctx.data().database, &user_id).await else {
        return Vec::new();
    };

    matching_names(accounts.into_iter().map(|a| a.name), partial)
}

fn matching_names(names: impl Iterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();
    matching.sort();
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names() {
        let names = ["Savings", "Checking", "Cash jar"].map(String::from);
        assert_eq!(
            matching_names(names.into_iter(), "CA"),
            vec!["Cash jar".to_string()]
        );
    }
}
