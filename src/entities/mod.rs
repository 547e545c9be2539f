//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod daily_quest;
pub mod gamification_profile;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use daily_quest::{Column as DailyQuestColumn, Entity as DailyQuest, Model as DailyQuestModel};
pub use gamification_profile::{
    Column as GamificationProfileColumn, Entity as GamificationProfile,
    Model as GamificationProfileModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
