use teloxide::types::{ChatId, UserId};

pub mod admin;
pub mod callbacks;
pub mod renter;
pub mod states;

pub use states::{schema, State};

/// Private chats share the user's id.
pub fn private_chat(user: UserId) -> ChatId {
    ChatId::from(user)
}
