use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, UserId},
};

use super::{
    private_chat,
    states::{Effect, Event, HandlerError, HandlerResult, MyDialogue, State},
};
use crate::{
    config::Config,
    messenger::Messenger,
    notify,
    session::{SessionStore, UserSession},
};

pub const WELCOME: &str = "Welcome! Please send your phone number to get started.";
pub const CLOSED: &str = "Process finished.";

#[derive(Clone, Copy, Debug)]
pub struct Renter {
    pub user: UserId,
    pub chat: ChatId,
}

pub fn new_request_notice(user: UserId, phone: &str) -> String {
    format!("New request from user {}, phone: {phone}", user.0)
}

/// Feeds `event` through the conversation and performs its effect. Rejected
/// events are answered with a hint and leave the state as it was.
pub async fn advance<M: Messenger + ?Sized>(
    messenger: &M,
    store: &dyn SessionStore,
    config: &Config,
    renter: Renter,
    state: State,
    event: Event,
) -> Result<State, HandlerError> {
    let transition = match state.on(event) {
        Ok(transition) => transition,
        Err(rejected) => {
            log::debug!("user {} in {state:?}: {rejected:?}", renter.user.0);
            messenger
                .send_text(renter.chat, rejected.hint().to_owned())
                .await?;
            return Ok(state);
        }
    };

    match transition.effect {
        Effect::Welcome => {
            messenger.send_text(renter.chat, WELCOME.to_owned()).await?;
        }
        Effect::RecordPhone(phone) => {
            log::info!("new request from user {}", renter.user.0);
            store.set(renter.user, UserSession::waiting(&phone));
            messenger
                .send_text(
                    private_chat(config.admin_id),
                    new_request_notice(renter.user, &phone),
                )
                .await?;
            notify::send_screenshot(
                messenger,
                store,
                &config.photo_path,
                renter.chat,
                renter.user,
                &phone,
            )
            .await?;
        }
        Effect::Close => {
            messenger.send_text(renter.chat, CLOSED.to_owned()).await?;
        }
    }
    Ok(transition.next)
}

async fn step(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
    event: Event,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let renter = Renter {
        user: user.id,
        chat: msg.chat.id,
    };

    let state = dialogue.get_or_default().await?;
    let next = advance(&bot, store.as_ref(), &config, renter, state, event).await?;
    if next != state {
        dialogue.update(next).await?;
    }
    Ok(())
}

pub async fn start(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
) -> HandlerResult {
    step(bot, msg, dialogue, store, config, Event::Start).await
}

pub async fn end(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
) -> HandlerResult {
    step(bot, msg, dialogue, store, config, Event::End).await
}

/// Anything that is not a known command.
pub async fn message(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
) -> HandlerResult {
    let event = match msg.text() {
        Some(text) if !text.starts_with('/') => Event::Text(text.to_owned()),
        _ => Event::Unsupported,
    };
    step(bot, msg, dialogue, store, config, event).await
}
