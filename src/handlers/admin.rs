use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, UserId},
};

use super::{
    callbacks::{CallbackPayload, PanelVerdict},
    private_chat,
    states::HandlerResult,
};
use crate::{
    config::{Config, PriceInfo},
    messenger::Messenger,
    notify,
    session::SessionStore,
};

pub const ACCESS_DENIED: &str = "You do not have access to this command.";
pub const SEND_CODE_USAGE: &str =
    "Please specify the ID of the user who should receive the screenshot: /send_code <user_id>";
pub const INSTRUCTIONS: &str = "To rent out your account, send the number you want to rent \
     out and wait for the code the bot sends you.";
pub const PANEL_PROMPT: &str = "Confirm the outcome of the login:";

pub fn price_table(prices: &PriceInfo) -> String {
    format!(
        "Prices:\n1 hour: {}$\nEach subsequent hour: {}$",
        prices.first_hour, prices.subsequent_hour
    )
}

pub fn panel_keyboard() -> InlineKeyboardMarkup {
    let button = |text: &str, verdict| {
        InlineKeyboardButton::callback(text, CallbackPayload::Panel(verdict).encode())
    };
    InlineKeyboardMarkup::new(vec![vec![
        button("✅ Successfully logged in", PanelVerdict::LoggedIn),
        button("❌ Dropped", PanelVerdict::Dropped),
    ]])
}

/// `/send_code <user_id>`: re-sends the screenshot to the renter's private
/// chat using the phone they submitted. Resets the session to waiting.
pub async fn resend_code<M: Messenger + ?Sized>(
    messenger: &M,
    store: &dyn SessionStore,
    config: &Config,
    caller: UserId,
    reply_to: ChatId,
    arg: &str,
) -> HandlerResult {
    if !config.is_admin(caller) {
        log::warn!("user {} tried /send_code", caller.0);
        messenger.send_text(reply_to, ACCESS_DENIED.to_owned()).await?;
        return Ok(());
    }

    let Ok(user) = arg.trim().parse::<u64>().map(UserId) else {
        messenger
            .send_text(reply_to, SEND_CODE_USAGE.to_owned())
            .await?;
        return Ok(());
    };

    let Some(session) = store.get(user) else {
        messenger
            .send_text(reply_to, format!("User with ID {} not found.", user.0))
            .await?;
        return Ok(());
    };

    notify::send_screenshot(
        messenger,
        store,
        &config.photo_path,
        private_chat(user),
        user,
        &session.phone,
    )
    .await?;
    messenger
        .send_text(reply_to, format!("Screenshot sent to user {}.", user.0))
        .await?;
    Ok(())
}

pub async fn open_panel<M: Messenger + ?Sized>(
    messenger: &M,
    config: &Config,
    caller: UserId,
    chat: ChatId,
) -> HandlerResult {
    if config.is_admin(caller) {
        messenger
            .send_keyboard(chat, PANEL_PROMPT.to_owned(), panel_keyboard())
            .await?;
    } else {
        log::warn!("user {} tried /admin", caller.0);
        messenger.send_text(chat, ACCESS_DENIED.to_owned()).await?;
    }
    Ok(())
}

pub async fn send_code(
    bot: Bot,
    msg: Message,
    arg: String,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
) -> HandlerResult {
    let Some(caller) = msg.from().map(|u| u.id) else {
        return Ok(());
    };
    resend_code(&bot, store.as_ref(), &config, caller, msg.chat.id, &arg).await
}

pub async fn panel(bot: Bot, msg: Message, config: Arc<Config>) -> HandlerResult {
    let Some(caller) = msg.from().map(|u| u.id) else {
        return Ok(());
    };
    open_panel(&bot, &config, caller, msg.chat.id).await
}

pub async fn price(bot: Bot, msg: Message, config: Arc<Config>) -> HandlerResult {
    bot.send_message(msg.chat.id, price_table(&config.prices))
        .await?;
    Ok(())
}

pub async fn instructions(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, INSTRUCTIONS).await?;
    Ok(())
}
