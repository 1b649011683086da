use std::path::Path;

use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, UserId};

use crate::{
    error::NotifyError,
    handlers::callbacks::{CallbackPayload, Outcome},
    messenger::{Messenger, Photo},
    session::{SessionStore, UserSession},
};

pub const CONFIRM_PROMPT: &str = "Press one of the buttons to confirm";

pub fn caption(phone: &str) -> String {
    format!(
        "👤 A login to your rental account with number {phone} was requested. \
         Here is the login screenshot sent by the buyer.\n\n\
         Authorize the number, then either reply to this message with a screenshot \
         proving the login, or press '✅ Logged in' within 3 minutes."
    )
}

pub fn outcome_keyboard(user: UserId) -> InlineKeyboardMarkup {
    let button = |text: &str, outcome| {
        InlineKeyboardButton::callback(text, CallbackPayload::Outcome { outcome, user }.encode())
    };
    InlineKeyboardMarkup::new(vec![
        vec![button("✅ Logged in", Outcome::Success)],
        vec![button(
            "❌ Could not log in, resend the screenshot",
            Outcome::Failed,
        )],
    ])
}

/// Records `{phone, waiting}` for `user`, then sends the login screenshot and
/// the confirmation buttons to `chat`.
pub async fn send_screenshot<M: Messenger + ?Sized>(
    messenger: &M,
    store: &dyn SessionStore,
    photo_path: &Path,
    chat: ChatId,
    user: UserId,
    phone: &str,
) -> Result<(), NotifyError> {
    store.set(user, UserSession::waiting(phone));

    let photo = load_photo(photo_path).await?;
    messenger.send_photo(chat, photo, caption(phone)).await?;
    messenger
        .send_keyboard(chat, CONFIRM_PROMPT.to_owned(), outcome_keyboard(user))
        .await?;

    log::info!("screenshot sent to chat {} for user {}", chat.0, user.0);
    Ok(())
}

async fn load_photo(path: &Path) -> Result<Photo, NotifyError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| NotifyError::AssetMissing {
            path: path.to_owned(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot.png".to_owned());
    Ok(Photo { file_name, bytes })
}
