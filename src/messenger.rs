use futures::future::BoxFuture;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardMarkup, InputFile},
    RequestError,
};

pub type SendResult = Result<(), RequestError>;

/// Image bytes already read from disk.
pub struct Photo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Outbound side of the bot: everything the workflow ever says to a chat.
pub trait Messenger: Send + Sync {
    fn send_text<'a>(&'a self, chat: ChatId, text: String) -> BoxFuture<'a, SendResult>;

    fn send_photo<'a>(
        &'a self,
        chat: ChatId,
        photo: Photo,
        caption: String,
    ) -> BoxFuture<'a, SendResult>;

    fn send_keyboard<'a>(
        &'a self,
        chat: ChatId,
        text: String,
        markup: InlineKeyboardMarkup,
    ) -> BoxFuture<'a, SendResult>;

    fn answer_callback<'a>(&'a self, query_id: String) -> BoxFuture<'a, SendResult>;
}

impl Messenger for Bot {
    fn send_text<'a>(&'a self, chat: ChatId, text: String) -> BoxFuture<'a, SendResult> {
        Box::pin(async move {
            self.send_message(chat, text).await?;
            Ok(())
        })
    }

    fn send_photo<'a>(
        &'a self,
        chat: ChatId,
        photo: Photo,
        caption: String,
    ) -> BoxFuture<'a, SendResult> {
        Box::pin(async move {
            let file = InputFile::memory(photo.bytes).file_name(photo.file_name);
            Requester::send_photo(self, chat, file).caption(caption).await?;
            Ok(())
        })
    }

    fn send_keyboard<'a>(
        &'a self,
        chat: ChatId,
        text: String,
        markup: InlineKeyboardMarkup,
    ) -> BoxFuture<'a, SendResult> {
        Box::pin(async move {
            self.send_message(chat, text).reply_markup(markup).await?;
            Ok(())
        })
    }

    fn answer_callback<'a>(&'a self, query_id: String) -> BoxFuture<'a, SendResult> {
        Box::pin(async move {
            self.answer_callback_query(query_id).await?;
            Ok(())
        })
    }
}
