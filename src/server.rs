use std::{fmt::Debug, hash::Hash, net::SocketAddr};

use teloxide::{
    prelude::*,
    update_listeners::{webhooks, UpdateListener},
    Bot,
};

use crate::{config::WebhookConfig, error::ServeError};

/// Serves the bot's webhook at `<host>/bot/<bot id>` with axum.
pub struct WebhookServer {
    host: String,
    addr: SocketAddr,
}

impl WebhookServer {
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            host: config.host.clone(),
            addr: config.addr,
        }
    }

    pub async fn run<Err, Key>(
        self,
        bot: Bot,
        make_dispatcher: impl FnOnce(Bot) -> Dispatcher<Bot, Err, Key>,
    ) -> Result<(), ServeError>
    where
        Err: Debug + Send + Sync + 'static,
        Key: Send + Hash + Eq + Clone,
    {
        let bot_id = bot
            .token()
            .split(':')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or(ServeError::IdParse)?
            .to_owned();

        let url = format!("{}/bot/{}", self.host, bot_id)
            .parse()
            .map_err(ServeError::UrlParse)?;

        let (mut listener, stop_flag, router) =
            webhooks::axum_to_router(bot.clone(), webhooks::Options::new(self.addr, url))
                .await
                .map_err(ServeError::Listener)?;

        let stop_token = listener.stop_token();
        let addr = self.addr;
        let server_handle = tokio::spawn(async move {
            let served = axum::Server::bind(&addr)
                .serve(router.into_make_service())
                .with_graceful_shutdown(stop_flag)
                .await;
            if let Err(e) = served {
                log::error!("axum server error: {e}, stopping bot");
                stop_token.stop();
            }
        });

        log::info!("listening webhook for bot {bot_id} on {addr}");
        make_dispatcher(bot)
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text(format!("bot {bot_id} listener error")),
            )
            .await;

        if let Err(e) = server_handle.await {
            log::error!("axum server task failed: {e}");
        }
        Ok(())
    }
}
