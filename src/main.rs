use std::{fmt::Debug, sync::Arc};

use anyhow::Context;
use teloxide::{
    dispatching::{dialogue::InMemStorage, DefaultKey, UpdateHandler},
    prelude::*,
    Bot,
};

use crate::{
    config::Config,
    handlers::{schema, State},
    server::WebhookServer,
    session::{InMemSessionStore, SessionStore},
};

mod config;
mod error;
mod handlers;
mod messenger;
mod notify;
mod server;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = Arc::new(Config::from_env().context("failed to load configuration")?);
    prepare_assets(&config).await?;

    let store: Arc<dyn SessionStore> = Arc::new(InMemSessionStore::new());
    let bot = Bot::new(&config.token);
    let make_dispatcher = create_dispatcher(
        schema(),
        dptree::deps![InMemStorage::<State>::new(), store, config.clone()],
    );

    match &config.webhook {
        Some(webhook) => {
            log::info!("starting in webhook mode at {}", webhook.host);
            WebhookServer::new(webhook)
                .run(bot, make_dispatcher)
                .await
                .context("webhook server failed")?;
        }
        None => {
            log::info!("starting in long polling mode");
            make_dispatcher(bot).dispatch().await;
        }
    }
    Ok(())
}

async fn prepare_assets(config: &Config) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.image_dir)
        .await
        .with_context(|| format!("cannot create {}", config.image_dir.display()))?;

    if !tokio::fs::try_exists(&config.photo_path).await.unwrap_or(false) {
        log::warn!(
            "screenshot {} not found, sending it will fail until it exists",
            config.photo_path.display()
        );
    }
    Ok(())
}

fn create_dispatcher<Err>(
    schema: UpdateHandler<Err>,
    dependencies: DependencyMap,
) -> impl FnOnce(Bot) -> Dispatcher<Bot, Err, DefaultKey>
where
    Err: Debug + Send + Sync + 'static,
{
    |bot: Bot| {
        Dispatcher::builder(bot, schema)
            .dependencies(dependencies)
            .enable_ctrlc_handler()
            .build()
    }
}
