use poise::serenity_prelude::GatewayIntents;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{ctx_data::CtxData, settings::Settings};

mod ctx_data;
mod events;
mod framework;
mod settings;
mod utils;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::new().expect("Correct configuration");
    let token = settings.discord_token.clone();

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(framework::on_error(error)),
            ..Default::default()
        })
        .token(token)
        .intents(intents)
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!("{} is connected!", ready.user.name);
                Ok(CtxData::new(settings))
            })
        });

    framework.run().await.expect("Error running bot");
}
