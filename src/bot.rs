//! Discord bot core logic and event handling.

use std::error::Error as StdError;

use log::{debug, info};
use poise::{
    Framework, FrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents},
};

use crate::chatbot::handle_mention;
use crate::config::Config;
use crate::error::Result;
use crate::navy::NavyClient;

type EventResult = std::result::Result<(), Box<dyn StdError + Send + Sync>>;

/// Process-wide state, read-only after the framework setup completes.
pub struct Data {
    navy_client: NavyClient,
}

impl Data {
    pub fn navy_client(&self) -> &NavyClient {
        &self.navy_client
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing navy API client");
    let navy_client = NavyClient::new(
        config.navy_api_key,
        config.navy_api_base,
        config.system_prompt,
    );

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data { navy_client })
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> EventResult {
    if let FullEvent::Message { new_message } = event {
        let bot_user_id = ctx.cache.current_user().id;
        handle_mention(ctx, new_message, data, bot_user_id).await?;
    }
    Ok(())
}
