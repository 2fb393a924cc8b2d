#[tokio::main]
async fn main() -> navybot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("navybot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting navybot Discord bot");

    match navybot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
