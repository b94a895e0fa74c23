/// WatchQueue Bot - Telegram watch-queue service
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watchq_bot::commands::Command;
use watchq_bot::config::BotConfig;
use watchq_bot::handlers;
use watchq_bot::state::AppState;
use watchq_extract::YtDlp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchq_bot=info,watchq_storage=info,teloxide=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = BotConfig::load()?;
    config.validate()?;

    tracing::info!("Starting WatchQueue bot");

    // Initialize database
    let pool = watchq_storage::create_pool(&config.storage.database_url).await?;
    watchq_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    // Initialize the extraction backend
    let extractor = YtDlp::new(&config.extractor.ytdlp_path);
    tracing::info!(ytdlp = %config.extractor.ytdlp_path.display(), "Extractor configured");

    let state = Arc::new(AppState::new(pool, extractor));

    let bot = Bot::new(config.telegram.token.clone());
    bot.set_my_commands(Command::bot_commands()).await?;

    // Commands first, then raw links, then confirmation replies for
    // chats with an armed destructive action
    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handlers::handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| {
                msg.text().map(watchq_extract::is_watch_link).unwrap_or(false)
            })
            .endpoint(handlers::ingest_link),
        )
        .branch(
            dptree::filter_async(|msg: Message, state: Arc<AppState>| async move {
                state.has_pending(msg.chat.id).await
            })
            .endpoint(handlers::pending_reply),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
