use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use keyword_bot::channels::{ChannelManager, CliChannel, TelegramChannel};
use keyword_bot::config::BotConfig;
use keyword_bot::dialogue::KeywordBot;
use keyword_bot::fetch::HttpPageFetcher;
use keyword_bot::keywords::KeywordPipeline;
use keyword_bot::lexicon;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BotConfig::from_env().context("Failed to read configuration")?;

    // Initialize tracing; stdout belongs to the CLI channel.
    let file_writer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "keyword-bot.log");
            Some(tracing_appender::non_blocking(appender))
        }
        None => None,
    };
    let (file_layer, _log_guard) = match file_writer {
        Some((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        ),
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    eprintln!("🔎 Keyword Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Fetch timeout: {:?}", config.fetch.timeout);
    eprintln!(
        "   Telegram: {}",
        if config.telegram.is_some() { "enabled" } else { "disabled" }
    );
    eprintln!("   Type /start to begin, /quit to exit.\n");

    let lexicon = lexicon::from_config(&config.lexicon).context("Failed to open dictionary")?;
    let fetcher = HttpPageFetcher::new(&config.fetch).context("Failed to build HTTP client")?;
    let pipeline = KeywordPipeline::new(lexicon, Arc::new(fetcher));

    let mut channels = ChannelManager::new();
    channels.add(Box::new(CliChannel::new()));
    if let Some(telegram) = &config.telegram {
        channels.add(Box::new(TelegramChannel::new(telegram)));
    }

    KeywordBot::new(config, pipeline, channels)
        .run()
        .await
        .context("Keyword bot stopped with an error")?;

    Ok(())
}
