use anyhow::{Context, Result};

mod config;
mod orchestrator;

use config::AgentConfig;
use filings::EdgarFilingsClient;
use market_data::YahooFinanceClient;
use news_feed::GoogleNewsFeed;
use notification_service::NotificationService;
use orchestrator::{AdvancedSources, AlertRun};
use sentiment_analysis::LlmSentimentScorer;
use social_signals::{RedditClient, TwitterClient};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    // 2. Configuration
    let config = AgentConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Tickers: {}", config.tickers.len());
    tracing::info!(
        "  Policies: simple={} advanced={}",
        config.policies.simple,
        config.policies.advanced
    );
    tracing::info!("  Price history range: {}", config.market_data.range);
    tracing::info!("  Dry run: {}", config.notification.dry_run);

    // 3. Clients
    let market = YahooFinanceClient::new(&config.market_data).context("market data client")?;
    let news = GoogleNewsFeed::new().context("news feed client")?;
    let notifier = NotificationService::new(&config.notification)?;

    let mut run = AlertRun::new(config.tickers.clone(), Box::new(market), Box::new(news), notifier);

    if config.policies.simple {
        run = run.with_simple_policy();
    }

    if config.policies.advanced {
        let llm = config.llm.as_ref().context("LLM settings missing")?;
        let reddit = config.reddit.as_ref().context("Reddit settings missing")?;
        let twitter = config.twitter.as_ref().context("Twitter settings missing")?;

        run = run.with_advanced_policy(AdvancedSources {
            sentiment: Box::new(LlmSentimentScorer::new(llm).context("LLM client")?),
            reddit: Box::new(RedditClient::new(reddit).context("Reddit client")?),
            twitter: Box::new(TwitterClient::new(twitter).context("Twitter client")?),
            filings: Box::new(EdgarFilingsClient::new(&config.edgar).context("EDGAR client")?),
        });
    }

    // 4. One pass over the ticker list
    let report = run.run().await;
    tracing::info!("  Filing set size: {}", report.filing_set_size);

    for score in report.scores.iter().filter(|s| s.alerted) {
        tracing::info!(
            "  Alerted {} ({}): {} [{}]",
            score.ticker,
            score.breakdown.policy.name(),
            score.breakdown.total(),
            score.breakdown.summary()
        );
    }
    tracing::info!(
        "Run complete: {} tickers processed, {} skipped, {} alerts sent, {} degraded source calls",
        report.tickers_processed,
        report.tickers_skipped,
        report.alerts_sent,
        report.degraded_sources
    );

    Ok(())
}
