use analysis_core::{
    FilingSet, FilingSource, MarketDataSource, NewsItem, NewsSource, SentimentScorer, SocialSource,
    SourceError, SourceResult,
};
use chrono::{DateTime, Utc};
use notification_service::{Alert, AlertType, NotificationService};
use opportunity_scoring::{
    score_advanced, score_simple, AdvancedSignals, ScoreBreakdown, ScoringPolicy, SimpleSignals,
};
use technical_analysis::price_indicators;

/// Sources only the advanced policy consults.
pub struct AdvancedSources {
    pub sentiment: Box<dyn SentimentScorer>,
    pub reddit: Box<dyn SocialSource>,
    pub twitter: Box<dyn SocialSource>,
    pub filings: Box<dyn FilingSource>,
}

/// Score of one ticker under one policy.
#[derive(Debug, Clone)]
pub struct TickerScore {
    pub ticker: String,
    pub breakdown: ScoreBreakdown,
    pub alerted: bool,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub tickers_processed: usize,
    /// Tickers the advanced policy could not score (short history or unusable prices)
    pub tickers_skipped: usize,
    pub alerts_sent: usize,
    /// Source calls that failed and were replaced by a neutral value
    pub degraded_sources: usize,
    pub filing_set_size: usize,
    pub scores: Vec<TickerScore>,
}

/// One pass over the ticker list.
///
/// Every remote call is awaited before the next one starts. A failing source
/// degrades to its neutral value and the run carries on with the next call.
pub struct AlertRun {
    tickers: Vec<String>,
    market: Box<dyn MarketDataSource>,
    news: Box<dyn NewsSource>,
    notifier: NotificationService,
    simple: bool,
    advanced: Option<AdvancedSources>,
}

impl AlertRun {
    pub fn new(
        tickers: Vec<String>,
        market: Box<dyn MarketDataSource>,
        news: Box<dyn NewsSource>,
        notifier: NotificationService,
    ) -> Self {
        Self {
            tickers,
            market,
            news,
            notifier,
            simple: false,
            advanced: None,
        }
    }

    pub fn with_simple_policy(mut self) -> Self {
        self.simple = true;
        self
    }

    pub fn with_advanced_policy(mut self, sources: AdvancedSources) -> Self {
        self.advanced = Some(sources);
        self
    }

    pub async fn run(&self) -> RunReport {
        let mut report = RunReport {
            started_at: Utc::now(),
            ..Default::default()
        };

        tracing::info!(
            tickers = self.tickers.len(),
            simple = self.simple,
            advanced = self.advanced.is_some(),
            "Starting investment alert run"
        );

        let filings = match &self.advanced {
            Some(sources) => {
                let set = settle(&mut report, "filings", None, sources.filings.recent_filers().await);
                tracing::info!(filers = set.len(), "Loaded ownership filing set");
                set
            }
            None => FilingSet::new(),
        };
        report.filing_set_size = filings.len();

        for ticker in &self.tickers {
            self.process_ticker(ticker, &filings, &mut report).await;
        }

        tracing::info!(
            processed = report.tickers_processed,
            skipped = report.tickers_skipped,
            alerts = report.alerts_sent,
            degraded = report.degraded_sources,
            "Finished run"
        );
        report
    }

    async fn process_ticker(&self, ticker: &str, filings: &FilingSet, report: &mut RunReport) {
        tracing::info!(ticker, "Checking {}...", ticker);
        report.tickers_processed += 1;

        let bars = settle(report, "market-data", Some(ticker), self.market.daily_bars(ticker).await);

        let indicators = match &self.advanced {
            Some(_) => match price_indicators(ticker, &bars, ScoringPolicy::Advanced.min_history()) {
                Ok(indicators) => Some(indicators),
                Err(e) => {
                    tracing::info!(ticker, bars = bars.len(), "Skipping advanced scoring: {}", e);
                    report.tickers_skipped += 1;
                    None
                }
            },
            None => None,
        };

        let news: Vec<NewsItem> = if self.simple || indicators.is_some() {
            settle(report, "news", Some(ticker), self.news.headlines(ticker).await)
        } else {
            Vec::new()
        };

        if self.simple {
            let signals = SimpleSignals {
                change_pct: price_indicators(ticker, &bars, ScoringPolicy::Simple.min_history())
                    .ok()
                    .map(|i| i.change_pct),
                news_count: news.len(),
            };
            let breakdown = score_simple(&signals);
            let change = signals
                .change_pct
                .map(|c| format!("{:.2}%", c))
                .unwrap_or_else(|| "n/a".to_string());
            tracing::info!(
                ticker,
                policy = "simple",
                change_pct = ?signals.change_pct,
                news_count = signals.news_count,
                score = breakdown.total(),
                "{}: Change={}, News count={}, Score={}",
                ticker,
                change,
                signals.news_count,
                breakdown.total()
            );
            let alert = AlertType::SimpleOpportunity {
                ticker: ticker.to_string(),
                change_pct: signals.change_pct,
                news_count: signals.news_count,
                score: breakdown.total(),
            };
            self.record(ticker, breakdown, alert, report).await;
        }

        if let (Some(sources), Some(indicators)) = (&self.advanced, indicators) {
            let ai_sentiment = settle(
                report,
                "sentiment",
                Some(ticker),
                sources.sentiment.score_headlines(ticker, &news).await,
            );
            let reddit = settle(
                report,
                sources.reddit.platform().name(),
                Some(ticker),
                sources.reddit.signal(ticker).await,
            );
            let twitter = settle(
                report,
                sources.twitter.platform().name(),
                Some(ticker),
                sources.twitter.signal(ticker).await,
            );

            let signals = AdvancedSignals {
                indicators: &indicators,
                ai_sentiment,
                reddit,
                twitter,
            };
            let breakdown = score_advanced(&signals, filings);
            let in_filing_set = filings.contains(ticker);
            let rsi = indicators
                .rsi
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "n/a".to_string());
            tracing::info!(
                ticker,
                policy = "advanced",
                rsi = ?indicators.rsi,
                change_pct = indicators.change_pct,
                volume = indicators.volume,
                ai_sentiment,
                reddit_mentions = reddit.mentions,
                reddit_sentiment = reddit.sentiment,
                twitter_mentions = twitter.mentions,
                twitter_sentiment = twitter.sentiment,
                in_filing_set,
                score = breakdown.total(),
                "{}: RSI={}, Change={:+.2}%, Volume={}, AI={:+.1}, Reddit={}/{:+}, Twitter={}/{:+}, Filing={}, Score={}",
                ticker,
                rsi,
                indicators.change_pct,
                indicators.volume,
                ai_sentiment,
                reddit.mentions,
                reddit.sentiment,
                twitter.mentions,
                twitter.sentiment,
                in_filing_set,
                breakdown.total()
            );
            let alert = AlertType::AdvancedOpportunity {
                ticker: ticker.to_string(),
                score: breakdown.total(),
                rsi: indicators.rsi,
                change_pct: indicators.change_pct,
                volume: indicators.volume,
                ai_sentiment,
                reddit,
                twitter,
                in_filing_set,
                headlines: news.iter().map(|n| n.title.clone()).collect(),
            };
            self.record(ticker, breakdown, alert, report).await;
        }
    }

    /// Log the score and dispatch an alert when it reaches the policy threshold.
    async fn record(
        &self,
        ticker: &str,
        breakdown: ScoreBreakdown,
        alert_type: AlertType,
        report: &mut RunReport,
    ) {
        let policy = breakdown.policy.name();
        let score = breakdown.total();
        tracing::debug!(ticker, policy, score, "{} {} score {}: {}", ticker, policy, score, breakdown.summary());

        let mut alerted = false;
        if breakdown.qualifies() {
            let alert = Alert::at(alert_type, report.started_at);
            if self.notifier.send_alert_async(&alert).await > 0 {
                tracing::info!(ticker, policy, score, "Alert sent");
                report.alerts_sent += 1;
                alerted = true;
            }
        }

        report.scores.push(TickerScore {
            ticker: ticker.to_string(),
            breakdown,
            alerted,
        });
    }
}

fn settle<T: Default>(
    report: &mut RunReport,
    source: &str,
    ticker: Option<&str>,
    result: Result<T, SourceError>,
) -> T {
    let settled = SourceResult::settle(source, ticker, result);
    if settled.is_degraded() {
        report.degraded_sources += 1;
    }
    settled.into_value()
}
