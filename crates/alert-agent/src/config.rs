use anyhow::{bail, Context, Result};
use filings::EdgarConfig;
use market_data::MarketDataConfig;
use notification_service::NotificationConfig;
use sentiment_analysis::LlmConfig;
use social_signals::{RedditConfig, TwitterConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Large caps polled when ALERT_TICKERS is not set
pub const DEFAULT_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "BRK-B", "JPM", "V",
    "JNJ", "WMT", "UNH", "HD", "PG", "MA", "DIS", "BAC", "ADBE", "CMCSA",
    "NFLX", "PFE", "KO", "XOM", "CSCO", "VZ", "PEP", "INTC", "T", "CVX",
    "ABT", "CRM", "COST", "NKE", "MRK", "ORCL", "ACN", "MDT", "QCOM", "TXN",
    "LIN", "BMY", "LOW", "IBM", "MCD", "GE", "AMGN", "SBUX", "GILD", "UPS",
];

/// Which scoring policies run. The two are independent alert tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySelection {
    pub simple: bool,
    pub advanced: bool,
}

impl FromStr for PolicySelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self { simple: true, advanced: false }),
            "advanced" => Ok(Self { simple: false, advanced: true }),
            "both" => Ok(Self { simple: true, advanced: true }),
            other => bail!("Unknown SCORING_POLICY {:?} (expected simple, advanced or both)", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub tickers: Vec<String>,
    pub policies: PolicySelection,

    pub market_data: MarketDataConfig,
    pub notification: NotificationConfig,

    // Only needed by the advanced policy
    pub llm: Option<LlmConfig>,
    pub reddit: Option<RedditConfig>,
    pub twitter: Option<TwitterConfig>,
    pub edgar: EdgarConfig,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        let policies: PolicySelection = env::var("SCORING_POLICY")
            .unwrap_or_else(|_| "advanced".to_string())
            .parse()?;

        let tickers = match env::var("ALERT_TICKERS") {
            Ok(raw) => parse_tickers(&raw),
            Err(_) => DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        };
        if tickers.is_empty() {
            bail!("ALERT_TICKERS is set but contains no tickers");
        }

        let market_data = MarketDataConfig {
            range: env::var("PRICE_HISTORY_RANGE").unwrap_or_else(|_| "3mo".to_string()),
            ..Default::default()
        };

        let notification = NotificationConfig::from_env();
        if !notification.dry_run && notification.twilio.is_none() {
            bail!("TWILIO_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE and TARGET_PHONE must be set (or ALERT_DRY_RUN=true)");
        }

        let mut edgar = EdgarConfig::default();
        if let Ok(user_agent) = env::var("SEC_USER_AGENT") {
            edgar.user_agent = user_agent;
        }

        let (llm, reddit, twitter) = if policies.advanced {
            let llm = LlmConfig {
                api_key: required("OPENAI_API_KEY")?,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                timeout: Duration::from_secs(30),
            };
            let reddit = RedditConfig {
                client_id: required("REDDIT_CLIENT_ID")?,
                client_secret: required("REDDIT_CLIENT_SECRET")?,
                user_agent: env::var("REDDIT_USER_AGENT")
                    .unwrap_or_else(|_| "opportunity-alerts/0.1".to_string()),
            };
            let twitter = TwitterConfig {
                bearer_token: required("TWITTER_BEARER_TOKEN")?,
            };
            (Some(llm), Some(reddit), Some(twitter))
        } else {
            (None, None, None)
        };

        Ok(Self {
            tickers,
            policies,
            market_data,
            notification,
            llm,
            reddit,
            twitter,
            edgar,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{} not set", name))
}

/// Comma-separated symbols, trimmed and upper-cased; blanks dropped.
pub fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ticker_list() {
        assert_eq!(DEFAULT_TICKERS.len(), 50);
        assert_eq!(DEFAULT_TICKERS[0], "AAPL");
        assert_eq!(DEFAULT_TICKERS[49], "UPS");
    }

    #[test]
    fn test_parse_tickers() {
        assert_eq!(parse_tickers(" aapl, MSFT,,brk-b "), vec!["AAPL", "MSFT", "BRK-B"]);
        assert!(parse_tickers(" , ").is_empty());
    }

    #[test]
    fn test_policy_selection() {
        assert_eq!(
            "Both".parse::<PolicySelection>().unwrap(),
            PolicySelection { simple: true, advanced: true }
        );
        assert!(!"simple".parse::<PolicySelection>().unwrap().advanced);
        assert!("fancy".parse::<PolicySelection>().is_err());
    }
}
