mod sms;
mod templates;

pub use sms::{TwilioConfig, TwilioSmsNotifier};
pub use templates::SmsTemplate;

use analysis_core::SocialSignal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert types that trigger notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlertType {
    /// First-version alert: price move and headline count.
    SimpleOpportunity {
        ticker: String,
        change_pct: Option<f64>,
        news_count: usize,
        score: i32,
    },
    /// Full signal set for one ticker.
    AdvancedOpportunity {
        ticker: String,
        score: i32,
        rsi: Option<f64>,
        change_pct: f64,
        volume: u64,
        ai_sentiment: f64,
        reddit: SocialSignal,
        twitter: SocialSignal,
        in_filing_set: bool,
        headlines: Vec<String>,
    },
}

impl AlertType {
    pub fn ticker(&self) -> &str {
        match self {
            AlertType::SimpleOpportunity { ticker, .. } => ticker,
            AlertType::AdvancedOpportunity { ticker, .. } => ticker,
        }
    }

    pub fn score(&self) -> i32 {
        match self {
            AlertType::SimpleOpportunity { score, .. } => *score,
            AlertType::AdvancedOpportunity { score, .. } => *score,
        }
    }
}

/// A notification alert to be dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_type: AlertType,
    pub timestamp: DateTime<Utc>,
    pub title: String,
}

impl Alert {
    pub fn new(alert_type: AlertType) -> Self {
        Self::at(alert_type, Utc::now())
    }

    /// Alert stamped with the run time it belongs to.
    pub fn at(alert_type: AlertType, timestamp: DateTime<Utc>) -> Self {
        let title = format!("Investment Alert for {}", alert_type.ticker());
        Self {
            alert_type,
            timestamp,
            title,
        }
    }

    /// Rendered message text
    pub fn body(&self) -> String {
        SmsTemplate::render(self)
    }
}

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), NotificationError>;
    fn name(&self) -> &str;
}

/// Errors from the notification system.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("SMS gateway error: {0}")]
    Sms(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for the notification service.
#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub twilio: Option<TwilioConfig>,
    /// Log alerts instead of sending them.
    pub dry_run: bool,
}

impl NotificationConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        let dry_run = std::env::var("ALERT_DRY_RUN")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            twilio: TwilioConfig::from_env(),
            dry_run,
        }
    }
}

/// Dispatches alerts to every configured channel.
pub struct NotificationService {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl NotificationService {
    /// Build the channel list. Outside dry-run mode the SMS gateway is mandatory.
    pub fn new(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();

        if config.dry_run {
            tracing::info!("Dry run: alerts will be logged, not sent");
            channels.push(Box::new(LogNotifier));
        } else {
            let twilio = config.twilio.as_ref().ok_or_else(|| {
                NotificationError::Config(
                    "SMS gateway not configured (set TWILIO_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE, TARGET_PHONE)"
                        .into(),
                )
            })?;
            channels.push(Box::new(TwilioSmsNotifier::new(twilio)?));
            tracing::info!("SMS notifications enabled (-> {})", twilio.to_number);
        }

        Ok(Self { channels })
    }

    /// Service over caller-supplied channels
    pub fn with_channels(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Send alert to every channel in turn, awaiting each. Returns how many
    /// channels accepted it; failures are logged and do not propagate.
    pub async fn send_alert_async(&self, alert: &Alert) -> usize {
        let mut delivered = 0;
        for channel in self.channels.iter() {
            match channel.send(alert).await {
                Ok(()) => {
                    tracing::debug!("Sent notification via {}", channel.name());
                    delivered += 1;
                }
                Err(e) => {
                    tracing::error!(
                        ticker = alert.alert_type.ticker(),
                        "Failed to send notification via {}: {}",
                        channel.name(),
                        e
                    )
                }
            }
        }
        delivered
    }
}

/// Writes alerts to the log instead of an external gateway.
struct LogNotifier;

#[async_trait]
impl NotificationChannel for LogNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        tracing::info!(
            ticker = alert.alert_type.ticker(),
            score = alert.alert_type.score(),
            "[dry run] {}\n{}",
            alert.title,
            alert.body()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NotificationChannel for Recorder {
        async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push(alert.body());
            Ok(())
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    struct Broken;

    #[async_trait]
    impl NotificationChannel for Broken {
        async fn send(&self, _alert: &Alert) -> Result<(), NotificationError> {
            Err(NotificationError::Sms("HTTP 401".into()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn simple_alert() -> Alert {
        Alert::new(AlertType::SimpleOpportunity {
            ticker: "AAPL".to_string(),
            change_pct: Some(6.25),
            news_count: 4,
            score: 7,
        })
    }

    #[tokio::test]
    async fn test_failed_channel_does_not_stop_others() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let service = NotificationService::with_channels(vec![
            Box::new(Broken),
            Box::new(Recorder { sent: sent.clone() }),
        ]);

        let delivered = service.send_alert_async(&simple_alert()).await;

        assert_eq!(delivered, 1);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_gateway_is_config_error() {
        let config = NotificationConfig {
            twilio: None,
            dry_run: false,
        };
        assert!(matches!(NotificationService::new(&config), Err(NotificationError::Config(_))));
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_gateway() {
        let config = NotificationConfig {
            twilio: None,
            dry_run: true,
        };
        let service = NotificationService::new(&config).unwrap();
        assert_eq!(service.send_alert_async(&simple_alert()).await, 1);
    }

    #[test]
    fn test_alert_title() {
        assert_eq!(simple_alert().title, "Investment Alert for AAPL");
        assert_eq!(simple_alert().alert_type.score(), 7);
    }
}
