use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::{Alert, NotificationChannel, NotificationError};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio account and the single destination number.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
    pub api_base: String,
}

impl TwilioConfig {
    /// `None` unless all of TWILIO_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE and
    /// TARGET_PHONE are set.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|s| !s.trim().is_empty());

        Some(Self {
            account_sid: var("TWILIO_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from_number: var("TWILIO_PHONE")?,
            to_number: var("TARGET_PHONE")?,
            api_base: var("TWILIO_API_BASE").unwrap_or_else(|| TWILIO_API_BASE.to_string()),
        })
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

pub struct TwilioSmsNotifier {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsNotifier {
    pub fn new(config: &TwilioConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotificationError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl NotificationChannel for TwilioSmsNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        let body = alert.body();

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", self.config.to_number.as_str()),
                ("From", self.config.from_number.as_str()),
                ("Body", body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NotificationError::Sms(format!("Failed to send SMS: {}", e)))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let detail = serde_json::from_str::<TwilioErrorBody>(&text)
                .ok()
                .map(|e| format!("{} ({})", e.message.unwrap_or_default(), e.code.unwrap_or_default()))
                .unwrap_or(text);
            return Err(NotificationError::Sms(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        match serde_json::from_str::<TwilioMessage>(&text) {
            Ok(message) => tracing::info!(
                ticker = alert.alert_type.ticker(),
                sid = message.sid.as_str(),
                "Sent SMS alert"
            ),
            Err(_) => tracing::info!(ticker = alert.alert_type.ticker(), "Sent SMS alert"),
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "twilio-sms"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let config = TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550001111".to_string(),
            to_number: "+15552223333".to_string(),
            api_base: "https://api.twilio.com/2010-04-01/".to_string(),
        };

        assert_eq!(
            config.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
