use crate::{Alert, AlertType};

/// Headlines included in an SMS
const MAX_HEADLINES: usize = 3;

pub struct SmsTemplate;

impl SmsTemplate {
    pub fn render(alert: &Alert) -> String {
        match &alert.alert_type {
            AlertType::SimpleOpportunity {
                ticker,
                change_pct,
                news_count,
                score,
            } => {
                let change = change_pct
                    .map(|c| format!("{:.2}%", c))
                    .unwrap_or_else(|| "n/a".to_string());
                format!(
                    "\u{1f4c8} Investment Alert for {ticker}:\nChange: {change}\nNews Items: {news_count}\nScore: {score}"
                )
            }
            AlertType::AdvancedOpportunity {
                ticker,
                score,
                rsi,
                change_pct,
                volume,
                ai_sentiment,
                reddit,
                twitter,
                in_filing_set,
                headlines,
            } => {
                let rsi = rsi
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "n/a".to_string());
                let filing = if *in_filing_set { "yes" } else { "no" };
                let mut message = format!(
                    "\u{1f4c8} Investment Alert for {ticker} ({ts} UTC)\n\
                     Score: {score}\n\
                     RSI: {rsi}\n\
                     Change: {change_pct:+.2}%\n\
                     Volume: {volume}\n\
                     AI Sentiment: {ai_sentiment:+.1}\n\
                     Reddit: {rm} mentions, sentiment {rs:+}\n\
                     Twitter: {tm} mentions, sentiment {tws:+}\n\
                     SEC filing: {filing}",
                    ts = alert.timestamp.format("%Y-%m-%d %H:%M"),
                    rm = reddit.mentions,
                    rs = reddit.sentiment,
                    tm = twitter.mentions,
                    tws = twitter.sentiment,
                );

                if !headlines.is_empty() {
                    message.push_str("\nNews:");
                    for title in headlines.iter().take(MAX_HEADLINES) {
                        message.push_str("\n- ");
                        message.push_str(title);
                    }
                }
                message
            }
        }
    }
}
