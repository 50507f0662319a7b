use analysis_core::{NewsItem, SentimentScorer, SourceError};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

/// Headlines sent per request
const MAX_HEADLINES: usize = 10;

/// First signed decimal number in free text
static SCORE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").ok());

const SYSTEM_PROMPT: &str = "You are a financial news analyst. Rate the overall market \
sentiment of the headlines for the given stock as a single integer from -5 (very bearish) \
to 5 (very bullish). Reply with only the number.";

/// Chat-completions endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Scores headline batches with an OpenAI-compatible completion endpoint.
#[derive(Clone)]
pub struct LlmSentimentScorer {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmSentimentScorer {
    pub fn new(config: &LlmConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() {
            return Err(SourceError::Config("LLM API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Ask the model for a sentiment rating of `headlines`
    pub async fn rate(&self, symbol: &str, headlines: &[NewsItem]) -> Result<f64, SourceError> {
        if headlines.is_empty() {
            tracing::debug!(symbol, "No headlines, skipping sentiment request");
            return Ok(0.0);
        }

        let request = ChatRequest {
            model: &self.config.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(symbol, headlines),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let result = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SourceError::Parse("Completion returned no choices".to_string()))?;

        let score = parse_sentiment_score(&reply)?;
        tracing::debug!(symbol, score, reply = reply.trim(), "LLM sentiment");
        Ok(score)
    }
}

#[async_trait]
impl SentimentScorer for LlmSentimentScorer {
    async fn score_headlines(&self, ticker: &str, headlines: &[NewsItem]) -> Result<f64, SourceError> {
        self.rate(ticker, headlines).await
    }
}

/// User message listing the leading headlines, one per line.
pub fn build_prompt(symbol: &str, headlines: &[NewsItem]) -> String {
    let mut prompt = format!("Stock: {}\nHeadlines:\n", symbol);
    for item in headlines.iter().take(MAX_HEADLINES) {
        prompt.push_str("- ");
        prompt.push_str(&item.title);
        prompt.push('\n');
    }
    prompt
}

/// Extract the first signed number from free-text model output, clamped to [-5, 5].
pub fn parse_sentiment_score(reply: &str) -> Result<f64, SourceError> {
    let re = SCORE_PATTERN
        .as_ref()
        .ok_or_else(|| SourceError::Parse("score pattern failed to compile".to_string()))?;

    let raw = re
        .find(reply)
        .ok_or_else(|| SourceError::Parse(format!("No score in model reply: {:?}", reply.trim())))?;

    let value: f64 = raw
        .as_str()
        .parse()
        .map_err(|e| SourceError::Parse(format!("Bad score {:?}: {}", raw.as_str(), e)))?;

    Ok(value.clamp(-5.0, 5.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            published: None,
            link: String::new(),
        }
    }

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(parse_sentiment_score("3").unwrap(), 3.0);
        assert_eq!(parse_sentiment_score(" -2\n").unwrap(), -2.0);
        assert_eq!(parse_sentiment_score("+4").unwrap(), 4.0);
    }

    #[test]
    fn test_parse_embedded_in_text() {
        assert_eq!(parse_sentiment_score("Sentiment score: -3. Mostly negative.").unwrap(), -3.0);
        assert_eq!(parse_sentiment_score("I'd say 2.5 overall").unwrap(), 2.5);
    }

    #[test]
    fn test_parse_clamps_out_of_range() {
        assert_eq!(parse_sentiment_score("9").unwrap(), 5.0);
        assert_eq!(parse_sentiment_score("-12").unwrap(), -5.0);
    }

    #[test]
    fn test_parse_without_number_fails() {
        assert!(matches!(
            parse_sentiment_score("Neutral, hard to tell."),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_repeated_calls_share_pattern() {
        let replies = ["5", "-1", "Score: 0", "+2.0 bullish"];
        let scores: Vec<f64> = replies.iter().map(|r| parse_sentiment_score(r).unwrap()).collect();
        assert_eq!(scores, vec![5.0, -1.0, 0.0, 2.0]);
        assert!(SCORE_PATTERN.as_ref().is_some_and(|re| re.is_match("-3")));
    }

    #[test]
    fn test_build_prompt_limits_headlines() {
        let items: Vec<NewsItem> = (0..15).map(|i| headline(&format!("Headline {}", i))).collect();
        let prompt = build_prompt("AAPL", &items);

        assert!(prompt.starts_with("Stock: AAPL\n"));
        assert!(prompt.contains("- Headline 9\n"));
        assert!(!prompt.contains("Headline 10"));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let config = LlmConfig {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(LlmSentimentScorer::new(&config), Err(SourceError::Config(_))));
    }

    #[tokio::test]
    async fn test_no_headlines_scores_zero_without_request() {
        let config = LlmConfig {
            api_key: "test-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            // Unroutable: the call must not be made
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(50),
        };
        let scorer = LlmSentimentScorer::new(&config).unwrap();

        assert_eq!(scorer.rate("AAPL", &[]).await.unwrap(), 0.0);
    }
}
