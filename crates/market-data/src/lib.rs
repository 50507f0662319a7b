use analysis_core::{Bar, MarketDataSource, SourceError};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Settings for the daily price history client.
#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub chart_url: String,
    /// Yahoo range expression, e.g. `5d`, `1mo`, `3mo`.
    pub range: String,
    pub timeout: Duration,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            chart_url: CHART_URL.to_string(),
            range: "3mo".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    chart_url: String,
    range: String,
}

impl YahooFinanceClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            chart_url: config.chart_url.trim_end_matches('/').to_string(),
            range: config.range.clone(),
        })
    }

    /// Get daily bars covering the configured range, oldest first.
    pub async fn get_daily_bars(&self, symbol: &str) -> Result<Vec<Bar>, SourceError> {
        let url = format!("{}/{}", self.chart_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", self.range.as_str()), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let bars = parse_chart(&body)?;
        tracing::debug!(symbol, bars = bars.len(), "Fetched daily bars");
        Ok(bars)
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn daily_bars(&self, ticker: &str) -> Result<Vec<Bar>, SourceError> {
        self.get_daily_bars(ticker).await
    }
}

// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Parse a chart API payload into bars. Rows with any null field are skipped.
pub fn parse_chart(body: &str) -> Result<Vec<Bar>, SourceError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    if let Some(err) = response.chart.error {
        return Err(SourceError::Parse(format!(
            "{}: {}",
            err.code.unwrap_or_else(|| "error".to_string()),
            err.description.unwrap_or_default()
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| SourceError::Parse("No chart data found".to_string()))?;

    let quotes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Parse("No quote data found".to_string()))?;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let row = (
            DateTime::from_timestamp(ts, 0),
            quotes.open.get(i).copied().flatten(),
            quotes.high.get(i).copied().flatten(),
            quotes.low.get(i).copied().flatten(),
            quotes.close.get(i).copied().flatten(),
            quotes.volume.get(i).copied().flatten(),
        );

        if let (Some(timestamp), Some(open), Some(high), Some(low), Some(close), Some(volume)) = row {
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "currency": "USD"},
                "timestamp": [1717077600, 1717164000, 1717423200],
                "indicators": {
                    "quote": [{
                        "open":   [190.76, 191.44, null],
                        "high":   [192.18, 192.57, 194.99],
                        "low":    [190.63, 189.91, 192.52],
                        "close":  [191.29, 192.25, 194.03],
                        "volume": [49947900, 75158300, 50080500]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_null_rows() {
        let bars = parse_chart(CHART_FIXTURE).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 191.29);
        assert_eq!(bars[1].volume, 75_158_300);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn test_parse_chart_error_payload() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        match parse_chart(body) {
            Err(SourceError::Parse(msg)) => assert!(msg.contains("delisted")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_malformed() {
        assert!(matches!(parse_chart("<html>"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = MarketDataConfig {
            chart_url: "http://localhost:9/chart/".to_string(),
            ..Default::default()
        };
        let client = YahooFinanceClient::new(&config).unwrap();
        assert_eq!(client.chart_url, "http://localhost:9/chart");
        assert_eq!(client.range, "3mo");
    }
}
