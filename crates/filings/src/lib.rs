//! Recent ownership-disclosure filers from SEC EDGAR.
//!
//! The "current events" Atom feed lists the latest filings of one form type.
//! Schedule 13D and 13G (beneficial ownership above 5%) are fetched once per
//! run and merged into a single [`FilingSet`] of company names.

use analysis_core::{FilingSet, FilingSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CURRENT_FILINGS_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";

/// Form types treated as ownership disclosures. EDGAR switched from the
/// `SC 13D`/`SC 13G` names to `SCHEDULE 13D`/`SCHEDULE 13G` in December 2024.
pub const OWNERSHIP_FORMS: &[&str] = &["SC 13D", "SC 13G", "SCHEDULE 13D", "SCHEDULE 13G"];

/// EDGAR client settings
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    pub base_url: String,
    /// EDGAR rejects anonymous clients; include a contact address.
    pub user_agent: String,
    pub forms: Vec<String>,
    pub count: u32,
    pub timeout: Duration,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            base_url: CURRENT_FILINGS_URL.to_string(),
            user_agent: "opportunity-alerts admin@example.com".to_string(),
            forms: OWNERSHIP_FORMS.iter().map(|f| f.to_string()).collect(),
            count: 100,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<String>,
}

pub struct EdgarFilingsClient {
    client: Client,
    config: EdgarConfig,
}

impl EdgarFilingsClient {
    pub fn new(config: &EdgarConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Company names from the latest filings of one form type
    pub async fn current_filers(&self, form: &str) -> Result<Vec<String>, SourceError> {
        let count = self.config.count.to_string();

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("action", "getcurrent"),
                ("type", form),
                ("owner", "include"),
                ("count", count.as_str()),
                ("output", "atom"),
            ])
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
        parse_feed(&body)
    }
}

#[async_trait]
impl FilingSource for EdgarFilingsClient {
    async fn recent_filers(&self) -> Result<FilingSet, SourceError> {
        let mut set = FilingSet::new();
        for form in &self.config.forms {
            let names = self.current_filers(form).await?;
            tracing::debug!(form = form.as_str(), count = names.len(), "Fetched current filings");
            set.extend(names);
        }
        Ok(set)
    }
}

/// Parse an EDGAR current-events Atom feed into company names.
pub fn parse_feed(xml: &str) -> Result<Vec<String>, SourceError> {
    let feed: Feed = quick_xml::de::from_str(xml).map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|e| e.title)
        .filter_map(|t| company_from_title(&t))
        .collect())
}

/// `"SC 13D - Acme Corp (0000123456) (Subject)"` -> `"Acme Corp"`
pub fn company_from_title(title: &str) -> Option<String> {
    let (_, rest) = title.split_once(" - ")?;
    let name = match rest.find(" (") {
        Some(idx) => &rest[..idx],
        None => rest,
    };

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_FIXTURE: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
<title>Latest Filings - Tue, 04 Jun 2024 16:02:11 EDT</title>
<link rel="alternate" href="/cgi-bin/browse-edgar?action=getcurrent"/>
<author><name>Webmaster</name><email>webmaster@sec.gov</email></author>
<updated>2024-06-04T16:02:11-04:00</updated>
<entry>
<title>SC 13D - Acme Widgets, Inc. (0001234567) (Subject)</title>
<link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1234567/0001-index.htm"/>
<summary type="html"> &lt;b&gt;Filed:&lt;/b&gt; 2024-06-04 </summary>
<updated>2024-06-04T16:01:52-04:00</updated>
<category scheme="https://www.sec.gov/" label="form type" term="SC 13D"/>
<id>urn:tag:sec.gov,2008:accession-number=0001-24-000001</id>
</entry>
<entry>
<title>SC 13D - Big Fund LP (0007654321) (Filed by)</title>
<updated>2024-06-04T16:01:52-04:00</updated>
</entry>
<entry>
<title>malformed title</title>
</entry>
</feed>"#;

    #[test]
    fn test_parse_feed_extracts_companies() {
        let names = parse_feed(FEED_FIXTURE).unwrap();
        assert_eq!(names, vec!["Acme Widgets, Inc.".to_string(), "Big Fund LP".to_string()]);
    }

    #[test]
    fn test_company_from_title() {
        assert_eq!(
            company_from_title("SC 13G - TSLA (0001318605) (Subject)").as_deref(),
            Some("TSLA")
        );
        assert_eq!(company_from_title("SC 13G - Name Without Cik").as_deref(), Some("Name Without Cik"));
        assert_eq!(company_from_title("SC 13G -  (0001) (Subject)"), None);
        assert_eq!(company_from_title("no separator"), None);
    }

    #[test]
    fn test_parse_schedule_form_titles() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry><title>SCHEDULE 13G - NVDA (0001045810) (Subject)</title></entry>
<entry><title>SCHEDULE 13D/A - Orbit Holdings LLC (0009876543) (Filed by)</title></entry>
</feed>"#;
        let names = parse_feed(xml).unwrap();
        assert_eq!(names, vec!["NVDA".to_string(), "Orbit Holdings LLC".to_string()]);

        let set: FilingSet = names.into_iter().collect();
        assert!(set.contains("NVDA"));
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>Latest Filings</title></feed>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_default_config_uses_ownership_forms() {
        let config = EdgarConfig::default();
        assert_eq!(config.forms, vec!["SC 13D", "SC 13G", "SCHEDULE 13D", "SCHEDULE 13G"]);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
