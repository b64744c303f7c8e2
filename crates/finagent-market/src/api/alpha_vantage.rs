//! Alpha Vantage API client
//!
//! Covers the endpoints the tools need: financial statements, company
//! overview, news sentiment, and currency exchange rates. Free-tier keys
//! allow 5 requests per minute, so every call waits on a shared rate
//! limiter first.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};

const BASE_URL: &str = "https://www.alphavantage.co/query";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

/// Which financial statement to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

impl StatementKind {
    /// Parse the user-facing statement_type value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "balance" => Some(Self::Balance),
            "cashflow" => Some(Self::CashFlow),
            _ => None,
        }
    }

    /// Alpha Vantage function name for this statement
    pub fn function(self) -> &'static str {
        match self {
            Self::Income => "INCOME_STATEMENT",
            Self::Balance => "BALANCE_SHEET",
            Self::CashFlow => "CASH_FLOW",
        }
    }

    /// Human-readable label used in payload text
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "income statement",
            Self::Balance => "balance sheet",
            Self::CashFlow => "cash flow",
        }
    }

    /// Heading form of the label
    pub fn title(self) -> &'static str {
        match self {
            Self::Income => "Income Statement",
            Self::Balance => "Balance Sheet",
            Self::CashFlow => "Cash Flow Statement",
        }
    }
}

/// One annual report from a statement endpoint
///
/// Alpha Vantage reports every line item as a string ("1000000" or "None"),
/// so the items stay strings until formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementReport {
    #[serde(rename = "fiscalDateEnding")]
    pub fiscal_date_ending: String,

    #[serde(flatten)]
    pub items: BTreeMap<String, String>,
}

/// Company overview and fundamentals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<String>,
    pub description: Option<String>,
}

/// One article from the news sentiment feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default)]
    pub time_published: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Realtime currency exchange rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    #[serde(rename = "1. From_Currency Code")]
    pub from_code: String,
    #[serde(rename = "2. From_Currency Name")]
    pub from_name: Option<String>,
    #[serde(rename = "3. To_Currency Code")]
    pub to_code: String,
    #[serde(rename = "4. To_Currency Name")]
    pub to_name: Option<String>,
    #[serde(rename = "5. Exchange Rate")]
    pub rate: String,
    #[serde(rename = "6. Last Refreshed")]
    pub last_refreshed: Option<String>,
}

impl ExchangeRate {
    /// Exchange rate as a number
    pub fn rate_value(&self) -> Result<f64> {
        self.rate
            .parse()
            .map_err(|_| ProviderError::AlphaVantage(format!("Unparseable rate: {}", self.rate)))
    }
}

impl AlphaVantageClient {
    /// Create a client with the given API key, per-minute rate limit, and
    /// request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let per_minute = NonZeroU32::new(rate_limit)
            .ok_or_else(|| ProviderError::Config("rate limit must be nonzero".to_string()))?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("apikey", self.api_key.as_str()));

        let response = self.client.get(BASE_URL).query(&query).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::AlphaVantage(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        Self::check_api_errors(&data)?;
        Ok(data)
    }

    /// Alpha Vantage reports errors inside a 200 response body
    fn check_api_errors(data: &Value) -> Result<()> {
        if let Some(error) = data.get("Error Message") {
            return Err(ProviderError::AlphaVantage(
                error.as_str().unwrap_or("unknown error").to_string(),
            ));
        }

        // "Note" and "Information" both signal throttling
        if data.get("Note").is_some() || data.get("Information").is_some() {
            return Err(ProviderError::RateLimitExceeded {
                provider: "Alpha Vantage".to_string(),
            });
        }

        Ok(())
    }

    /// Fetch annual reports for a financial statement.
    /// An unknown-but-valid symbol yields an empty list.
    pub async fn statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<Vec<StatementReport>> {
        let data = self
            .get(&[("function", kind.function()), ("symbol", symbol)])
            .await?;

        match data.get("annualReports") {
            Some(reports) => Ok(serde_json::from_value(reports.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Fetch company overview and fundamentals
    pub async fn overview(&self, symbol: &str) -> Result<CompanyOverview> {
        let data = self
            .get(&[("function", "OVERVIEW"), ("symbol", symbol)])
            .await?;

        // An empty object means the symbol is unknown
        if data.as_object().is_none_or(serde_json::Map::is_empty) {
            return Err(ProviderError::InvalidSymbol(symbol.to_string()));
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Fetch recent news articles mentioning a ticker.
    /// No coverage yields an empty list, not an error.
    pub async fn news(&self, symbol: &str) -> Result<Vec<NewsArticle>> {
        let data = self
            .get(&[("function", "NEWS_SENTIMENT"), ("tickers", symbol)])
            .await?;

        match data.get("feed") {
            Some(feed) => Ok(serde_json::from_value(feed.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Fetch the realtime exchange rate between two currencies
    /// (crypto or fiat)
    pub async fn exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate> {
        let data = self
            .get(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", from),
                ("to_currency", to),
            ])
            .await?;

        let rate = data
            .get("Realtime Currency Exchange Rate")
            .ok_or_else(|| ProviderError::InvalidSymbol(from.to_string()))?;

        Ok(serde_json::from_value(rate.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statement_kind_parse() {
        assert_eq!(StatementKind::parse("income"), Some(StatementKind::Income));
        assert_eq!(StatementKind::parse("balance"), Some(StatementKind::Balance));
        assert_eq!(StatementKind::parse("cashflow"), Some(StatementKind::CashFlow));
        assert_eq!(StatementKind::parse("quarterly"), None);
    }

    #[test]
    fn test_statement_kind_functions() {
        assert_eq!(StatementKind::Income.function(), "INCOME_STATEMENT");
        assert_eq!(StatementKind::Balance.function(), "BALANCE_SHEET");
        assert_eq!(StatementKind::CashFlow.function(), "CASH_FLOW");
    }

    #[test]
    fn test_client_creation() {
        let client =
            AlphaVantageClient::new("test_key", 5, Duration::from_secs(30)).unwrap();
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let result = AlphaVantageClient::new("test_key", 0, Duration::from_secs(30));
        assert!(matches!(result, Err(ProviderError::Config(_))));
    }

    #[test]
    fn test_error_message_detected() {
        let data = json!({"Error Message": "Invalid API call."});
        let err = AlphaVantageClient::check_api_errors(&data).unwrap_err();
        assert!(matches!(err, ProviderError::AlphaVantage(_)));
    }

    #[test]
    fn test_note_is_rate_limit() {
        let data = json!({"Note": "Thank you for using Alpha Vantage!"});
        let err = AlphaVantageClient::check_api_errors(&data).unwrap_err();
        assert!(matches!(err, ProviderError::RateLimitExceeded { .. }));
    }

    #[test]
    fn test_statement_report_parsing() {
        let report: StatementReport = serde_json::from_value(json!({
            "fiscalDateEnding": "2024-09-30",
            "reportedCurrency": "USD",
            "totalRevenue": "391035000000",
            "netIncome": "93736000000"
        }))
        .unwrap();

        assert_eq!(report.fiscal_date_ending, "2024-09-30");
        assert_eq!(
            report.items.get("totalRevenue").map(String::as_str),
            Some("391035000000")
        );
    }

    #[test]
    fn test_exchange_rate_parsing() {
        let rate: ExchangeRate = serde_json::from_value(json!({
            "1. From_Currency Code": "BTC",
            "2. From_Currency Name": "Bitcoin",
            "3. To_Currency Code": "USD",
            "4. To_Currency Name": "United States Dollar",
            "5. Exchange Rate": "65123.45000000",
            "6. Last Refreshed": "2025-01-02 12:00:00"
        }))
        .unwrap();

        assert_eq!(rate.from_code, "BTC");
        assert_eq!(rate.to_code, "USD");
        assert!((rate.rate_value().unwrap() - 65123.45).abs() < 1e-6);
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_overview() {
        let config = crate::MarketConfig::from_env();
        let key = config.alpha_vantage_api_key.unwrap();
        let client = AlphaVantageClient::new(key, 5, Duration::from_secs(30)).unwrap();

        let overview = client.overview("AAPL").await.unwrap();
        assert_eq!(overview.symbol, "AAPL");
        assert!(overview.name.contains("Apple"));
    }
}
