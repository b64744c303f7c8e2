//! Yahoo Finance API client

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::error::{ProviderError, Result};

/// Yahoo Finance client for quotes and price history
pub struct YahooClient {}

/// Latest traded price for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub price: f64,
    /// Quote currency when the provider reports one
    pub currency: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One OHLCV bar of price history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl YahooClient {
    pub fn new() -> Self {
        Self {}
    }

    /// Get the latest quote for a symbol
    ///
    /// Returns `Ok(None)` when the provider has no price data for the
    /// symbol.
    pub async fn quote(&self, symbol: &str) -> Result<Option<PriceSnapshot>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| ProviderError::Yahoo(e.to_string()))?;

        let response = match provider.get_latest_quotes(symbol, "1d").await {
            Ok(response) => response,
            Err(yahoo::YahooError::NoResult | yahoo::YahooError::NoQuotes) => return Ok(None),
            Err(e) => return Err(ProviderError::Yahoo(e.to_string())),
        };

        let quote = match response.last_quote() {
            Ok(quote) => quote,
            Err(yahoo::YahooError::NoResult | yahoo::YahooError::NoQuotes) => return Ok(None),
            Err(e) => return Err(ProviderError::Yahoo(e.to_string())),
        };

        Ok(Some(PriceSnapshot {
            symbol: symbol.to_string(),
            price: quote.close,
            currency: None,
            timestamp: DateTime::from_timestamp(quote.timestamp as i64, 0)
                .unwrap_or_else(Utc::now),
        }))
    }

    /// Get daily price history for a symbol over a named period
    /// (e.g. "1mo", "6mo", "1y")
    pub async fn history(&self, symbol: &str, period: &str) -> Result<Vec<Bar>> {
        let end = Utc::now();
        let start = match period {
            "1d" => end - chrono::Duration::days(1),
            "5d" => end - chrono::Duration::days(5),
            "1mo" => end - chrono::Duration::days(30),
            "3mo" => end - chrono::Duration::days(90),
            "6mo" => end - chrono::Duration::days(180),
            "1y" => end - chrono::Duration::days(365),
            "2y" => end - chrono::Duration::days(730),
            "5y" => end - chrono::Duration::days(1825),
            "10y" => end - chrono::Duration::days(3650),
            "ytd" => {
                let year = end.year();
                match chrono::NaiveDate::from_ymd_opt(year, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                {
                    Some(start_of_year) => start_of_year.and_utc(),
                    None => end - chrono::Duration::days(365),
                }
            }
            // ~100 years
            "max" => end - chrono::Duration::days(36500),
            other => {
                return Err(ProviderError::Yahoo(format!("Invalid period: {other}")));
            }
        };

        self.history_between(symbol, start, end).await
    }

    async fn history_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| ProviderError::Yahoo(e.to_string()))?;

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ProviderError::Yahoo(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ProviderError::Yahoo(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| ProviderError::Yahoo(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| ProviderError::Yahoo(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| Bar {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_period_rejected() {
        let client = YahooClient::new();
        let err = client.history("AAPL", "42mo").await.unwrap_err();
        assert!(err.to_string().contains("Invalid period"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_quote() {
        let client = YahooClient::new();
        let snapshot = client.quote("AAPL").await.unwrap().unwrap();
        assert_eq!(snapshot.symbol, "AAPL");
        assert!(snapshot.price > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history() {
        let client = YahooClient::new();
        let bars = client.history("AAPL", "1mo").await.unwrap();
        assert!(!bars.is_empty());
    }
}
