//! Tool for fetching the latest stock price

use async_trait::async_trait;

use finagent_tools::{Arguments, ParamSpec, ParamType, ToolDescriptor, ToolHandler};

use crate::api::{PriceSnapshot, YahooClient};

/// Fetches the latest traded price for a stock symbol
pub struct StockPriceTool {
    yahoo: YahooClient,
}

impl StockPriceTool {
    pub fn new() -> Self {
        Self {
            yahoo: YahooClient::new(),
        }
    }
}

impl Default for StockPriceTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for StockPriceTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_stock_price",
            "Get the current stock price for a given ticker symbol.",
        )
        .with_param(ParamSpec::required(
            "symbol",
            ParamType::Str,
            "Stock ticker symbol (e.g., 'AAPL', 'MSFT')",
        ))
    }

    async fn call(&self, args: Arguments) -> finagent_tools::Result<String> {
        let symbol = args.str("symbol")?.to_uppercase();
        match self.yahoo.quote(&symbol).await? {
            Some(snapshot) => Ok(format_price(&snapshot)),
            None => Ok(format!("Price data not available for {symbol}.")),
        }
    }
}

pub(crate) fn format_price(snapshot: &PriceSnapshot) -> String {
    let currency = snapshot.currency.as_deref().unwrap_or("USD");
    format!(
        "Current price of {}: {:.2} {}",
        snapshot.symbol, snapshot.price, currency
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_tool_metadata() {
        let tool = StockPriceTool::new();
        let descriptor = tool.descriptor();

        assert_eq!(descriptor.name, "get_stock_price");
        assert!(!descriptor.description.is_empty());

        let schema = descriptor.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["symbol"]["type"], "string");
        assert_eq!(schema["required"], serde_json::json!(["symbol"]));
    }

    #[test]
    fn test_format_price() {
        let snapshot = PriceSnapshot {
            symbol: "AAPL".to_string(),
            price: 228.50,
            currency: Some("USD".to_string()),
            timestamp: Utc::now(),
        };

        let payload = format_price(&snapshot);
        assert_eq!(payload, "Current price of AAPL: 228.50 USD");
        assert!(payload.contains("228.50"));
        assert!(payload.contains("USD"));
    }

    #[test]
    fn test_format_price_defaults_to_usd() {
        let snapshot = PriceSnapshot {
            symbol: "MSFT".to_string(),
            price: 415.0,
            currency: None,
            timestamp: Utc::now(),
        };

        assert_eq!(format_price(&snapshot), "Current price of MSFT: 415.00 USD");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_call_live() {
        let tool = StockPriceTool::new();
        let mut args = Arguments::default();
        args.insert("symbol", finagent_tools::ParamValue::Str("AAPL".to_string()));

        let payload = tool.call(args).await.unwrap();
        assert!(payload.starts_with("Current price of AAPL:"));
    }
}
