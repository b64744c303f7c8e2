//! Tool for fetching cryptocurrency prices

use async_trait::async_trait;

use finagent_tools::{Arguments, ParamSpec, ParamType, ParamValue, ToolDescriptor, ToolHandler};

use crate::api::{AlphaVantageClient, ExchangeRate};
use crate::error::Result as ProviderResult;
use crate::tools::require_alpha;

/// Fetches the current price of a cryptocurrency in a fiat currency
pub struct CryptoPriceTool {
    alpha: Option<AlphaVantageClient>,
}

impl CryptoPriceTool {
    pub fn new(alpha: Option<AlphaVantageClient>) -> Self {
        Self { alpha }
    }
}

#[async_trait]
impl ToolHandler for CryptoPriceTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_crypto_price",
            "Get the current price of a cryptocurrency.",
        )
        .with_param(ParamSpec::required(
            "symbol",
            ParamType::Str,
            "Cryptocurrency symbol (e.g., 'BTC', 'ETH')",
        ))
        .with_param(ParamSpec::optional(
            "currency",
            ParamType::Str,
            "Quote currency for the price",
            ParamValue::Str("USD".to_string()),
        ))
    }

    async fn call(&self, args: Arguments) -> finagent_tools::Result<String> {
        let symbol = args.str("symbol")?.to_uppercase();
        let currency = args.str("currency")?.to_uppercase();

        let rate = require_alpha(self.alpha.as_ref())?
            .exchange_rate(&symbol, &currency)
            .await?;

        Ok(format_crypto_price(&rate)?)
    }
}

pub(crate) fn format_crypto_price(rate: &ExchangeRate) -> ProviderResult<String> {
    Ok(format!(
        "Current price of {}: {:.2} {}",
        rate.from_code,
        rate.rate_value()?,
        rate.to_code
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(value: &str) -> ExchangeRate {
        ExchangeRate {
            from_code: "BTC".to_string(),
            from_name: Some("Bitcoin".to_string()),
            to_code: "USD".to_string(),
            to_name: Some("United States Dollar".to_string()),
            rate: value.to_string(),
            last_refreshed: Some("2025-01-02 12:00:00".to_string()),
        }
    }

    #[test]
    fn test_tool_metadata() {
        let tool = CryptoPriceTool::new(None);
        let descriptor = tool.descriptor();

        assert_eq!(descriptor.name, "get_crypto_price");
        let schema = descriptor.input_schema();
        assert_eq!(schema["properties"]["currency"]["default"], "USD");
        assert_eq!(schema["required"], serde_json::json!(["symbol"]));
    }

    #[test]
    fn test_format_crypto_price() {
        let payload = format_crypto_price(&rate("65123.45000000")).unwrap();
        assert_eq!(payload, "Current price of BTC: 65123.45 USD");
    }

    #[test]
    fn test_unparseable_rate_is_error() {
        let result = format_crypto_price(&rate("n/a"));
        assert!(result.is_err());
    }
}
