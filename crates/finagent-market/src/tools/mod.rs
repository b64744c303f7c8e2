//! Tool handlers exposed by the market data server

pub mod company;
pub mod crypto;
pub mod history;
pub mod news;
pub mod price;
pub mod statements;

use std::sync::Arc;

use tracing::warn;

use finagent_tools::ToolRegistry;

use crate::api::AlphaVantageClient;
use crate::config::MarketConfig;

pub use company::CompanyInfoTool;
pub use crypto::CryptoPriceTool;
pub use history::StockHistoryTool;
pub use news::CompanyNewsTool;
pub use price::StockPriceTool;
pub use statements::FinancialStatementTool;

/// Register the full market tool surface.
///
/// Tools backed by Alpha Vantage are registered even without an API key so
/// the advertised tool list stays stable; without a key they report a
/// configuration failure per call.
pub fn register_tools(
    registry: &mut ToolRegistry,
    config: &MarketConfig,
) -> finagent_tools::Result<()> {
    let alpha = match &config.alpha_vantage_api_key {
        Some(key) => Some(AlphaVantageClient::new(
            key.clone(),
            config.alpha_vantage_rate_limit,
            config.request_timeout,
        )?),
        None => {
            warn!("ALPHA_VANTAGE_API_KEY not set, statement/news/crypto tools will report errors");
            None
        }
    };

    registry.register(Arc::new(StockPriceTool::new()))?;
    registry.register(Arc::new(StockHistoryTool::new()))?;
    registry.register(Arc::new(FinancialStatementTool::new(alpha.clone())))?;
    registry.register(Arc::new(CompanyInfoTool::new(alpha.clone())))?;
    registry.register(Arc::new(CompanyNewsTool::new(alpha.clone())))?;
    registry.register(Arc::new(CryptoPriceTool::new(alpha)))?;

    Ok(())
}

/// Shared guard for tools that need Alpha Vantage
pub(crate) fn require_alpha(
    client: Option<&AlphaVantageClient>,
) -> finagent_tools::Result<&AlphaVantageClient> {
    client.ok_or_else(|| {
        finagent_tools::ToolError::Execution(
            "Alpha Vantage API key not configured. Set ALPHA_VANTAGE_API_KEY.".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_tools_without_api_key() {
        let mut registry = ToolRegistry::new();
        register_tools(&mut registry, &MarketConfig::default()).unwrap();

        let names: Vec<&str> = registry
            .list()
            .iter()
            .map(|t| t.descriptor.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "get_stock_price",
                "get_stock_history",
                "get_financial_statement",
                "get_company_info",
                "get_company_news",
                "get_crypto_price",
            ]
        );
    }

    #[test]
    fn test_register_tools_with_api_key() {
        let config = MarketConfig::builder().alpha_vantage_api_key("demo").build();
        let mut registry = ToolRegistry::new();
        register_tools(&mut registry, &config).unwrap();
        assert_eq!(registry.len(), 6);
    }

    #[tokio::test]
    async fn test_alpha_tools_fail_cleanly_without_key() {
        let mut registry = ToolRegistry::new();
        register_tools(&mut registry, &MarketConfig::default()).unwrap();

        let dispatcher = finagent_tools::Dispatcher::new(Arc::new(registry));
        let request = finagent_tools::InvocationRequest::new("get_company_news", {
            let mut map = serde_json::Map::new();
            map.insert("symbol".to_string(), serde_json::json!("AAPL"));
            map
        });

        let result = dispatcher.dispatch(&request).await;
        assert!(!result.is_success());
        assert!(result.payload().contains("ALPHA_VANTAGE_API_KEY"));
    }
}
