//! Tool for fetching company information

use async_trait::async_trait;

use finagent_tools::{Arguments, ParamSpec, ParamType, ToolDescriptor, ToolHandler};

use crate::api::{AlphaVantageClient, CompanyOverview};
use crate::tools::require_alpha;

/// Fetches company profile and fundamentals
pub struct CompanyInfoTool {
    alpha: Option<AlphaVantageClient>,
}

impl CompanyInfoTool {
    pub fn new(alpha: Option<AlphaVantageClient>) -> Self {
        Self { alpha }
    }
}

#[async_trait]
impl ToolHandler for CompanyInfoTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_company_info",
            "Get company profile and key fundamentals for a ticker symbol.",
        )
        .with_param(ParamSpec::required(
            "symbol",
            ParamType::Str,
            "Stock ticker symbol (e.g., 'AAPL')",
        ))
    }

    async fn call(&self, args: Arguments) -> finagent_tools::Result<String> {
        let symbol = args.str("symbol")?.to_uppercase();
        let overview = require_alpha(self.alpha.as_ref())?.overview(&symbol).await?;
        Ok(format_company_info(&overview))
    }
}

pub(crate) fn format_company_info(overview: &CompanyOverview) -> String {
    fn field(value: &Option<String>) -> &str {
        value.as_deref().filter(|v| !v.is_empty()).unwrap_or("N/A")
    }

    let mut out = format!("**Company Information for {}:**\n", overview.symbol);
    out.push_str(&format!("- Name: {}\n", overview.name));
    out.push_str(&format!("- Exchange: {}\n", field(&overview.exchange)));
    out.push_str(&format!("- Sector: {}\n", field(&overview.sector)));
    out.push_str(&format!("- Industry: {}\n", field(&overview.industry)));
    out.push_str(&format!("- Country: {}\n", field(&overview.country)));
    out.push_str(&format!("- Market Cap: {}\n", field(&overview.market_cap)));
    out.push_str(&format!("- P/E Ratio: {}\n", field(&overview.pe_ratio)));
    out.push_str(&format!(
        "- Dividend Yield: {}",
        field(&overview.dividend_yield)
    ));

    if let Some(description) = overview.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("\n\n{description}"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview() -> CompanyOverview {
        CompanyOverview {
            symbol: "AAPL".to_string(),
            name: "Apple Inc".to_string(),
            exchange: Some("NASDAQ".to_string()),
            sector: Some("TECHNOLOGY".to_string()),
            industry: Some("ELECTRONIC COMPUTERS".to_string()),
            country: Some("USA".to_string()),
            market_cap: Some("3400000000000".to_string()),
            pe_ratio: Some("34.5".to_string()),
            dividend_yield: Some("0.0044".to_string()),
            description: Some("Apple Inc. designs consumer electronics.".to_string()),
        }
    }

    #[test]
    fn test_tool_metadata() {
        let tool = CompanyInfoTool::new(None);
        let descriptor = tool.descriptor();

        assert_eq!(descriptor.name, "get_company_info");
        assert_eq!(
            descriptor.input_schema()["required"],
            serde_json::json!(["symbol"])
        );
    }

    #[test]
    fn test_format_company_info() {
        let payload = format_company_info(&overview());

        assert!(payload.starts_with("**Company Information for AAPL:**"));
        assert!(payload.contains("- Name: Apple Inc"));
        assert!(payload.contains("- Exchange: NASDAQ"));
        assert!(payload.contains("- Market Cap: 3400000000000"));
        assert!(payload.ends_with("Apple Inc. designs consumer electronics."));
    }

    #[test]
    fn test_format_company_info_missing_fields() {
        let overview = CompanyOverview {
            exchange: None,
            sector: Some(String::new()),
            description: None,
            ..overview()
        };

        let payload = format_company_info(&overview);
        assert!(payload.contains("- Exchange: N/A"));
        assert!(payload.contains("- Sector: N/A"));
        assert!(payload.ends_with("- Dividend Yield: 0.0044"));
    }
}
