//! Tool for fetching company news

use async_trait::async_trait;

use finagent_tools::{Arguments, ParamSpec, ParamType, ParamValue, ToolDescriptor, ToolHandler};

use crate::api::{AlphaVantageClient, NewsArticle};
use crate::tools::require_alpha;

const DEFAULT_LIMIT: i64 = 5;

/// Fetches recent news articles mentioning a ticker
pub struct CompanyNewsTool {
    alpha: Option<AlphaVantageClient>,
}

impl CompanyNewsTool {
    pub fn new(alpha: Option<AlphaVantageClient>) -> Self {
        Self { alpha }
    }
}

#[async_trait]
impl ToolHandler for CompanyNewsTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_company_news",
            "Get recent news articles about a company.",
        )
        .with_param(ParamSpec::required(
            "symbol",
            ParamType::Str,
            "Stock ticker symbol (e.g., 'AAPL')",
        ))
        .with_param(ParamSpec::optional(
            "limit",
            ParamType::Int,
            "Maximum number of articles to return",
            ParamValue::Int(DEFAULT_LIMIT),
        ))
    }

    async fn call(&self, args: Arguments) -> finagent_tools::Result<String> {
        let symbol = args.str("symbol")?.to_uppercase();
        let limit = args.int("limit")?.max(0) as usize;

        let articles = require_alpha(self.alpha.as_ref())?.news(&symbol).await?;

        Ok(format_news(&symbol, &articles, limit))
    }
}

/// The limit applies at formatting time: with coverage and a limit of 0,
/// the header still appears with no items under it.
pub(crate) fn format_news(symbol: &str, articles: &[NewsArticle], limit: usize) -> String {
    if articles.is_empty() {
        // Empty coverage is an answer, not an error
        return format!("No news found for {symbol}.");
    }

    let mut out = format!("**Recent News for {symbol}:**");
    for article in articles.iter().take(limit) {
        out.push_str(&format!(
            "\n- **{}** ({})\n  {}",
            article.title, article.source, article.url
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            url: "https://example.com/story".to_string(),
            source: "Newswire".to_string(),
            time_published: Some("20250102T120000".to_string()),
            summary: None,
        }
    }

    #[test]
    fn test_tool_metadata() {
        let tool = CompanyNewsTool::new(None);
        let descriptor = tool.descriptor();

        assert_eq!(descriptor.name, "get_company_news");
        let schema = descriptor.input_schema();
        assert_eq!(schema["properties"]["limit"]["default"], 5);
        assert_eq!(schema["required"], serde_json::json!(["symbol"]));
    }

    #[test]
    fn test_format_news() {
        let articles = vec![article("Apple ships new device"), article("AAPL beats estimates")];
        let payload = format_news("AAPL", &articles, 5);

        assert!(payload.starts_with("**Recent News for AAPL:**"));
        assert!(payload.contains("- **Apple ships new device** (Newswire)"));
        assert!(payload.contains("  https://example.com/story"));
    }

    #[test]
    fn test_format_news_respects_limit() {
        let articles = vec![article("First story"), article("Second story")];
        let payload = format_news("AAPL", &articles, 1);

        assert!(payload.contains("First story"));
        assert!(!payload.contains("Second story"));
    }

    #[test]
    fn test_format_news_limit_zero_keeps_header() {
        let articles = vec![article("First story")];
        let payload = format_news("AAPL", &articles, 0);

        assert_eq!(payload, "**Recent News for AAPL:**");
    }

    #[test]
    fn test_format_news_empty() {
        assert_eq!(format_news("ZZZZ", &[], 5), "No news found for ZZZZ.");
    }
}
