//! Tool for fetching financial statements

use async_trait::async_trait;

use finagent_tools::{Arguments, ParamSpec, ParamType, ParamValue, ToolDescriptor, ToolHandler};
use finagent_utils::markdown;

use crate::api::{AlphaVantageClient, StatementKind, StatementReport};
use crate::tools::require_alpha;

/// How many annual reports to show side by side
const REPORT_COLUMNS: usize = 3;

/// Fetches annual financial statements (income, balance, cash flow)
pub struct FinancialStatementTool {
    alpha: Option<AlphaVantageClient>,
}

impl FinancialStatementTool {
    pub fn new(alpha: Option<AlphaVantageClient>) -> Self {
        Self { alpha }
    }
}

#[async_trait]
impl ToolHandler for FinancialStatementTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_financial_statement",
            "Get an annual financial statement for a company: income statement, balance sheet, or cash flow.",
        )
        .with_param(ParamSpec::required(
            "symbol",
            ParamType::Str,
            "Stock ticker symbol (e.g., 'AAPL')",
        ))
        .with_param(ParamSpec::optional(
            "statement_type",
            ParamType::Str,
            "Statement to fetch: 'income', 'balance', or 'cashflow'",
            ParamValue::Str("income".to_string()),
        ))
    }

    async fn call(&self, args: Arguments) -> finagent_tools::Result<String> {
        let symbol = args.str("symbol")?.to_uppercase();
        let raw_kind = args.str("statement_type")?;

        // An unsupported statement_type is answered with usage guidance,
        // not a failure
        let Some(kind) = StatementKind::parse(raw_kind) else {
            return Ok(format!(
                "Invalid statement_type: {raw_kind}. Use 'income', 'balance', or 'cashflow'."
            ));
        };

        let reports = require_alpha(self.alpha.as_ref())?
            .statement(&symbol, kind)
            .await?;

        Ok(format_statement(&symbol, kind, &reports))
    }
}

pub(crate) fn format_statement(
    symbol: &str,
    kind: StatementKind,
    reports: &[StatementReport],
) -> String {
    if reports.is_empty() {
        return format!("No {} data found for {symbol}.", kind.label());
    }

    let shown = &reports[..reports.len().min(REPORT_COLUMNS)];

    let mut headers: Vec<&str> = vec!["Item"];
    headers.extend(shown.iter().map(|r| r.fiscal_date_ending.as_str()));

    // BTreeMap keys give a stable row order; the first report defines the
    // item set
    let rows: Vec<Vec<String>> = shown[0]
        .items
        .keys()
        .map(|item| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(item.clone());
            for report in shown {
                row.push(report.items.get(item).cloned().unwrap_or_default());
            }
            row
        })
        .collect();

    let table = markdown::table(&headers, &rows);
    format!("**{} for {symbol} (annual):**\n\n{table}", kind.title())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn report(date: &str, revenue: &str) -> StatementReport {
        let mut items = BTreeMap::new();
        items.insert("totalRevenue".to_string(), revenue.to_string());
        items.insert("netIncome".to_string(), "1000".to_string());
        StatementReport {
            fiscal_date_ending: date.to_string(),
            items,
        }
    }

    #[test]
    fn test_tool_metadata() {
        let tool = FinancialStatementTool::new(None);
        let descriptor = tool.descriptor();

        assert_eq!(descriptor.name, "get_financial_statement");
        let schema = descriptor.input_schema();
        assert_eq!(schema["properties"]["statement_type"]["default"], "income");
        assert_eq!(schema["required"], serde_json::json!(["symbol"]));
    }

    #[tokio::test]
    async fn test_invalid_statement_type_is_usage_message() {
        let tool = FinancialStatementTool::new(None);
        let mut args = Arguments::default();
        args.insert("symbol", ParamValue::Str("AAPL".to_string()));
        args.insert("statement_type", ParamValue::Str("quarterly".to_string()));

        // Succeeds with guidance even though no client is configured
        let payload = tool.call(args).await.unwrap();
        assert_eq!(
            payload,
            "Invalid statement_type: quarterly. Use 'income', 'balance', or 'cashflow'."
        );
    }

    #[test]
    fn test_format_statement() {
        let reports = vec![report("2024-09-30", "391035000000"), report("2023-09-30", "383285000000")];
        let payload = format_statement("AAPL", StatementKind::Income, &reports);

        assert!(payload.starts_with("**Income Statement for AAPL (annual):**"));
        assert!(payload.contains("| Item | 2024-09-30 | 2023-09-30 |"));
        assert!(payload.contains("totalRevenue"));
        assert!(payload.contains("391035000000"));
    }

    #[test]
    fn test_format_statement_caps_columns() {
        let reports: Vec<StatementReport> = (2020..2026)
            .rev()
            .map(|y| report(&format!("{y}-09-30"), "1"))
            .collect();
        let payload = format_statement("AAPL", StatementKind::Balance, &reports);

        assert!(payload.contains("2025-09-30"));
        assert!(payload.contains("2023-09-30"));
        assert!(!payload.contains("2022-09-30"));
    }

    #[test]
    fn test_format_statement_empty() {
        let payload = format_statement("ZZZZ", StatementKind::CashFlow, &[]);
        assert_eq!(payload, "No cash flow data found for ZZZZ.");
    }
}
