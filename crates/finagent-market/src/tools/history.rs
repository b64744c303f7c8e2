//! Tool for fetching historical stock prices

use async_trait::async_trait;

use finagent_tools::{Arguments, ParamSpec, ParamType, ParamValue, ToolDescriptor, ToolHandler};
use finagent_utils::markdown;

use crate::api::{Bar, YahooClient};

const DEFAULT_PERIOD: &str = "1mo";
const DEFAULT_MAX_ROWS: i64 = 10;

/// Fetches daily price history and renders it as a markdown table
pub struct StockHistoryTool {
    yahoo: YahooClient,
}

impl StockHistoryTool {
    pub fn new() -> Self {
        Self {
            yahoo: YahooClient::new(),
        }
    }
}

impl Default for StockHistoryTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for StockHistoryTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_stock_history",
            "Get historical daily prices for a stock over a named period.",
        )
        .with_param(ParamSpec::required(
            "symbol",
            ParamType::Str,
            "Stock ticker symbol (e.g., 'AAPL')",
        ))
        .with_param(ParamSpec::optional(
            "period",
            ParamType::Str,
            "History period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max",
            ParamValue::Str(DEFAULT_PERIOD.to_string()),
        ))
        .with_param(ParamSpec::optional(
            "max_rows",
            ParamType::Int,
            "Maximum number of most recent rows to return",
            ParamValue::Int(DEFAULT_MAX_ROWS),
        ))
    }

    async fn call(&self, args: Arguments) -> finagent_tools::Result<String> {
        let symbol = args.str("symbol")?.to_uppercase();
        let period = args.str("period")?.to_string();
        let max_rows = args.int("max_rows")?.max(1) as usize;

        let bars = self.yahoo.history(&symbol, &period).await?;
        Ok(format_history(&symbol, &period, max_rows, &bars))
    }
}

pub(crate) fn format_history(symbol: &str, period: &str, max_rows: usize, bars: &[Bar]) -> String {
    if bars.is_empty() {
        return format!("No historical data found for {symbol} with period '{period}'.");
    }

    let tail = &bars[bars.len().saturating_sub(max_rows)..];
    let rows: Vec<Vec<String>> = tail
        .iter()
        .map(|bar| {
            vec![
                bar.timestamp.format("%Y-%m-%d").to_string(),
                format!("{:.2}", bar.open),
                format!("{:.2}", bar.high),
                format!("{:.2}", bar.low),
                format!("{:.2}", bar.close),
                bar.volume.to_string(),
            ]
        })
        .collect();

    let table = markdown::table(&["Date", "Open", "High", "Low", "Close", "Volume"], &rows);

    format!("**Historical Prices for {symbol} ({period}, last {max_rows} rows):**\n\n{table}")
}
