//! Provider clients for external market data APIs

pub mod alpha_vantage;
pub mod yahoo;

pub use alpha_vantage::{
    AlphaVantageClient, CompanyOverview, ExchangeRate, NewsArticle, StatementKind, StatementReport,
};
pub use yahoo::{Bar, PriceSnapshot, YahooClient};
