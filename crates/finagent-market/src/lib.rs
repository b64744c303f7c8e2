//! Market data tools for finagent-rs
//!
//! Provider clients for Yahoo Finance and Alpha Vantage, plus the tool
//! handlers the bridge exposes: stock price, price history, financial
//! statements, company info, company news, and crypto prices.

pub mod api;
pub mod config;
pub mod error;
pub mod tools;

pub use config::MarketConfig;
pub use error::{ProviderError, Result};
pub use tools::register_tools;
