//! Command-line interface for finagent-rs
//!
//! Two modes:
//!
//! - `finagent serve` runs the stdio tool server, exposing market data
//!   tools over JSON-RPC for an agent frontend to call.
//! - `finagent ask "<question>"` runs the agent loop: it spawns the tool
//!   server as a child process, connects an LLM provider, and answers the
//!   question with tool use.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use finagent_llm::providers::openai::{OpenAIConfig, OpenAIProvider};
use finagent_market::MarketConfig;
use finagent_mcp::{McpClient, StdioClient, ToolServer};
use finagent_runtime::AgentExecutor;
use finagent_tools::ToolRegistry;

#[derive(Parser, Debug)]
#[command(name = "finagent")]
#[command(about = "Financial market data tools for LLM agents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the stdio tool server
    Serve,

    /// Ask the agent a question
    Ask {
        /// The question to answer
        question: String,

        /// Model to use
        #[arg(long, default_value = "llama-3.3-70b-versatile")]
        model: String,

        /// Maximum reasoning turns
        #[arg(long, default_value_t = 10)]
        max_turns: usize,

        /// Tool server command (defaults to this binary's `serve` mode)
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => serve().await,
        Command::Ask {
            question,
            model,
            max_turns,
            server,
        } => ask(question, model, max_turns, server).await,
    }
}

/// Run the tool server over stdin/stdout
async fn serve() -> anyhow::Result<()> {
    // Stdout is the protocol channel, diagnostics go to stderr
    finagent_utils::init_stderr_tracing();

    let config = MarketConfig::from_env();

    let mut registry = ToolRegistry::new();
    finagent_market::register_tools(&mut registry, &config)
        .context("Failed to register market data tools")?;

    let server = ToolServer::new(Arc::new(registry), "finagent", env!("CARGO_PKG_VERSION"));

    let mut transport = finagent_mcp::stdio();
    server.serve(&mut transport).await?;

    Ok(())
}

/// Run the agent loop for a single question
async fn ask(
    question: String,
    model: String,
    max_turns: usize,
    server: Option<String>,
) -> anyhow::Result<()> {
    finagent_utils::init_tracing();

    let provider = build_provider()?;

    let client = Arc::new(build_client(server)?);
    client
        .connect()
        .await
        .context("Failed to start the tool server")?;

    if let Some(server_info) = client.server_info().await {
        info!(
            server = %server_info.name,
            version = %server_info.version,
            "tool server ready"
        );
    }

    let executor = AgentExecutor::builder()
        .provider(Arc::new(provider))
        .client(Arc::clone(&client) as Arc<dyn McpClient>)
        .model(model)
        .max_turns(max_turns)
        .build()?;

    let result = executor.run(question).await;

    // Shut the child server down before reporting the outcome
    let _ = client.disconnect().await;

    println!("{}", result?);
    Ok(())
}

/// Build the LLM provider from environment configuration
///
/// Prefers `GROQ_API_KEY` for the Groq endpoint, otherwise falls back to
/// `OPENAI_API_KEY` (with optional `OPENAI_API_BASE`).
fn build_provider() -> anyhow::Result<OpenAIProvider> {
    let config = match std::env::var("GROQ_API_KEY") {
        Ok(api_key) => OpenAIConfig::groq(api_key),
        Err(_) => OpenAIConfig::from_env()
            .context("Set GROQ_API_KEY or OPENAI_API_KEY to use the agent")?,
    };

    Ok(OpenAIProvider::with_config(config)?)
}

/// Build the tool server client
///
/// By default the agent re-invokes this binary in `serve` mode so the
/// tools always match the frontend version.
fn build_client(server: Option<String>) -> anyhow::Result<StdioClient> {
    let client = match server {
        Some(command) => {
            let mut parts = command.split_whitespace().map(String::from);
            let program = parts
                .next()
                .context("Empty --server command")?;
            StdioClient::new(program, parts.collect())
        }
        None => {
            let exe = std::env::current_exe().context("Failed to resolve current executable")?;
            StdioClient::new(exe.to_string_lossy(), vec!["serve".to_string()])
        }
    };

    Ok(client)
}
