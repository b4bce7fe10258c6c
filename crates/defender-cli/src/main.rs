//! defender-bridge - Main entry point
//!
//! Serves the Defender alert and device queries over MCP stdio, or
//! runs them once from the command line with text output.

use clap::{Parser, Subcommand};
use defender_api::{
    format_alerts, format_devices, AlertQuery, ClientCredentialTokenSource, DefenderClient,
    DefenderConfig,
};
use defender_mcp::{GetAlertsTool, ListDevicesTool, McpServer, ToolRegistry};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// defender-bridge - Microsoft Defender alerts and devices over MCP
#[derive(Parser, Debug)]
#[command(name = "defender-bridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdio
    Serve,

    /// Fetch recent alerts and print them as text
    Alerts {
        /// Maximum number of alerts to request
        #[arg(short, long, default_value = "30")]
        limit: u32,

        /// Only alerts created on or after this date (YYYY-MM-DDTHH:mm:ssZ)
        #[arg(long)]
        start_date: Option<String>,

        /// Only alerts created on or before this date (YYYY-MM-DDTHH:mm:ssZ)
        #[arg(long)]
        end_date: Option<String>,

        /// Only alerts for a specific device ID
        #[arg(long)]
        device_id: Option<String>,
    },

    /// Fetch the device inventory and print it as text
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logging goes to stderr; in serve mode stdout carries the protocol
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Optional .env file next to the working directory
    let _ = dotenv::dotenv();

    // Fail fast before serving or querying anything
    let config = DefenderConfig::from_env()?;
    tracing::debug!("Credentials loaded for tenant {}", config.tenant_id);
    let tokens = Arc::new(ClientCredentialTokenSource::new(config));
    let client = Arc::new(DefenderClient::new(tokens));

    match args.command {
        Command::Serve => {
            let mut registry = ToolRegistry::new();
            registry.register(Arc::new(GetAlertsTool::new(client.clone())));
            registry.register(Arc::new(ListDevicesTool::new(client)));

            McpServer::new(registry).run_stdio().await?;
        }
        Command::Alerts {
            limit,
            start_date,
            end_date,
            device_id,
        } => {
            let mut query = AlertQuery::new().limit(limit);
            if let Some(start) = start_date {
                query = query.start_date(start);
            }
            if let Some(end) = end_date {
                query = query.end_date(end);
            }
            if let Some(device) = device_id {
                query = query.device_id(device);
            }

            let alerts = client.get_alerts(&query).await?;
            println!("{}", format_alerts(&alerts));
        }
        Command::Devices => {
            let devices = client.list_devices().await?;
            println!("{}", format_devices(&devices));
        }
    }

    Ok(())
}
