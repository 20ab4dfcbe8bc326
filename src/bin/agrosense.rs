//! agrosense CLI: local smoke testing for the request handler.

use agrosense::config::Config;
use agrosense::config::secrets::mask;
use agrosense::handler;
use agrosense::telemetry::{TelemetryConfig, init_telemetry};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agrosense", about = "AgroSense farmer assistant request handler")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the built-in demo query through the handler (default)
    Demo,
    /// Handle a JSON payload and print the response
    Handle {
        /// Inline JSON payload
        #[arg(long, conflicts_with = "file")]
        payload: Option<String>,
        /// Read the payload from a file (stdin when neither flag is given)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show the resolved configuration and validate it
    Check {
        /// Require Azure credentials when Azure mode is enabled
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env();

    let _guard = init_telemetry(TelemetryConfig::from_config(&config))?;

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => cmd_demo(&config),
        Command::Handle { payload, file } => cmd_handle(&config, payload, file),
        Command::Check { strict } => cmd_check(&config, strict),
    }
}

fn cmd_demo(config: &Config) -> anyhow::Result<()> {
    println!("AgroSense - request handler");
    println!("{}", "=".repeat(50));

    if let Err(e) = config.validate(false) {
        println!("Configuration warning: {e}");
    }

    println!("Mode: {}", config.mode().label());
    println!("Environment: {}", config.environment);
    println!();

    let payload = json!({
        "text": "What is the price of maize in Kano?",
        "language": "en",
        "farmerId": "farmer_001",
    });

    println!("Test payload:");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    println!();

    let response = handler::handle(&payload, config);

    println!("Response:");
    println!("{}", serde_json::to_string_pretty(&response)?);
    println!();
    println!("Handler executed successfully (ready for Azure Functions deployment)");

    Ok(())
}

fn cmd_handle(
    config: &Config,
    payload: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let body = match (payload, file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("cannot read payload {}: {e}", path.display()))?,
        (None, None) => std::io::read_to_string(std::io::stdin())?,
    };

    let response = handler::handle_str(&body, config);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_check(config: &Config, strict: bool) -> anyhow::Result<()> {
    println!("Mode:         {}", config.mode().label());
    println!("Environment:  {}", config.environment);
    println!("Deployment:   {}", config.azure_openai_deployment);
    println!("OpenAI Key:   {}", mask(&config.azure_openai_key));
    println!("OpenAI URL:   {}", mask(&config.azure_openai_endpoint));
    println!("Search Key:   {}", mask(&config.azure_search_key));
    println!("Search URL:   {}", mask(&config.azure_search_endpoint));
    println!("Cosmos DB:    {}", mask(&config.cosmosdb_connection));
    println!(
        "OTLP:         {}",
        config.otel_endpoint.as_deref().unwrap_or("-")
    );
    println!("Log Level:    {}", config.log_level);
    println!("---");

    let check = if strict { "strict" } else { "lenient" };
    match config.validate(strict) {
        Ok(()) => {
            println!("Validation ({check}): ok");
            Ok(())
        }
        Err(e) => {
            println!("Validation ({check}): {e}");
            Err(e.into())
        }
    }
}
