//! Prints the Calendly user behind the access token and their event types,
//! ready to be copied into the `calendly.events` config section.

use clap::Parser;
use connectify_calendly::{logic, CalendlyClient};
use connectify_common::logging::{self, log_result};
use connectify_config::{load_config, CalendlyConfig};
use std::process;
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(version, about = "List the Calendly event types owned by an access token")]
struct Args {
    /// Calendly personal access token (overrides calendly.access_token)
    #[arg(short, long, env = "CALENDLY_TOKEN")]
    token: Option<String>,

    /// Include inactive event types
    #[arg(long)]
    all: bool,

    /// Print the raw JSON response instead of a listing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(e) = run().await {
        error!("calendly-event-types failed: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut calendly = match load_config() {
        Ok(config) => config.calendly.unwrap_or_default(),
        Err(e) => {
            warn!("No usable configuration ({}), using Calendly defaults", e);
            CalendlyConfig::default()
        }
    };
    if let Some(token) = args.token {
        calendly.access_token = Some(token);
    }

    let client = CalendlyClient::from_config(&calendly)?;
    let progress = |message: &str| println!("… {}", message);
    let response = log_result(
        logic::list_event_types(&client, &progress).await,
        "Fetched Calendly event types",
        "Listing Calendly event types failed",
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("\nUser: {} ({})", response.user.name, response.user.uri);
    for event_type in response
        .event_types
        .iter()
        .filter(|et| args.all || et.active)
    {
        println!("\n  {}{}", event_type.name, if event_type.active { "" } else { " (inactive)" });
        println!("    eventUri:       {}", event_type.uri);
        if let Some(url) = &event_type.scheduling_url {
            println!("    scheduling_url: {}", url);
        }
    }
    Ok(())
}
