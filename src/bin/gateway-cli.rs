//! Operator CLI for a running gateway.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};

use api_gateway::routing::RouteDescriptor;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push a route file to the gateway's registration endpoint
    Register {
        /// TOML file with [[routes]] entries (method, path, targetUrl, public)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Probe a path through the gateway and print the response
    Check {
        /// Path to request, e.g. /products
        path: String,
    },
}

/// Route file layout for `register`.
#[derive(Deserialize)]
struct RouteFile {
    routes: Vec<RouteDescriptor>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Register { file } => {
            let content = std::fs::read_to_string(&file)?;
            let route_file: RouteFile = toml::from_str(&content)?;

            let res = client
                .post(format!("{}/register", cli.url))
                .json(&json!({ "routes": route_file.routes }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Check { path } => {
            let res = client.get(format!("{}{}", cli.url, path)).send().await?;
            let status = res.status();
            let body = res.text().await?;
            println!("{} {}", status.as_u16(), body);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let body: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
