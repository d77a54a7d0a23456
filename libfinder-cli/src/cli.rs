use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use libfinder_core::{Config, LibraryFinder, LibraryResult, SearchResponse};
use std::sync::Arc;

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "libfinder", version, about = "Find libraries by postal code or city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Google API key and request timeout.
    Configure,

    /// Search for libraries near a postal code or in a city.
    Search {
        /// Postal code (e.g. "90210") or city name (e.g. "New York").
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print the JSON response instead of a list.
        #[arg(long)]
        json: bool,
    },

    /// Serve the search endpoint over HTTP.
    Serve {
        /// Address to bind; defaults to the configured host.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind; defaults to the configured port.
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { query, json } => search(&query.join(" "), json).await,
            Command::Serve { host, port } => serve(host, port).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Google Maps API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let timeout = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read request timeout")?;

    config.set_api_key(api_key.trim().to_string());
    config.request_timeout_secs = timeout;
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(query: &str, json: bool) -> Result<()> {
    let config = Config::load_with_env()?;
    let finder = LibraryFinder::from_config(&config)?;

    let response = finder.search(query).await.context("Library search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    match response {
        SearchResponse::Ok(results) => {
            if !json {
                print!("{}", render_results(&results));
            }
            Ok(())
        }
        SearchResponse::Error(message) => bail!(message),
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load_with_env()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let finder = Arc::new(LibraryFinder::from_config(&config)?);
    server::run(finder, &config.server).await
}

/// Numbered, human-readable listing of search results.
fn render_results(results: &[LibraryResult]) -> String {
    let mut out = String::new();

    for (i, result) in results.iter().enumerate() {
        let coords = format!("({:.6}, {:.6})", result.lat, result.lng);
        let last_line = match locality(result) {
            Some(locality) => format!("{locality} {coords}"),
            None => coords,
        };

        out.push_str(&format!(
            "{}. {}\n   {}\n   {}\n",
            i + 1,
            result.name,
            result.formatted_address,
            last_line
        ));
    }

    out
}

/// "City, ST 12345" from whichever parts are known.
fn locality(result: &LibraryResult) -> Option<String> {
    let region = [result.state.as_deref(), result.postal_code.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let parts: Vec<&str> = result
        .city
        .as_deref()
        .into_iter()
        .chain((!region.is_empty()).then_some(region.as_str()))
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}
