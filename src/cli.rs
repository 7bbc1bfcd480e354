use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::store::endpoint::DEFAULT_ENDPOINT;

pub const DEFAULT_OUTPUT_PATH: &str = "tienda.html";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file. You can set the endpoint and the output file in JSON format.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// URL of the spreadsheet script that serves inventory and takes orders.
    /// Overrides the value from the configuration file.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the inventory and write the storefront page.
    Render {
        /// File the HTML page is written to.
        #[arg(long, value_name = "FILE")]
        output_path: Option<String>,
    },
    /// Load the inventory and print the menu.
    Menu,
    /// Place an order through the order form and send it to the store.
    Order {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Product id as listed by `menu`.
        #[arg(long)]
        product: u32,
        #[arg(long)]
        quantity: String,
        /// Special instructions.
        #[arg(long)]
        note: Option<String>,
        /// File the confirmation page is written to.
        #[arg(long, value_name = "FILE")]
        output_path: Option<String>,
    },
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            output_path: default_output_path(),
        }
    }
}

impl Config {
    /// Parses the endpoint, accepting only http(s) URLs.
    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => anyhow::bail!("Invalid endpoint URL: unsupported scheme {other}"),
        }
    }
}

/// Loads the configuration from the CLI arguments or a config file.
///
/// If `--config` is given, the JSON file is read first; missing keys fall back to
/// the built-in defaults. `--endpoint` and a subcommand's `--output-path` then
/// override whatever the file says.
///
/// # Errors
///
/// This function will return an `Err` if:
/// - The config file cannot be read or parsed.
/// - The resulting endpoint is not an http(s) URL.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        let config_content =
            fs::read_to_string(config_path).context("Could not read config file")?;
        serde_json::from_str(&config_content).context("Could not parse config file")?
    } else {
        Config::default()
    };

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    match &cli.command {
        Command::Render {
            output_path: Some(output),
        }
        | Command::Order {
            output_path: Some(output),
            ..
        } => config.output_path = output.clone(),
        _ => {}
    }

    config.endpoint_url()?;
    Ok(config)
}
