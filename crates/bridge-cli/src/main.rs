mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bridge",
    about = "Action bridge — resolve UI actions, gate them, and proxy them to the backend",
    version,
    propagate_version = true
)]
struct Cli {
    /// Optional YAML file overriding keyword, policy and route tables
    #[arg(long, global = true, env = "BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP router (POST /api/bridge)
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Upstream backend base address
        #[arg(long, env = "BRIDGE_BACKEND_URL")]
        backend_url: Option<String>,
    },

    /// Send one action through a running router
    Send {
        /// Action id, e.g. gmail.send
        action: String,

        /// JSON payload for the upstream call
        #[arg(long)]
        payload: Option<String>,

        /// HTTP method for the upstream call
        #[arg(long, default_value = "POST")]
        method: String,

        /// Upstream query parameter, repeatable (key=value)
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,

        /// Router base address
        #[arg(long, env = "BRIDGE_ENDPOINT", default_value = bridge_client::DEFAULT_ENDPOINT)]
        endpoint: String,
    },

    /// Show the upstream path an action maps to
    Route {
        /// Action id
        action: String,
    },

    /// Resolve a button-like element and show the gate's verdict
    Resolve {
        /// Visible text of the clicked element
        #[arg(long, default_value = "")]
        text: String,

        /// Explicit data-action override
        #[arg(long)]
        action: Option<String>,

        /// Place the element inside a data-ignore-actions="true" zone
        #[arg(long)]
        ignored: bool,
    },

    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { port, backend_url } => cmd::serve::run(config, port, backend_url),
        Commands::Send {
            action,
            payload,
            method,
            query,
            endpoint,
        } => cmd::send::run(&endpoint, &action, payload.as_deref(), &method, &query, cli.json),
        Commands::Route { action } => cmd::route::run(config, &action, cli.json),
        Commands::Resolve {
            text,
            action,
            ignored,
        } => cmd::resolve::run(config, &text, action.as_deref(), ignored, cli.json),
        Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
