//! Feedlens API Server
//!
//! Accepts customer feedback in any language, asks Gemini to detect the
//! language, translate it to English and classify its sentiment, stores the
//! result in SQLite, and serves filtered listings and sentiment statistics.
//!
//! Required environment (a `.env` file in the working directory is honored):
//! - `GEMINI_API_KEY`
//! - `DATABASE_URL` (`sqlite://path/to/feedback.db`)

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use feedlens_core::{Config, Gateway, GeminiClient, Storage};
use feedlens_server::api::{self, AppState};
use feedlens_server::logging;

/// Feedlens - multilingual feedback analysis API
#[derive(Parser)]
#[command(name = "feedlens-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP API for multilingual customer feedback analysis")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments first (before logging init, so --help/--version work cleanly)
    let args = Args::parse();

    logging::init(args.log_json);

    info!("Feedlens server v{} starting...", env!("CARGO_PKG_VERSION"));

    // Both the model credential and the database are mandatory
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let storage = match Storage::open(&config.database.url) {
        Ok(s) => {
            info!(path = %s.path().display(), "Storage initialized successfully");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    let model = match GeminiClient::new(config.gemini) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize Gemini client: {}", e);
            std::process::exit(1);
        }
    };
    let gateway = Gateway::new(Arc::new(model));
    info!(model = gateway.model_name(), "Gateway ready");

    let addr = SocketAddr::new(args.host, args.port);
    if let Err(e) = api::serve(AppState::new(storage, gateway), addr).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
