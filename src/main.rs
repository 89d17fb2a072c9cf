use clap::Parser;
use openmapit::config::{Config, ConfigError};
use openmapit::coords::{format_coords, parse_coordinates_with_format};
use openmapit::{locate, GeocodingResolver, Location};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// OpenMapIt: resolve selected text to map coordinates
///
/// Recognizes explicit coordinates locally and falls back to geocoding
/// (Nominatim, then Photon) for addresses and place names.
///
/// Examples:
///   openmapit "34.0522, -118.2437"
///   openmapit "lat: 40.7128, lon: -74.0060"
///   openmapit "1600 Amphitheatre Parkway, Mountain View"
///   openmapit --parse-only "34.05° S, 118.24° W"
///   openmapit --serve --port 3000
#[derive(Parser)]
#[command(name = "openmapit", version, about, long_about = None)]
struct Cli {
    /// Text to locate: a coordinate pair, an address or a place name.
    #[arg(index = 1, allow_hyphen_values = true)]
    text: Option<String>,

    /// Only try to recognize a coordinate pair; never touch the network.
    #[arg(long)]
    parse_only: bool,

    /// Run the HTTP API instead of resolving a single text.
    #[arg(long)]
    serve: bool,

    /// Listen host for --serve.
    #[arg(long)]
    host: Option<String>,

    /// Listen port for --serve.
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Config file (default: ~/.openmapit/config.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the primary (Nominatim) base URL.
    #[arg(long)]
    nominatim_url: Option<String>,

    /// Override the fallback (Photon) base URL.
    #[arg(long)]
    photon_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("openmapit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        let resolver = GeocodingResolver::from_config(&config);
        let host = &config.server_host;
        if let Err(e) = openmapit::server::start(host, config.server_port, resolver).await {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let Some(text) = cli.text.as_deref().filter(|t| !t.trim().is_empty()) else {
        eprintln!("Error: No text given.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  openmapit \"34.0522, -118.2437\"");
        eprintln!("  openmapit \"1600 Amphitheatre Parkway, Mountain View\"");
        eprintln!("  openmapit --serve");
        std::process::exit(1);
    };

    // ── Parse-only mode ─────────────────────────────────────────

    if cli.parse_only {
        match parse_coordinates_with_format(text) {
            Some((format, coord)) => {
                eprintln!("  \u{1F4D0} {} ({:?})", coord, format);
                print_json(&coord);
            }
            None => {
                eprintln!("Error: No coordinate pair recognized in '{}'", text.trim());
                std::process::exit(1);
            }
        }
        return;
    }

    // ── Locate ──────────────────────────────────────────────────

    let resolver = GeocodingResolver::from_config(&config);
    match locate(&resolver, text).await {
        Ok(location) => {
            print_banner(&location);
            print_json(&location);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if let Some(url) = &cli.nominatim_url {
        config.nominatim_url = url.clone();
    }
    if let Some(url) = &cli.photon_url {
        config.photon_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    if let Some(host) = &cli.host {
        config.server_host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    config.validate()?;
    Ok(config)
}

fn print_banner(location: &Location) {
    eprintln!("  \u{1F4CD} {} [{:?}]", location.text, location.kind);
    eprintln!("  \u{1F4D0} {}", format_coords(location.lat, location.lon));
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: cannot serialize output: {}", e);
            std::process::exit(1);
        }
    }
}
