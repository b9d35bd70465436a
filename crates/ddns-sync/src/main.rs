// # ddns-sync - one-shot AAAA record synchronizer
//
// This binary is a THIN integration layer: all reconciliation logic lives in
// ddns-core. It is responsible for:
// 1. Parsing the command line
// 2. Initializing logging
// 3. Loading and validating the configuration file
// 4. Running a single discovery + reconciliation pass, then exiting
//
// It does not loop, daemonize or retry. Run it from a scheduler (cron, a
// systemd timer) to keep the record converged.
//
// ## Configuration
//
// A JSON file (default `secrets.json` in the working directory):
//
// ```json
// {
//   "HOSTNAME": "server.example.com",
//   "APIKEY": "<cloudflare api token>",
//   "CLOUDFLARE_ZONE_ID": "<zone id>",
//   "IPv6CheckURL": "https://v6.ipinfo.io/ip"
// }
// ```
//
// ### Logging
// - `--verbose`: debug output
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// ddns-sync /etc/ddns/secrets.json
// ```

use anyhow::Result;
use clap::Parser;
use ddns_core::{DEFAULT_CONFIG_PATH, ReconcileReport, SyncConfig};
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Record converged
/// - 1: Configuration or startup error
/// - 2: Runtime error (discovery or registry failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// The record converged (including "nothing to do")
    Converged = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Discovery or registry failure
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep one Cloudflare AAAA record in sync with this host's public IPv6 address
#[derive(Debug, Parser)]
#[command(name = "ddns-sync", version, about)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Pick the log level: `--verbose` wins, then `DDNS_LOG_LEVEL`, then info
fn resolve_log_level(verbose: bool, env_level: Option<&str>) -> Result<Level> {
    if verbose {
        return Ok(Level::DEBUG);
    }

    match env_level.map(str::to_lowercase).as_deref() {
        None | Some("") | Some("info") => Ok(Level::INFO),
        Some("trace") => Ok(Level::TRACE),
        Some("debug") => Ok(Level::DEBUG),
        Some("warn") => Ok(Level::WARN),
        Some("error") => Ok(Level::ERROR),
        Some(other) => anyhow::bail!(
            "DDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            other
        ),
    }
}

/// Classify a failed run into an exit code
fn exit_code_for(err: &anyhow::Error) -> DdnsExitCode {
    match err.downcast_ref::<ddns_core::Error>() {
        Some(ddns_core::Error::Config(_)) => DdnsExitCode::ConfigError,
        _ => DdnsExitCode::RuntimeError,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_level = std::env::var("DDNS_LOG_LEVEL").ok();
    let log_level = match resolve_log_level(cli.verbose, env_level.as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!(
        "Synchronizing AAAA record for {} (config: {})",
        config.hostname,
        cli.config.display()
    );

    // One sequential pass; a single-threaded runtime is all it needs
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run(&config)) {
        Ok(report) => {
            info!(
                "Done: record {} for {} ({} change(s))",
                report.record_id(),
                config.hostname,
                report.mutation_count()
            );
            DdnsExitCode::Converged.into()
        }
        Err(e) => {
            error!("Synchronization failed: {:#}", e);
            exit_code_for(&e).into()
        }
    }
}

/// Load and validate the configuration file
fn load_config(path: &std::path::Path) -> Result<SyncConfig> {
    let config = SyncConfig::from_file(path)?;
    config.validate()?;
    Ok(config)
}

/// Build the collaborators from config and run one pass
async fn run(config: &SyncConfig) -> Result<ReconcileReport> {
    let source = HttpIpSource::new(config.ip_check_url())?;
    let provider = CloudflareProvider::new(config.api_token.clone())?;

    ddns_core::sync_once(&source, &provider, config)
        .await
        .map_err(|e| {
            let step = e.step();
            anyhow::Error::new(e).context(format!("{step} step failed"))
        })
}
