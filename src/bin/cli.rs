//! CLI for sending one command to a cluster node

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use leaderkv::{ClientConfig, Dispatch, Dispatcher, Outcome, Success, TcpTransport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "leaderkv")]
#[command(about = "Send a command to a replicated key-value cluster")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-call timeout, e.g. 500ms or 3s
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Maximum number of leader redirects to follow
    #[arg(long)]
    max_redirects: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Node address, e.g. localhost:8080
    node: String,

    /// Command: `GET <key>` reads, anything else is sent to the leader
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    leaderkv::common::parse_duration(s).map_err(|e| e.to_string())
}

fn build_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(timeout) = cli.timeout {
        config.call_timeout_ms = u64::try_from(timeout.as_millis()).context("timeout too large")?;
    }
    if let Some(depth) = cli.max_redirects {
        config.max_redirect_depth = depth;
    }
    if cli.verbose {
        config.log_level = "debug".to_string();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn report(dispatch: &Dispatch) {
    for leader in dispatch.redirects() {
        println!("Redirected to leader at {}", leader);
    }

    match &dispatch.outcome {
        Outcome::Succeeded(Success::Applied {
            result,
            error: None,
        }) => println!("OK: {}", result),
        Outcome::Succeeded(Success::Applied {
            result,
            error: Some(error),
        }) => println!("OK: {} (node reported: {})", result, error),
        Outcome::Succeeded(Success::Value { key, value }) => println!("{} = {}", key, value),
        Outcome::NotFound { key } => println!("Key {} not found", key),
        Outcome::Failed(err) => eprintln!("ERROR [{}]: {}", err.kind(), err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = cli.command.join(" ");
    let dispatcher = Dispatcher::new(TcpTransport::new(config.call_timeout()), &config);
    let dispatch = dispatcher.dispatch(&cli.node, &command).await;
    report(&dispatch);

    if dispatch.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
