//! Metacoin ledger binary
//!
//! Reads one JSON `TransferRequest` per line from stdin and writes one JSON
//! line per request to stdout: the `Transfer` event, or `{"error": ...}`.

use anyhow::Context;
use metacoin_core::{spawn_ledger_actor, Config, Ledger, Metacoin, Metrics, TransferRequest};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, stdout carries the results)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::from_env().context("loading config from environment")?,
    };

    tracing::info!(service = %config.service_name, "Starting Metacoin ledger");

    // Deploy
    let mut ledger = Ledger::create(config.genesis.owner, config.genesis.initial_supply.clone());
    if !config.event_log.enabled {
        ledger = ledger.without_event_log();
    }
    let metrics = Metrics::new().context("registering metrics")?;
    let handle = spawn_ledger_actor(Metacoin::from_ledger(ledger), &config.actor, metrics.clone());

    // Raw byte lines: a line that is not UTF-8 is one bad request, not a dead stdin
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_segment().await? {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let outcome = match serde_json::from_slice::<TransferRequest>(&line) {
            Ok(request) => handle.transfer(request.from, request.call).await,
            Err(e) => Err(e.into()),
        };

        let output = match outcome {
            Ok(event) => serde_json::to_string(&event)?,
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    stdout.flush().await?;

    let snapshot = handle.snapshot().await?;
    tracing::info!(
        accounts = snapshot.accounts(),
        events = snapshot.events().len(),
        conserved = snapshot.check_conservation(),
        "Input exhausted"
    );
    eprint!("{}", metrics.gather_text()?);

    handle.shutdown().await?;
    tracing::info!("Shutting down Metacoin ledger");
    Ok(())
}
