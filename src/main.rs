use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use webtier_demo::accounting::handlers::router;
use webtier_demo::accounting::service::AccountingService;
use webtier_demo::store::{CounterStore, HttpCounterStore, MemoryCounterStore};

#[derive(Debug)]
struct InstanceArgs {
    bind_addr: SocketAddr,
    instance_id: String,
    store_url: Option<String>,
    peers: Vec<String>,
}

fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str> {
    args.get(i + 1)
        .map(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing value for {}", args[i]))
}

fn parse_args(args: &[String]) -> Result<InstanceArgs> {
    let mut bind_addr: Option<SocketAddr> = None;
    let mut instance_id: Option<String> = None;
    let mut store_url: Option<String> = None;
    let mut peers: Vec<String> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(flag_value(args, i)?.parse()?);
                i += 2;
            }
            "--instance" => {
                instance_id = Some(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--store" => {
                store_url = Some(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--peer" => {
                peers.push(flag_value(args, i)?.to_string());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    Ok(InstanceArgs {
        bind_addr: bind_addr.ok_or_else(|| anyhow::anyhow!("--bind is required"))?,
        instance_id: instance_id.ok_or_else(|| anyhow::anyhow!("--instance is required"))?,
        store_url,
        peers,
    })
}

fn usage(program: &str) {
    eprintln!(
        "Usage: {} --bind <addr:port> --instance <id> [--store <url>] [--peer <id>]...",
        program
    );
    eprintln!(
        "Example: {} --bind 127.0.0.1:3001 --instance 1 --store http://127.0.0.1:6379 --peer 2",
        program
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            usage(&args[0]);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting instance {} on {}",
        parsed.instance_id,
        parsed.bind_addr
    );

    // 1. Counter store: remote KV service, or in-memory for a single-process demo.
    let store: Arc<dyn CounterStore> = match &parsed.store_url {
        Some(url) => {
            let store = Arc::new(HttpCounterStore::new(url));
            match store.ping().await {
                Ok(()) => tracing::info!("Counter store reachable at {}", url),
                Err(e) => tracing::warn!(
                    "Counter store at {} not reachable yet, serving degraded until it is: {}",
                    url,
                    e
                ),
            }
            store
        }
        None => {
            tracing::warn!("No --store given, counters are process-local only");
            Arc::new(MemoryCounterStore::new())
        }
    };

    // 2. Accounting service, one per process:
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
    let service = AccountingService::new(&parsed.instance_id, parsed.peers, &hostname, store);

    tracing::info!("Session ID: {}", service.session_id);

    // 3. HTTP surface:
    let app = router(service);

    tracing::info!("HTTP server listening on {}", parsed.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(parsed.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Store handle is released here on every exit path, signal or not.
    tracing::info!("Instance {} shut down", parsed.instance_id);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("webtier-instance".to_string())
            .chain(list.iter().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_args_full_set() {
        let parsed = parse_args(&args(&[
            "--bind",
            "127.0.0.1:3001",
            "--instance",
            "1",
            "--store",
            "http://127.0.0.1:6379",
            "--peer",
            "2",
        ]))
        .unwrap();

        assert_eq!(parsed.bind_addr, "127.0.0.1:3001".parse().unwrap());
        assert_eq!(parsed.instance_id, "1");
        assert_eq!(parsed.store_url.as_deref(), Some("http://127.0.0.1:6379"));
        assert_eq!(parsed.peers, vec!["2".to_string()]);
    }

    #[test]
    fn test_parse_args_trailing_flag_is_an_error_not_a_panic() {
        assert!(parse_args(&args(&["--instance", "1", "--bind"])).is_err());
        assert!(parse_args(&args(&["--peer"])).is_err());
    }

    #[test]
    fn test_parse_args_missing_required_flags() {
        assert!(parse_args(&args(&["--bind", "127.0.0.1:3001"])).is_err());
        assert!(parse_args(&args(&["--instance", "1"])).is_err());
    }
}
