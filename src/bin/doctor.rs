//! Deployment diagnostics binary.
//!
//! Verifies a freshly deployed tier in three read-only passes: waits for the
//! proxy to become ready, aggregates per-target health, then samples load
//! distribution through the shared entry point. Nothing here mutates the
//! deployment; aborting on a bad result is left to the operator or the
//! calling script.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use webtier_demo::health::{HealthAggregator, InstanceTarget, TargetStatus};
use webtier_demo::probe::{Readiness, ReadinessProber};
use webtier_demo::sampler::{LoadSampler, SampleOutcome};
use webtier_demo::store::HttpCounterStore;

const SAMPLE_DELAY: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const READINESS_INTERVAL: Duration = Duration::from_secs(2);
const READINESS_MAX_ATTEMPTS: u32 = 30;
const DEFAULT_SAMPLES: u32 = 10;

#[derive(Debug)]
struct DoctorArgs {
    proxy_url: String,
    store_url: String,
    instances: Vec<InstanceTarget>,
    samples: u32,
}

fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str> {
    args.get(i + 1)
        .map(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing value for {}", args[i]))
}

fn parse_args(args: &[String]) -> Result<DoctorArgs> {
    let mut proxy_url: Option<String> = None;
    let mut store_url: Option<String> = None;
    let mut instances: Vec<InstanceTarget> = vec![];
    let mut samples = DEFAULT_SAMPLES;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--proxy" => {
                proxy_url = Some(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--store" => {
                store_url = Some(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--instance" => {
                let (id, url) = flag_value(args, i)?
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("--instance expects <id>=<url>"))?;
                instances.push(InstanceTarget {
                    instance_id: id.to_string(),
                    base_url: url.to_string(),
                });
                i += 2;
            }
            "--samples" => {
                samples = flag_value(args, i)?.parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    Ok(DoctorArgs {
        proxy_url: proxy_url.ok_or_else(|| anyhow::anyhow!("--proxy is required"))?,
        store_url: store_url.ok_or_else(|| anyhow::anyhow!("--store is required"))?,
        instances,
        samples,
    })
}

fn usage(program: &str) {
    eprintln!(
        "Usage: {} --proxy <url> --store <url> --instance <id>=<url>... [--samples <n>]",
        program
    );
    eprintln!(
        "Example: {} --proxy http://127.0.0.1:8080 --store http://127.0.0.1:6379 \
         --instance 1=http://127.0.0.1:3001 --instance 2=http://127.0.0.1:3002",
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

    // 1. Gate everything on proxy readiness:
    let prober = ReadinessProber::new(READINESS_MAX_ATTEMPTS, READINESS_INTERVAL, REQUEST_TIMEOUT);
    let report = prober.wait_ready(&parsed.proxy_url).await;

    match report.readiness {
        Readiness::Ready { attempt } => {
            tracing::info!("Proxy ready after {} attempt(s)", attempt);
        }
        Readiness::Exhausted { attempts } => {
            tracing::error!(
                "Proxy not ready after {} attempts, aborting diagnostics",
                attempts
            );
            std::process::exit(1);
        }
    }

    // 2. Per-target health, each probe independent:
    let store = Arc::new(HttpCounterStore::new(&parsed.store_url));
    let aggregator = HealthAggregator::new(&parsed.proxy_url, parsed.instances, store);
    let summary = aggregator.run().await;

    if summary.all_healthy() {
        tracing::info!("All {} targets healthy", summary.reports.len());
    } else {
        for report in summary
            .reports
            .iter()
            .filter(|r| r.status != TargetStatus::Healthy)
        {
            tracing::warn!(
                "{:?} target {} is {:?} ({})",
                report.kind,
                report.name,
                report.status,
                report.detail
            );
        }
    }

    // 3. Load distribution through the shared entry point:
    let sampler = LoadSampler::new(parsed.samples, SAMPLE_DELAY, REQUEST_TIMEOUT);
    let run = sampler.run(&parsed.proxy_url).await;

    for obs in &run.observations {
        match &obs.outcome {
            SampleOutcome::Served { instance_id } => {
                tracing::info!("  #{:<2} -> instance {}", obs.index, instance_id);
            }
            SampleOutcome::Failed { reason } => {
                tracing::warn!("  #{:<2} -> failed: {}", obs.index, reason);
            }
        }
    }

    let distinct = run.distinct_instances();
    tracing::info!(
        "{}/{} samples answered, {} distinct instance(s): {:?}",
        run.successes(),
        run.observations.len(),
        distinct.len(),
        distinct
    );

    if run.is_skewed() {
        tracing::warn!("Distribution anomaly: every sample was served by one instance");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("webtier-doctor".to_string())
            .chain(list.iter().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_args_full_set() {
        let parsed = parse_args(&args(&[
            "--proxy",
            "http://127.0.0.1:8080",
            "--store",
            "http://127.0.0.1:6379",
            "--instance",
            "1=http://127.0.0.1:3001",
            "--instance",
            "2=http://127.0.0.1:3002",
            "--samples",
            "5",
        ]))
        .unwrap();

        assert_eq!(parsed.proxy_url, "http://127.0.0.1:8080");
        assert_eq!(parsed.store_url, "http://127.0.0.1:6379");
        assert_eq!(parsed.samples, 5);
        assert_eq!(parsed.instances.len(), 2);
        assert_eq!(parsed.instances[0].instance_id, "1");
        assert_eq!(parsed.instances[0].base_url, "http://127.0.0.1:3001");
        assert_eq!(parsed.instances[1].instance_id, "2");
    }

    #[test]
    fn test_parse_args_trailing_flag_is_an_error_not_a_panic() {
        assert!(parse_args(&args(&["--store", "http://x", "--proxy"])).is_err());
        assert!(parse_args(&args(&["--instance"])).is_err());
    }

    #[test]
    fn test_parse_args_rejects_malformed_instance_pair() {
        assert!(parse_args(&args(&[
            "--proxy",
            "http://x",
            "--store",
            "http://y",
            "--instance",
            "no-url-here"
        ]))
        .is_err());
    }

    #[test]
    fn test_parse_args_requires_proxy_and_store() {
        assert!(parse_args(&args(&["--proxy", "http://x"])).is_err());
        assert!(parse_args(&args(&["--store", "http://y"])).is_err());
    }
}
