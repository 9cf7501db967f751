use metrics_exporter_prometheus::PrometheusBuilder;
use owners_loadgen::{Config, LoadTest, LoadgenError, OwnersClient, Profile};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the Prometheus recorder with its own HTTP listener
fn setup_prometheus_metrics(addr: SocketAddr) -> Result<(), LoadgenError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| LoadgenError::MetricsExporter(e.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "owners_loadgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    config.validate()?;
    info!(
        "Loaded configuration: host={}, users={}, spawn_rate={}/s, run_time={:?}",
        config.host, config.users, config.spawn_rate, config.run_time
    );
    if let Some(seed) = config.seed {
        info!("Seeded run: base seed {}", seed);
    }

    // Must be installed before any request is recorded
    if let Some(addr) = config.metrics_addr {
        setup_prometheus_metrics(addr)?;
        info!("Prometheus metrics available on http://{}/metrics", addr);
    }

    let client = OwnersClient::new(&config.host, config.request_timeout)?;
    let json_report = config.json_report;

    let summary = LoadTest::new(config, Profile::owner_behavior(), Arc::new(client))?
        .run()
        .await?;

    println!("{}", summary.report());
    if json_report {
        println!("JSON: {}", summary.to_json());
    }

    Ok(())
}
