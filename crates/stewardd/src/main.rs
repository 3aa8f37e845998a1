//! stewardd — the steward control-plane daemon.
//!
//! Serves the management API for one (cluster, region): catalog creates,
//! the initialization pipeline, and the operator task plumbing. State
//! lives in a redb file under the data directory; `--in-memory` swaps in
//! an ephemeral store for local experiments.
//!
//! # Usage
//!
//! ```text
//! stewardd --cluster prod --region us-east-1 --data-dir /var/lib/steward
//! stewardd --in-memory --port 27040
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use steward_manage::CatalogService;
use steward_platform::{MemoryDnsZone, MemoryPlatform, ServerInfo};
use steward_state::MetaStore;

#[derive(Parser)]
#[command(name = "stewardd", about = "steward control-plane daemon")]
struct Cli {
    /// Port the management API listens on.
    #[arg(long, default_value = "27040")]
    port: u16,

    /// Cluster this control plane serves.
    #[arg(long, default_value = "default")]
    cluster: String,

    /// Region this control plane serves.
    #[arg(long, default_value = "local-1")]
    region: String,

    /// VPC the cluster lives in.
    #[arg(long, default_value = "vpc-local")]
    vpc_id: String,

    /// Availability zones replicas are spread across.
    #[arg(long, default_value = "local-1a,local-1b,local-1c", value_delimiter = ',')]
    availability_zones: Vec<String>,

    /// Data directory for persistent state.
    #[arg(long, default_value = "/var/lib/steward")]
    data_dir: PathBuf,

    /// Use an ephemeral in-memory store instead of the data directory.
    #[arg(long)]
    in_memory: bool,

    /// How often init tasks re-check service status, in seconds.
    #[arg(long, default_value = "3")]
    task_poll_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stewardd=debug,steward=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    info!(
        cluster = %cli.cluster,
        region = %cli.region,
        "steward control plane starting"
    );

    // ── State store ────────────────────────────────────────────────
    let store = if cli.in_memory {
        info!("using in-memory state store");
        MetaStore::open_in_memory()?
    } else {
        std::fs::create_dir_all(&cli.data_dir)?;
        let db_path = cli.data_dir.join("steward.redb");
        let store = MetaStore::open(&db_path)?;
        info!(path = ?db_path, "state store opened");
        store
    };

    // ── Collaborators ──────────────────────────────────────────────
    // Standalone mode runs against the in-process platform and DNS zone;
    // real drivers plug in at this seam.
    let platform = Arc::new(MemoryPlatform::new());
    let dns = Arc::new(MemoryDnsZone::new());
    let server_info = ServerInfo::new(&cli.region, &cli.vpc_id, cli.availability_zones.clone());

    let manage_url = format!("http://127.0.0.1:{}", cli.port);
    let svc = Arc::new(
        CatalogService::new(
            &cli.cluster,
            &manage_url,
            &server_info,
            store,
            dns,
            platform,
        )
        .with_task_poll_interval(Duration::from_secs(cli.task_poll_secs)),
    );
    info!("catalog service initialized");

    // ── API server ─────────────────────────────────────────────────
    let router = steward_api::build_router(Arc::clone(&svc));
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, router).with_graceful_shutdown(async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
    });
    server.await?;

    // Stop the init tasks; recovery is client-driven on next start.
    svc.runner().stop_all().await;

    info!("steward control plane stopped");
    Ok(())
}
