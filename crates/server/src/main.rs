use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use memstore_common::{DEFAULT_HOST, DEFAULT_PORT};
use memstore_server::{AppState, serve};
use memstore_storage::{Store, StoreConfig};

#[derive(Parser, Debug)]
#[command(name = "memstore-server", about = "memstore: in-memory key-value store")]
struct Args {
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Intervalo da varredura de chaves expiradas, em milissegundos
    #[arg(long, default_value_t = 1_000)]
    sweep_interval_ms: u64,
    /// Deadline de cada operação no store, em milissegundos
    #[arg(long, default_value_t = 5_000)]
    request_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memstore_server=info,memstore_storage=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let store = Store::with_config(
        StoreConfig::default().with_sweep_interval(Duration::from_millis(args.sweep_interval_ms)),
    );
    let state = AppState::new(store.clone())
        .with_request_timeout(Duration::from_millis(args.request_timeout_ms));

    let listener = TcpListener::bind(&addr).await?;

    serve(listener, state, async {
        let _ = signal::ctrl_c().await;
        info!("shutdown signal recebido");
    })
    .await?;

    store.stop_expiry_worker();
    info!("servidor encerrado");

    Ok(())
}
