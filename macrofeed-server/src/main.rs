use std::net::SocketAddr;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use macrofeed_server::{ServerConfig, start_server};

#[derive(Parser, Debug, Clone)]
#[command(name = "macrofeed-server")]
#[command(author, version, about = "Macro update backend: webhook receiver + dashboard API")]
struct Args {
    /// Address to which the server will bind
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Per-macro history cap
    #[arg(long, default_value_t = macrofeed_server::config::MAX_UPDATES)]
    max_updates: usize,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("macrofeed_server=info".parse().unwrap_or_default())
        .add_directive("tower_http=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
    let _ = tracing_log::LogTracer::init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = ServerConfig::from_env(args.bind);
    config.max_updates = args.max_updates;
    if config.macros.is_empty() {
        info!("No MACRO_<NAME>=<id> entries found; the dashboard will show an empty selector.");
    }

    let (_addr, shutdown) = match start_server(config).await {
        Ok(v) => v,
        Err(e) => {
            error!("Could not start server: {}", e);
            return Err(e.into());
        }
    };

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received, shutting down.");
    let _ = shutdown.send(());
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    Ok(())
}
