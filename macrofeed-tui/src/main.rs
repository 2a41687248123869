// Console dashboard for the macro update feed
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use macrofeed_core::tasks::spawn_auto_refresh_task;
use macrofeed_core::{DashboardConfig, Notifier, RefreshController, RestFeedApi};
use macrofeed_tui::{Console, ConsoleReply, ConsoleSink, spawn_html_writer};

#[derive(Parser, Debug, Clone)]
#[command(name = "macrofeed")]
#[command(author, version, about = "Live dashboard for macro updates")]
struct Args {
    /// Base URL of the update API (overrides MACROFEED_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Auto-refresh period in milliseconds (overrides MACROFEED_REFRESH_MS)
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Also keep an HTML rendering of the dashboard at this path
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Start with auto-refresh turned off
    #[arg(long, default_value_t = false)]
    no_auto_refresh: bool,
}

fn init_tracing() {
    // stdout belongs to the console; logs go to stderr and default to warn
    let filter = EnvFilter::from_default_env()
        .add_directive("macrofeed_core=warn".parse().unwrap_or_default())
        .add_directive("macrofeed_tui=warn".parse().unwrap_or_default());
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = DashboardConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(ms) = args.refresh_ms {
        config.refresh_interval = Duration::from_millis(ms);
    }
    if args.html_out.is_some() {
        config.html_out = args.html_out;
    }
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e).context("invalid dashboard configuration");
    }

    println!("Macro Updates Dashboard");
    println!("API: {}", config.api_url);

    let api = Arc::new(RestFeedApi::new(&config.api_url).context("could not build API client")?);
    let notifier = Arc::new(Notifier::new(config.toast, Arc::new(ConsoleSink)));
    let controller = Arc::new(RefreshController::new(api, notifier));

    let html_task = config
        .html_out
        .clone()
        .map(|path| spawn_html_writer(path, controller.subscribe()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let timer = spawn_auto_refresh_task(controller.clone(), config.refresh_interval, shutdown_rx);

    if args.no_auto_refresh {
        controller.init_auto_refresh(false).await;
    }
    if let Err(e) = controller.load_macros().await {
        info!("Starting without a macro list: {}", e);
    }

    let console = Console::new(controller.clone());
    println!("\nType 'help' for available commands.\n");

    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", console.prompt_string());
        stdout().flush()?;

        let line = match reader.next_line().await? {
            Some(line) => line,
            None => break, // EOF
        };

        match console.handle_line(&line).await {
            ConsoleReply::Output(msg) if msg.is_empty() => {}
            ConsoleReply::Output(msg) => println!("{}", msg),
            ConsoleReply::Quit => break,
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = timer.await;
    drop(console);
    drop(controller);
    if let Some(task) = html_task {
        let _ = task.await;
    }
    println!("Goodbye!");
    Ok(())
}
