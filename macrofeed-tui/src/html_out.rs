use std::path::PathBuf;

use tokio::sync::watch;
use tracing::{debug, error, info};

use macrofeed_core::render::render_page;
use macrofeed_core::view::DashboardView;

/// Rewrites the HTML dashboard every time the controller publishes a view.
/// Ends when the controller (the sender) goes away.
pub fn spawn_html_writer(
    path: PathBuf,
    mut views: watch::Receiver<DashboardView>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Writing dashboard HTML to {}", path.display());
        loop {
            let page = render_page(&views.borrow_and_update());
            match tokio::fs::write(&path, page).await {
                Ok(()) => debug!("Dashboard written to {}", path.display()),
                Err(e) => error!("Could not write {}: {}", path.display(), e),
            }
            if views.changed().await.is_err() {
                break;
            }
        }
    })
}
