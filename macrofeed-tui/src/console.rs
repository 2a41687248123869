//! Line-oriented dashboard console.
//!
//! Every input line goes through [`Console::handle_line`], which returns the
//! text to print. Destructive commands arm a confirmation; the next line
//! answers it.

use std::sync::Arc;
use std::sync::Mutex;

use colored::Colorize;

use macrofeed_common::models::MacroId;
use macrofeed_core::controller::{ClearOutcome, LoadOutcome, RefreshController};
use macrofeed_core::render::page::placeholder_text;
use macrofeed_core::render::render_text;
use macrofeed_core::view::{DashboardView, FeedView, SelectorView};

const HELP: &str = "\
Commands:
  macros          - list macros (current one marked with *)
  select <macro>  - switch to a macro and load its updates
  refresh         - reload updates for the current macro
  show [id]       - print the feed, or one update by id
  status          - update count and last update time
  auto [on|off]   - toggle or set auto-refresh
  clear           - clear the current macro's updates (asks first)
  clear-all       - clear every macro's updates (asks first)
  health          - check that the server is up
  quit            - exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Clear,
    ClearAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleReply {
    Output(String),
    Quit,
}

pub struct Console {
    controller: Arc<RefreshController>,
    pending: Mutex<Option<Pending>>,
}

impl Console {
    pub fn new(controller: Arc<RefreshController>) -> Self {
        Self {
            controller,
            pending: Mutex::new(None),
        }
    }

    pub fn prompt_string(&self) -> String {
        if self.pending_action().is_some() {
            "(y/n)> ".to_string()
        } else {
            "macrofeed> ".to_string()
        }
    }

    fn pending_action(&self) -> Option<Pending> {
        *self.pending.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_pending(&self, action: Option<Pending>) {
        *self.pending.lock().unwrap_or_else(|p| p.into_inner()) = action;
    }

    pub async fn handle_line(&self, line: &str) -> ConsoleReply {
        let trimmed = line.trim();

        if let Some(action) = self.pending_action() {
            self.set_pending(None);
            if !trimmed.eq_ignore_ascii_case("y") && !trimmed.eq_ignore_ascii_case("yes") {
                return ConsoleReply::Output("Cancelled.".to_string());
            }
            let outcome = match action {
                Pending::Clear => self.controller.clear().await,
                Pending::ClearAll => self.controller.clear_all().await,
            };
            return ConsoleReply::Output(match outcome {
                ClearOutcome::Cleared => "Cleared.".to_string(),
                ClearOutcome::Skipped => "No macro selected.".to_string(),
                ClearOutcome::Failed(e) => format!("Clear failed: {}", e),
            });
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return ConsoleReply::Output(String::new());
        };

        let out = match *cmd {
            "help" => HELP.to_string(),
            "macros" => describe_selector(&self.controller.view().await),
            "select" => match args.first() {
                Some(id) => {
                    let outcome = self.controller.select_macro(MacroId::from(*id)).await;
                    format!("Selected '{}': {}", id, describe_outcome(&outcome))
                }
                None => "Usage: select <macro>".to_string(),
            },
            "refresh" => {
                let outcome = self.controller.manual_refresh().await;
                describe_outcome(&outcome)
            }
            "show" => match args.first() {
                None => describe_feed(&self.controller).await,
                Some(raw) => match raw.parse::<i64>() {
                    Ok(id) => match self.controller.fetch_update(id).await {
                        Ok(update) => render_text(&update),
                        Err(e) => format!("Could not fetch update {}: {}", id, e),
                    },
                    Err(_) => "Usage: show [id]".to_string(),
                },
            },
            "status" => {
                let view = self.controller.view().await;
                format!(
                    "Updates: {} | Last update: {} | Auto-refresh: {}",
                    view.status.count,
                    view.status.last_update,
                    if view.auto_refresh { "on" } else { "off" }
                )
            }
            "auto" => {
                let enabled = match args.first().copied() {
                    Some("on") => {
                        self.controller.set_auto_refresh(true).await;
                        true
                    }
                    Some("off") => {
                        self.controller.set_auto_refresh(false).await;
                        false
                    }
                    None => self.controller.toggle_auto_refresh().await,
                    Some(_) => return ConsoleReply::Output("Usage: auto [on|off]".to_string()),
                };
                format!("Auto-refresh is now {}", if enabled { "on" } else { "off" })
            }
            "clear" => {
                if self.controller.selected().await.is_none() {
                    "No macro selected.".to_string()
                } else {
                    self.set_pending(Some(Pending::Clear));
                    "Are you sure you want to clear all updates? (y/n)".to_string()
                }
            }
            "clear-all" => {
                self.set_pending(Some(Pending::ClearAll));
                "Are you sure you want to clear updates for every macro? (y/n)".to_string()
            }
            "health" => {
                if self.controller.check_health().await {
                    "Server is up.".to_string()
                } else {
                    "Server is not reachable.".to_string()
                }
            }
            "quit" | "exit" => return ConsoleReply::Quit,
            other => format!("Unknown command '{}'. Type 'help' for usage.", other),
        };
        ConsoleReply::Output(out)
    }
}

fn describe_outcome(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Applied(n) => format!("{} updates loaded.", n),
        LoadOutcome::Skipped => "No macro selected.".to_string(),
        LoadOutcome::Discarded => "Selection changed before the response arrived.".to_string(),
        LoadOutcome::Failed(e) => format!("Load failed: {}", e),
    }
}

fn describe_selector(view: &DashboardView) -> String {
    match &view.selector {
        SelectorView::Options { macros, selected } => macros
            .iter()
            .map(|m| {
                if selected.as_ref() == Some(m) {
                    format!("* {}", m.as_str().bold())
                } else {
                    format!("  {}", m)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.placeholder().unwrap_or_default().to_string(),
    }
}

async fn describe_feed(controller: &RefreshController) -> String {
    let view = controller.view().await;
    match &view.feed {
        FeedView::Cards(_) => controller
            .updates()
            .await
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => {
            let (headline, detail) = placeholder_text(other).unwrap_or(("", ""));
            format!("{}\n{}", headline, detail.dimmed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrofeed_core::test_utils::{ScriptedApi, plain_update, recording_notifier};

    async fn console_with(api: ScriptedApi) -> (Console, Arc<RefreshController>) {
        let (notifier, _sink) = recording_notifier();
        let controller = Arc::new(RefreshController::new(Arc::new(api), notifier));
        controller.load_macros().await.unwrap();
        (Console::new(controller.clone()), controller)
    }

    fn output(reply: ConsoleReply) -> String {
        match reply {
            ConsoleReply::Output(s) => s,
            ConsoleReply::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_clear_needs_confirmation() {
        let api = ScriptedApi::new().with_macros(&["build"]);
        api.push_updates("build", vec![plain_update("bot", "hi", "2024-05-29T16:26:40Z")]);
        let (console, controller) = console_with(api).await;
        assert_eq!(controller.updates().await.len(), 1);

        let ask = output(console.handle_line("clear").await);
        assert!(ask.contains("(y/n)"));
        assert_eq!(console.prompt_string(), "(y/n)> ");
        assert_eq!(output(console.handle_line("n").await), "Cancelled.");
        assert_eq!(controller.updates().await.len(), 1);

        console.handle_line("clear").await;
        assert_eq!(output(console.handle_line("y").await), "Cleared.");
        assert!(controller.updates().await.is_empty());
        assert_eq!(console.prompt_string(), "macrofeed> ");
    }

    #[tokio::test]
    async fn test_select_and_status() {
        let api = ScriptedApi::new().with_macros(&["build", "deploy"]);
        api.push_updates("deploy", vec![plain_update("bot", "a", "2024-05-29T16:26:40"), plain_update("bot", "b", "2024-05-29T16:00:00")]);
        let (console, _) = console_with(api).await;

        let out = output(console.handle_line("select deploy").await);
        assert_eq!(out, "Selected 'deploy': 2 updates loaded.");
        let status = output(console.handle_line("status").await);
        assert_eq!(status, "Updates: 2 | Last update: 4:26:40 PM | Auto-refresh: on");
        let feed = output(console.handle_line("show").await);
        assert!(feed.find("\n  a").unwrap() < feed.find("\n  b").unwrap());
    }

    #[tokio::test]
    async fn test_auto_toggle_and_unknown() {
        let (console, controller) = console_with(ScriptedApi::new().with_macros(&["build"])).await;
        assert_eq!(output(console.handle_line("auto").await), "Auto-refresh is now off");
        assert!(!controller.auto_refresh_enabled().await);
        assert_eq!(output(console.handle_line("auto on").await), "Auto-refresh is now on");
        assert!(output(console.handle_line("frobnicate").await).starts_with("Unknown command"));
        assert_eq!(console.handle_line("quit").await, ConsoleReply::Quit);
    }
}
