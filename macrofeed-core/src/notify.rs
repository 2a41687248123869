//! macrofeed-core/src/notify.rs
//!
//! Transient, auto-dismissing notifications ("toasts").
//!
//! Each toast goes `Entering -> Visible -> Leaving -> removed` on its own
//! timer task, so any number can be on screen at once without blocking each
//! other. Whoever draws them plugs in a [`NotificationSink`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::sleep;
use tracing::{error, info};

use crate::config::ToastTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Inserted but not yet shown (entry transition pending).
    Entering,
    Visible,
    /// Exit transition running; removed once it finishes.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub phase: ToastPhase,
}

/// Receives toast lifecycle callbacks. All methods default to no-ops.
pub trait NotificationSink: Send + Sync {
    fn posted(&self, _toast: &Toast) {}
    fn shown(&self, _toast: &Toast) {}
    fn dismissed(&self, _toast: &Toast) {}
}

/// Sink that only writes visible toasts to the log.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn shown(&self, toast: &Toast) {
        match toast.severity {
            Severity::Error => error!("[toast:{}] {}", toast.severity, toast.message),
            _ => info!("[toast:{}] {}", toast.severity, toast.message),
        }
    }
}

pub struct Notifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
    next_id: AtomicU64,
    timing: ToastTiming,
    sink: Arc<dyn NotificationSink>,
}

fn lock(toasts: &Mutex<Vec<Toast>>) -> MutexGuard<'_, Vec<Toast>> {
    toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_phase(toasts: &Mutex<Vec<Toast>>, id: u64, phase: ToastPhase) -> Option<Toast> {
    let mut guard = lock(toasts);
    let toast = guard.iter_mut().find(|t| t.id == id)?;
    toast.phase = phase;
    Some(toast.clone())
}

impl Notifier {
    pub fn new(timing: ToastTiming, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
            timing,
            sink,
        }
    }

    /// Queue a toast and start its lifecycle. Must be called inside a tokio runtime.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            severity,
            phase: ToastPhase::Entering,
        };
        let id = toast.id;
        self.sink.posted(&toast);
        lock(&self.toasts).push(toast);

        let toasts = self.toasts.clone();
        let sink = self.sink.clone();
        let timing = self.timing;
        tokio::spawn(async move {
            sleep(timing.enter_delay).await;
            if let Some(t) = set_phase(&toasts, id, ToastPhase::Visible) {
                sink.shown(&t);
            }
            sleep(timing.visible).await;
            set_phase(&toasts, id, ToastPhase::Leaving);
            sleep(timing.exit).await;
            let removed = {
                let mut guard = lock(&toasts);
                guard
                    .iter()
                    .position(|t| t.id == id)
                    .map(|pos| guard.remove(pos))
            };
            if let Some(t) = removed {
                sink.dismissed(&t);
            }
        });
        id
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, Severity::Error)
    }

    /// Toasts currently on screen or transitioning, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }
}
