use colored::Colorize;

use macrofeed_core::notify::{NotificationSink, Severity, Toast};

/// Prints each toast once, when it becomes visible.
pub struct ConsoleSink;

pub fn format_toast(toast: &Toast) -> String {
    let tag = match toast.severity {
        Severity::Info => "[info]".blue().bold(),
        Severity::Success => "[ok]".green().bold(),
        Severity::Error => "[error]".red().bold(),
    };
    format!("{} {}", tag, toast.message)
}

impl NotificationSink for ConsoleSink {
    fn shown(&self, toast: &Toast) {
        println!("{}", format_toast(toast));
    }
}
