// src/lib.rs

pub mod api;
pub mod config;
pub mod controller;
pub mod feed;
pub mod http;
pub mod notify;
pub mod render;
pub mod tasks;
pub mod test_utils;
pub mod view;

pub use api::RestFeedApi;
pub use config::DashboardConfig;
pub use controller::{ClearOutcome, LoadOutcome, RefreshController};
pub use http::{DefaultHttpClient, HttpClient};
pub use macrofeed_common::error::Error;
pub use notify::{Notifier, Severity};
