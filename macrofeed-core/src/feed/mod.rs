pub mod state;
pub mod status;

pub use state::{FeedState, LoadTag};
pub use status::StatusSummary;
