pub mod auto_refresh;

pub use auto_refresh::spawn_auto_refresh_task;
