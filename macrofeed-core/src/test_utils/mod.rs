pub mod fixtures;
pub mod scripted_api;

pub use fixtures::*;
pub use scripted_api::ScriptedApi;
