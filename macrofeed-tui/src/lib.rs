// src/lib.rs

pub mod console;
pub mod html_out;
pub mod sink;

pub use console::{Console, ConsoleReply};
pub use html_out::spawn_html_writer;
pub use sink::{ConsoleSink, format_toast};
