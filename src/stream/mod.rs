pub mod sse;
pub mod client;
pub mod commands;

pub use client::run_event_stream;
pub use commands::{CommandSender, ResetCommand};
