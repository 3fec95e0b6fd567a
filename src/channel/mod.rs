//! Process channels: line-oriented pipes to bot processes.

pub mod lines;
pub mod process;

pub use lines::LineSplitter;
pub use process::ProcessChannel;
