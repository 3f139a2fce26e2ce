pub mod commands;
pub mod display;
pub mod ops;

pub use commands::{CliArgs, Commands};
