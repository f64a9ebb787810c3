pub mod config;
pub mod types;

pub use config::{CompletionPolicy, Config, FailurePolicy};
pub use types::*;
