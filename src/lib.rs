pub mod client;
pub mod config;
pub mod daemon;
pub mod error;
pub mod identity;
pub mod logging;
pub mod message;
pub mod panel;
pub mod ui;

pub use error::{PromptDeckError, Result};
