//! sushisync_client - CLI client for the sushi menu API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;
pub mod prompt;
pub mod render;
pub mod url;

pub use client::SushiClient;
pub use error::{ClientError, Result};
pub use render::OverlayRenderer;
