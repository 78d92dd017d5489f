//! # Tillpoint Register Entry Point
//!
//! ```text
//! tillpoint-register [CONFIG_PATH]
//! ```
//!
//! Without a path, `register.toml` is read from the platform config
//! directory. The actual setup is in lib.rs.

use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    tillpoint_register::run(config_path).await
}
