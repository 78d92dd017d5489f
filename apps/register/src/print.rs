//! # Print Surface
//!
//! Where rendered receipts go.
//!
//! ## Printing After Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit ok ──► Receipt::from_committed ──► render(paper_width)         │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                     PrintSurface::print(...)            │
//! │                                       │                 │               │
//! │                                       ok            PrintError          │
//! │                                       │                 │               │
//! │                                       ▼                 ▼               │
//! │                                    (done)     notice in the response;  │
//! │                                               the sale stays committed │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use tillpoint_remote::{PrinterKind, PrinterSettings};

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Printer unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write receipt: {0}")]
    WriteFailed(String),
}

#[async_trait]
pub trait PrintSurface: Send + Sync {
    /// Prints one rendered receipt.
    async fn print(&self, bill_number: &str, text: &str) -> Result<(), PrintError>;
}

/// Builds the configured printer.
pub fn from_settings(settings: &PrinterSettings) -> Arc<dyn PrintSurface> {
    match (settings.kind, &settings.spool_dir) {
        (PrinterKind::Spool, Some(dir)) => Arc::new(SpoolPrinter::new(dir.clone())),
        _ => Arc::new(LogPrinter),
    }
}

// =============================================================================
// Spool Printer
// =============================================================================

/// Writes each receipt to `<spool_dir>/<bill_number>.txt` for a print
/// daemon to pick up.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    dir: PathBuf,
}

impl SpoolPrinter {
    pub fn new(dir: PathBuf) -> Self {
        SpoolPrinter { dir }
    }

    fn file_name(bill_number: &str) -> String {
        let safe: String = bill_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{}.txt", safe)
    }
}

#[async_trait]
impl PrintSurface for SpoolPrinter {
    async fn print(&self, bill_number: &str, text: &str) -> Result<(), PrintError> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Err(PrintError::Unavailable(format!(
                "spool directory {} does not exist",
                self.dir.display()
            )));
        }

        let path = self.dir.join(Self::file_name(bill_number));
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| PrintError::WriteFailed(e.to_string()))?;

        info!(?path, bill_number = %bill_number, "Receipt spooled");
        Ok(())
    }
}

// =============================================================================
// Log Printer
// =============================================================================

/// Development printer: the receipt goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPrinter;

#[async_trait]
impl PrintSurface for LogPrinter {
    async fn print(&self, bill_number: &str, text: &str) -> Result<(), PrintError> {
        info!(bill_number = %bill_number, "Receipt printed to log");
        debug!("\n{}", text);
        Ok(())
    }
}
