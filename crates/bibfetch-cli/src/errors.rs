//! Error types for the bibfetch command line application.
//!
//! Fetch failures are not errors at this level: they are printed as JSON and the
//! process exits normally. What remains are failures to render or write output.

use thiserror::Error;

/// Errors that can occur while running the CLI.
#[derive(Error, Debug)]
pub enum CliError {
  /// Errors from the underlying bibfetch library
  #[error(transparent)]
  Bibfetch(#[from] bibfetch::BibfetchError),

  /// Serializing a record to JSON failed
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// Writing to stdout or stderr failed
  #[error(transparent)]
  IO(#[from] std::io::Error),
}
