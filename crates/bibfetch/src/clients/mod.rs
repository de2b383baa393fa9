//! Clients for fetching paper metadata from bibliographic APIs.
//!
//! - [`arxiv`] - Client for the arXiv.org export API
//!
//! # Examples
//!
//! ```no_run
//! use bibfetch::clients::ArxivClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = ArxivClient::new().fetch_metadata("2301.07041").await?;
//! # Ok(())
//! # }
//! ```

pub mod arxiv;

pub use arxiv::ArxivClient;

use super::*;
