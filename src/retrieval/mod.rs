//! Remote retrieval capability
//!
//! The resolver and the downloader never talk to the network directly. They go
//! through the [`RemoteRetrieval`] trait, which has two operations:
//!
//! - [`fetch_text`](RemoteRetrieval::fetch_text) retrieves a page as text
//! - [`fetch_stream`](RemoteRetrieval::fetch_stream) opens a byte stream for a resource
//!
//! [`HttpRetrieval`] is the `reqwest`-backed implementation used in production.
//! Tests substitute their own implementations to inject failures.
//!
//! ## Usage
//!
//! ```no_run
//! use patent_dl::config::ResolverConfig;
//! use patent_dl::retrieval::{HttpRetrieval, RemoteRetrieval};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let retrieval = HttpRetrieval::new(&ResolverConfig::default())?;
//!     let page = retrieval
//!         .fetch_text("https://patents.google.com/patent/US1234567")
//!         .await?;
//!     println!("{} bytes of HTML", page.len());
//!     Ok(())
//! }
//! ```

mod http;
mod traits;

pub use http::HttpRetrieval;
pub use traits::{ByteStream, RemoteRetrieval};
