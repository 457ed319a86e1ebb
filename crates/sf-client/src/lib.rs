//! # sf-client
//!
//! Connector transport for Salesforce API calls.
//!
//! This crate stands in for the host platform's "web endpoint" connector:
//! - Pooled HTTP client with request/connect timeouts
//! - Compression support (gzip, deflate)
//! - Optional bearer token attached by the transport, never by callers
//! - Request/response tracing
//! - API usage extraction from `Sforce-Limit-Info`
//!
//! One [`SfHttpClient::send`] is exactly one HTTP round trip. Non-2xx
//! responses are returned to the caller untouched.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Script Layer                             │
//! │  (busbar-sf-fetch: URL resolution, body handling, output)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP with compression and default credentials        │
//! │  - Request building (method, headers)                       │
//! │  - Response wrapper (status, status text, body)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::{ClientConfig, RequestMethod, SfHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_client::Error> {
//!     let client = SfHttpClient::new(ClientConfig::default())?;
//!
//!     let response = client
//!         .send(
//!             client
//!                 .request(
//!                     RequestMethod::Get,
//!                     "https://myorg.my.salesforce.com/services/data/v54.0/sobjects/",
//!                 )
//!                 .accept_json(),
//!         )
//!         .await?;
//!
//!     if response.is_success() {
//!         println!("{}", response.text().await?);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::{ApiUsage, Response};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-fetch/", env!("CARGO_PKG_VERSION"));
