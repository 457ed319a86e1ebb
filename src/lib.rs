//! # busbar-sf-fetch
//!
//! Fetch an arbitrary set of data (JSON) from the Salesforce APIs and write
//! it to an output resource.
//!
//! The fetcher runs as a script inside a host automation platform: the host
//! reads [`SalesforceFetcher::describe`] to render and validate parameters,
//! then calls [`SalesforceFetcher::execute`] with an
//! [`ExecutionContext`](busbar_sf_script::ExecutionContext).
//!
//! Each invocation is one linear pipeline:
//!
//! ```text
//! parameters ──► resolve URL ──► one GET/POST ──► status check ──► body text ──► output resource
//! ```
//!
//! The behavior of each step is configured by [`FetcherConfig`]; the
//! [`FetchVariant`] presets cover the published script variants.
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::SfHttpClient;
//! use busbar_sf_fetch::{FetchVariant, SalesforceFetcher};
//! use busbar_sf_script::{LocalContext, Parameters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_fetch::Error> {
//!     let fetcher = SalesforceFetcher::new(
//!         SfHttpClient::default_client()?,
//!         FetchVariant::ConnectorGet.config(),
//!     );
//!
//!     let params: Parameters = [
//!         ("salesforceConnector", "https://myorg.my.salesforce.com/"),
//!         ("targetDataPath", "sobjects.json"),
//!     ]
//!     .into_iter()
//!     .collect();
//!     let params = fetcher.describe().resolve_parameters(params)?;
//!
//!     fetcher.execute(&LocalContext::new(".", params)).await
//! }
//! ```

mod config;
mod endpoint;
mod error;
mod fetcher;
mod variant;

pub use config::{
    BodyFormat, EndpointParam, ErrorWrapping, FetcherConfig, FetcherConfigBuilder, ParseOrder,
    WriteStrategy,
};
pub use endpoint::UrlResolution;
pub use error::{Error, ErrorKind, Result};
pub use fetcher::SalesforceFetcher;
pub use variant::FetchVariant;

pub use busbar_sf_client::RequestMethod;

/// Default Salesforce REST path offered to the host UI.
pub const DEFAULT_ENDPOINT_PATH: &str = "/services/data/v54.0/sobjects/";
