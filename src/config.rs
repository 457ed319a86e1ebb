//! Fetcher configuration: the toggles that distinguish script variants.

use busbar_sf_client::RequestMethod;

use crate::endpoint::UrlResolution;
use crate::error::{Error, ErrorKind, Result};

/// What gets persisted from a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// The body text, verbatim.
    Raw,
    /// The body parsed as JSON and re-serialized with 2-space indentation.
    PrettyJson,
}

/// When the body is parsed relative to the status check ([`BodyFormat::PrettyJson`] only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseOrder {
    /// Check the status first; an error response is always reported as such.
    #[default]
    StatusFirst,
    /// Parse first. A non-2xx response with a non-JSON body surfaces as a
    /// JSON error instead of the HTTP error.
    ParseFirst,
}

/// How retrieval failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorWrapping {
    /// Prefix with "Unable to retrieve data from Salesforce: ".
    Wrapped,
    /// Propagate as-is.
    Unwrapped,
}

/// How the output resource is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// One `write_text` call with the whole string.
    WriteText,
    /// Open a text sink and pipe the string into it.
    Stream,
}

/// The endpoint-path parameter, for strategies that read one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParam {
    pub id: String,
    pub default_value: Option<String>,
}

/// Everything that varies between fetch scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub description: String,
    pub method: RequestMethod,
    pub url: UrlResolution,
    pub body: BodyFormat,
    pub parse_order: ParseOrder,
    pub errors: ErrorWrapping,
    pub write: WriteStrategy,
    /// Connector parameter id: the host URL, or the full URL for `Verbatim`.
    pub connector_param: String,
    /// Endpoint parameter; `None` exactly when `url` is `Verbatim`.
    pub endpoint_param: Option<EndpointParam>,
    /// Output resource parameter id.
    pub output_param: String,
}

impl FetcherConfig {
    /// Start a configuration reading the given connector and output parameters.
    pub fn builder(
        connector_param: impl Into<String>,
        output_param: impl Into<String>,
    ) -> FetcherConfigBuilder {
        FetcherConfigBuilder {
            config: FetcherConfig {
                description: String::new(),
                method: RequestMethod::Get,
                url: UrlResolution::Verbatim,
                body: BodyFormat::Raw,
                parse_order: ParseOrder::default(),
                errors: ErrorWrapping::Unwrapped,
                write: WriteStrategy::WriteText,
                connector_param: connector_param.into(),
                endpoint_param: None,
                output_param: output_param.into(),
            },
        }
    }

    /// Check that the parameter layout matches the URL strategy.
    pub fn validate(&self) -> Result<()> {
        let mut ids = vec![self.connector_param.as_str(), self.output_param.as_str()];

        match (&self.endpoint_param, self.url.uses_endpoint()) {
            (Some(endpoint), true) => ids.push(endpoint.id.as_str()),
            (None, false) => {}
            (Some(_), false) => {
                return Err(config_error(
                    "verbatim URL resolution takes no endpoint parameter",
                ))
            }
            (None, true) => {
                return Err(config_error(format!(
                    "{:?} URL resolution needs an endpoint parameter",
                    self.url
                )))
            }
        }

        if ids.iter().any(|id| id.is_empty()) {
            return Err(config_error("parameter ids must not be empty"));
        }
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(config_error(format!("duplicate parameter id: {id}")));
            }
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Config(message.into()))
}

/// Builder for [`FetcherConfig`].
#[derive(Debug)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = description.into();
        self
    }

    pub fn method(mut self, method: RequestMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Read the endpoint path from `id` and resolve URLs with `resolution`.
    pub fn endpoint(
        mut self,
        id: impl Into<String>,
        default_value: Option<&str>,
        resolution: UrlResolution,
    ) -> Self {
        self.config.endpoint_param = Some(EndpointParam {
            id: id.into(),
            default_value: default_value.map(str::to_string),
        });
        self.config.url = resolution;
        self
    }

    /// Use the connector value as the complete URL.
    pub fn verbatim_url(mut self) -> Self {
        self.config.endpoint_param = None;
        self.config.url = UrlResolution::Verbatim;
        self
    }

    pub fn body(mut self, body: BodyFormat) -> Self {
        self.config.body = body;
        self
    }

    pub fn parse_order(mut self, order: ParseOrder) -> Self {
        self.config.parse_order = order;
        self
    }

    pub fn errors(mut self, errors: ErrorWrapping) -> Self {
        self.config.errors = errors;
        self
    }

    pub fn write(mut self, write: WriteStrategy) -> Self {
        self.config.write = write;
        self
    }

    pub fn build(self) -> Result<FetcherConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
