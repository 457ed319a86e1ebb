//! Named presets for the published fetch scripts.

use std::fmt;
use std::str::FromStr;

use busbar_sf_client::RequestMethod;

use crate::config::{
    BodyFormat, EndpointParam, ErrorWrapping, FetcherConfig, ParseOrder, WriteStrategy,
};
use crate::endpoint::UrlResolution;
use crate::error::{Error, ErrorKind};
use crate::DEFAULT_ENDPOINT_PATH;

const DESCRIPTION: &str = "Script for integration with Salesforce.com. Fetches an arbitrary set \
     of data (JSON format) using the Salesforce.com APIs.";

/// The published fetch scripts.
///
/// | Preset | Method | URL | Body | Errors | Write |
/// |---|---|---|---|---|---|
/// | `connector-get` | GET | [`Concatenate`](UrlResolution::Concatenate) | raw | wrapped | write |
/// | `host-join-get` | GET | [`JoinNormalized`](UrlResolution::JoinNormalized) | pretty JSON, parse first | unwrapped | stream |
/// | `endpoint-get` | GET | [`Verbatim`](UrlResolution::Verbatim) | raw | unwrapped | stream |
/// | `endpoint-post` | POST | [`Verbatim`](UrlResolution::Verbatim) | pretty JSON, parse first | wrapped | write |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchVariant {
    #[default]
    ConnectorGet,
    HostJoinGet,
    EndpointGet,
    EndpointPost,
}

impl FetchVariant {
    pub const ALL: [FetchVariant; 4] = [
        FetchVariant::ConnectorGet,
        FetchVariant::HostJoinGet,
        FetchVariant::EndpointGet,
        FetchVariant::EndpointPost,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FetchVariant::ConnectorGet => "connector-get",
            FetchVariant::HostJoinGet => "host-join-get",
            FetchVariant::EndpointGet => "endpoint-get",
            FetchVariant::EndpointPost => "endpoint-post",
        }
    }

    /// The fetcher configuration for this preset.
    pub fn config(&self) -> FetcherConfig {
        let (connector, output) = match self {
            FetchVariant::ConnectorGet => ("salesforceConnector", "targetDataPath"),
            FetchVariant::HostJoinGet => ("host", "outputPath"),
            FetchVariant::EndpointGet | FetchVariant::EndpointPost => {
                ("salesforceEndpoint", "targetDataPath")
            }
        };

        let mut config = FetcherConfig {
            description: DESCRIPTION.to_string(),
            method: RequestMethod::Get,
            url: UrlResolution::Verbatim,
            body: BodyFormat::Raw,
            parse_order: ParseOrder::StatusFirst,
            errors: ErrorWrapping::Unwrapped,
            write: WriteStrategy::Stream,
            connector_param: connector.to_string(),
            endpoint_param: None,
            output_param: output.to_string(),
        };

        match self {
            FetchVariant::ConnectorGet => {
                config.url = UrlResolution::Concatenate;
                config.endpoint_param = Some(endpoint_param("salesforceEndpointUrl"));
                config.errors = ErrorWrapping::Wrapped;
                config.write = WriteStrategy::WriteText;
            }
            FetchVariant::HostJoinGet => {
                config.url = UrlResolution::JoinNormalized;
                config.endpoint_param = Some(endpoint_param("endpointUrl"));
                config.body = BodyFormat::PrettyJson;
                config.parse_order = ParseOrder::ParseFirst;
            }
            FetchVariant::EndpointGet => {}
            FetchVariant::EndpointPost => {
                config.method = RequestMethod::Post;
                config.body = BodyFormat::PrettyJson;
                config.parse_order = ParseOrder::ParseFirst;
                config.errors = ErrorWrapping::Wrapped;
                config.write = WriteStrategy::WriteText;
            }
        }

        config
    }
}

fn endpoint_param(id: &str) -> EndpointParam {
    EndpointParam {
        id: id.to_string(),
        default_value: Some(DEFAULT_ENDPOINT_PATH.to_string()),
    }
}

impl From<FetchVariant> for FetcherConfig {
    fn from(variant: FetchVariant) -> Self {
        variant.config()
    }
}

impl fmt::Display for FetchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FetchVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FetchVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = FetchVariant::ALL.iter().map(|v| v.name()).collect();
                Error::new(ErrorKind::Config(format!(
                    "unknown variant '{s}' (expected one of: {})",
                    known.join(", ")
                )))
            })
    }
}
