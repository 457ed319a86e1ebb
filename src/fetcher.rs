//! The fetch pipeline: resolve URL, call Salesforce once, persist the body.

use busbar_sf_client::SfHttpClient;
use busbar_sf_script::{ExecutionContext, ParameterType, Parameters, ScriptDescription};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::config::{BodyFormat, ErrorWrapping, FetcherConfig, ParseOrder, WriteStrategy};
use crate::error::{Error, Result};
use crate::variant::FetchVariant;

/// Fetches one Salesforce API resource per invocation and writes it to an
/// output resource.
///
/// Holds no per-invocation state; one fetcher can serve concurrent
/// invocations, sharing the client's connection pool.
#[derive(Debug, Clone)]
pub struct SalesforceFetcher {
    client: SfHttpClient,
    config: FetcherConfig,
}

impl SalesforceFetcher {
    pub fn new(client: SfHttpClient, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    /// A fetcher for one of the published presets.
    pub fn for_variant(client: SfHttpClient, variant: FetchVariant) -> Self {
        Self::new(client, variant.config())
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// The parameter description the host renders and validates against.
    ///
    /// Lists exactly the parameters [`execute`](Self::execute) reads, all required.
    pub fn describe(&self) -> ScriptDescription {
        let config = &self.config;
        let mut desc = ScriptDescription::new(config.description.clone());

        let connector_help = if config.url.uses_endpoint() {
            "The connector (web endpoint) configured with the Salesforce instance's host URL."
        } else {
            "The connector (web endpoint) configured with the full Salesforce API URL to call."
        };
        desc.add_input(
            &config.connector_param,
            &config.connector_param,
            connector_help,
            ParameterType::Connector,
        )
        .set_required(true);

        if let Some(endpoint) = &config.endpoint_param {
            desc.add_input(
                &endpoint.id,
                &endpoint.id,
                "The Salesforce API endpoint URL.",
                ParameterType::String,
            )
            .set_default_value(endpoint.default_value.as_deref())
            .set_required(true);
        }

        desc.add_input(
            &config.output_param,
            &config.output_param,
            "The output file to write the data retrieved (JSON) in.",
            ParameterType::OutputResource,
        )
        .set_required(true);

        desc
    }

    /// Build the request URL from the connector and endpoint parameters.
    pub fn resolve_url(&self, params: &Parameters) -> Result<String> {
        let host = params.require(&self.config.connector_param)?;
        let endpoint = match &self.config.endpoint_param {
            Some(endpoint) if self.config.url.uses_endpoint() => params.require(&endpoint.id)?,
            _ => "",
        };
        Ok(self.config.url.resolve(host, endpoint))
    }

    /// Run one invocation against the host context.
    ///
    /// Exactly one HTTP request is made. The output resource is written once,
    /// and only after a successful response has been read completely.
    #[instrument(skip(self, ctx), fields(method = %self.config.method))]
    pub async fn execute<C: ExecutionContext>(&self, ctx: &C) -> Result<()> {
        let params = ctx.parameters();
        let url = self.resolve_url(params)?;
        let output = params.require(&self.config.output_param)?;

        let data = match self.config.errors {
            ErrorWrapping::Wrapped => self.retrieve(&url).await.map_err(Error::retrieve)?,
            ErrorWrapping::Unwrapped => self.retrieve(&url).await?,
        };

        self.save(ctx, output, &data).await
    }

    /// Call Salesforce and turn the response into the text to persist.
    async fn retrieve(&self, url: &str) -> Result<String> {
        debug!(method = %self.config.method, url, "Requesting Salesforce data");

        let request = self
            .client
            .request(self.config.method, url)
            .accept_json();
        let response = self.client.send(request).await?;

        if let Some(usage) = response.api_usage() {
            debug!(used = usage.used, limit = usage.limit, "Salesforce API usage");
        }

        let status = response.status();
        let status_text = response.status_text();
        let ok = response.is_success();
        let body = response.text().await?;

        match self.config.body {
            BodyFormat::Raw => {
                if !ok {
                    return Err(Error::non_ok(status, status_text, body));
                }
                Ok(body)
            }
            BodyFormat::PrettyJson => {
                let parsed: Option<serde_json::Value> = match self.config.parse_order {
                    ParseOrder::ParseFirst => Some(serde_json::from_str(&body)?),
                    ParseOrder::StatusFirst => None,
                };

                if !ok {
                    let shown = parsed
                        .or_else(|| serde_json::from_str(&body).ok())
                        .and_then(|value| pretty(&value).ok())
                        .unwrap_or(body);
                    return Err(Error::non_ok(status, status_text, shown));
                }

                let value = match parsed {
                    Some(value) => value,
                    None => serde_json::from_str(&body)?,
                };
                pretty(&value)
            }
        }
    }

    /// Write the data to the output resource.
    async fn save<C: ExecutionContext>(&self, ctx: &C, path: &str, data: &str) -> Result<()> {
        match self.config.write {
            WriteStrategy::WriteText => ctx.write_text(path, data).await?,
            WriteStrategy::Stream => {
                let mut sink = ctx.open_write_text(path).await?;
                let mut source = data.as_bytes();
                tokio::io::copy(&mut source, &mut sink)
                    .await
                    .map_err(|e| busbar_sf_script::Error::io(path, e))?;
                sink.shutdown()
                    .await
                    .map_err(|e| busbar_sf_script::Error::io(path, e))?;
            }
        }

        info!(path, bytes = data.len(), "Wrote response data to {path}");
        Ok(())
    }
}

/// Serialize with 2-space indentation, keeping key order.
fn pretty(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
