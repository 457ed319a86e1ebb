//! Run a Salesforce fetch script outside the host platform.
//!
//! Output resources are files under `--output-dir`; parameters are passed as
//! `--param id=value` and completed with the script's declared defaults.
//!
//! ```sh
//! sf-fetch describe --variant connector-get
//!
//! export SF_ACCESS_TOKEN='00D...'
//! sf-fetch execute --variant connector-get \
//!     --param salesforceConnector=https://myorg.my.salesforce.com/ \
//!     --param targetDataPath=sobjects.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use busbar_sf_client::{ClientConfig, SfHttpClient};
use busbar_sf_fetch::{FetchVariant, SalesforceFetcher};
use busbar_sf_script::{LocalContext, Parameters};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the script's parameter description as JSON.
    Describe {
        #[arg(long, env = "SF_FETCH_VARIANT", default_value_t = FetchVariant::default())]
        variant: FetchVariant,
    },
    /// Fetch once and write the response to the output resource.
    Execute(ExecuteArgs),
}

#[derive(Args)]
struct ExecuteArgs {
    #[arg(long, env = "SF_FETCH_VARIANT", default_value_t = FetchVariant::default())]
    variant: FetchVariant,

    /// Parameter value as `id=value`; repeatable.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Directory output resource paths are relative to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Request timeout in seconds.
    #[arg(long, env = "SF_FETCH_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Bearer token the connector attaches to the request.
    #[arg(long, env = "SF_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{raw}'"))?;
    if id.is_empty() {
        return Err(format!("empty parameter id in '{raw}'"));
    }
    Ok((id.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Describe { variant } => {
            let client = SfHttpClient::default_client()?;
            let fetcher = SalesforceFetcher::for_variant(client, variant);
            println!("{}", serde_json::to_string_pretty(&fetcher.describe())?);
        }
        Commands::Execute(args) => execute(args).await?,
    }

    Ok(())
}

async fn execute(args: ExecuteArgs) -> anyhow::Result<()> {
    let mut config = ClientConfig::builder().with_timeout(Duration::from_secs(args.timeout));
    if let Some(token) = args.access_token {
        config = config.with_bearer_token(token);
    }
    let client = SfHttpClient::new(config.build())?;
    let fetcher = SalesforceFetcher::for_variant(client, args.variant);

    let supplied: Parameters = args.params.into_iter().collect();
    let params = fetcher
        .describe()
        .resolve_parameters(supplied)
        .context("invalid parameters")?;

    let ctx = LocalContext::new(args.output_dir, params);
    fetcher
        .execute(&ctx)
        .await
        .with_context(|| format!("{} failed", args.variant))?;

    Ok(())
}
