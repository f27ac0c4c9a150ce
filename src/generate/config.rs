use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::catalog::shopify::ShopifyClientConfig;

use super::GenerateCmd;

pub const DEFAULT_OUTPUT: &str = "feed.xml";

/// Where the finished document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn parse(raw: &str) -> Self {
        if raw == "-" { OutputTarget::Stdout } else { OutputTarget::File(PathBuf::from(raw)) }
    }

    pub fn describe(&self) -> String {
        match self {
            OutputTarget::Stdout => "stdout".to_string(),
            OutputTarget::File(p) => p.display().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub client: ShopifyClientConfig,
    pub storefront: String,
    pub output: OutputTarget,
}

impl FeedConfig {
    /// Flags win over the environment; the storefront defaults to the store host.
    /// `json` is the global `--json` flag, which owns stdout.
    pub fn resolve(args: &GenerateCmd, json: bool) -> Result<Self> {
        let store = args
            .store
            .clone()
            .or_else(|| env::var("SHOPIFY_STORE").ok())
            .ok_or_else(|| anyhow!("Please provide --store or set SHOPIFY_STORE"))?;
        let store = normalize_host(&store).context("invalid store domain")?;

        let token = args
            .token
            .clone()
            .or_else(|| env::var("SHOPIFY_ACCESS_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("Please provide --token or set SHOPIFY_ACCESS_TOKEN"))?;

        let storefront = match args.storefront.clone().or_else(|| env::var("SHOPFEED_STOREFRONT").ok()) {
            Some(s) => normalize_host(&s).context("invalid storefront domain")?,
            None => store.clone(),
        };

        let output = args
            .output
            .clone()
            .or_else(|| env::var("SHOPFEED_OUTPUT").ok())
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        let output = OutputTarget::parse(&output);
        if json && args.apply && output == OutputTarget::Stdout {
            bail!("--json reserves stdout for the result envelope; write the feed to a file with --output <path>");
        }

        let mut client = ShopifyClientConfig::new(store, token.trim()).with_env_overrides();
        if let Some(version) = &args.api_version {
            client.api_version = version.clone();
        }

        Ok(FeedConfig { client, storefront, output })
    }
}

/// Accept `shop.example`, `https://shop.example/` or `shop.example:8443` and
/// reduce to the host (and port, if any).
pub fn normalize_host(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("domain is empty");
    }
    let with_scheme = if raw.contains("://") { raw.to_string() } else { format!("https://{raw}") };
    let url = Url::parse(&with_scheme).with_context(|| format!("cannot parse {raw:?}"))?;
    let host = url.host_str().ok_or_else(|| anyhow!("no host in {raw:?}"))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
