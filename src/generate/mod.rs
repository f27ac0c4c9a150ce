use anyhow::{Context, Result};
use clap::Args;

use crate::catalog::shopify::ShopifyClient;
use crate::catalog::{self, CatalogClient};
use crate::feed::{self, FeedDocument};
use crate::telemetry::{self};
use crate::telemetry::ops::generate::Phase as GeneratePhase;

pub mod config;
mod types;
mod write;

use config::FeedConfig;

/// shopfeed generate (plan-only by default; use --apply to write)
#[derive(Args, Debug, Clone)]
pub struct GenerateCmd {
    /// Shopify admin domain, e.g. my-shop.myshopify.com
    #[arg(long)] pub store: Option<String>,
    /// Admin API access token
    #[arg(long)] pub token: Option<String>,
    /// Public domain used in product links (defaults to --store)
    #[arg(long)] pub storefront: Option<String>,
    #[arg(long)] pub api_version: Option<String>,
    /// Output file, or `-` for stdout
    #[arg(short, long)] pub output: Option<String>,
    #[arg(long, default_value_t = false)] pub apply: bool,
}

pub async fn run(args: GenerateCmd) -> Result<()> {
    let log = telemetry::generate();
    let cfg = FeedConfig::resolve(&args, telemetry::config::json_mode())?;
    let _g = log.root_span_kv([
        ("mode", if args.apply { "apply".to_string() } else { "plan".to_string() }),
        ("store", cfg.client.store.clone()),
        ("storefront", cfg.storefront.clone()),
        ("api_version", cfg.client.api_version.clone()),
        ("output", cfg.output.describe()),
    ]).entered();

    let client = ShopifyClient::new(cfg.client.clone()).context("building HTTP client")?;
    let doc = generate_document(&client, &client.first_page_url(), &cfg.storefront).await?;

    if !args.apply {
        let _s = log.span(&GeneratePhase::Plan).entered();
        if telemetry::config::json_mode() {
            let plan = types::GeneratePlan { output: cfg.output.describe(), bytes: doc.xml.len(), stats: doc.stats };
            log.plan(&plan)?;
        } else {
            log.info(format!("📝 Feed plan — would write {} bytes to {}", doc.xml.len(), cfg.output.describe()));
            log.info("   Use --apply to execute.");
        }
        return Ok(());
    }

    {
        let _s = log.span_kv(&GeneratePhase::Write, [("output", cfg.output.describe())]).entered();
        write::write_feed(&cfg.output, &doc.xml)
            .await
            .with_context(|| format!("writing feed to {}", cfg.output.describe()))?;
    }
    log.info(format!("💾 Feed written — {} ({} bytes)", cfg.output.describe(), doc.xml.len()));

    if telemetry::config::json_mode() {
        let result = types::GenerateResult { output: cfg.output.describe(), bytes: doc.xml.len(), stats: doc.stats };
        log.result(&result)?;
    }
    Ok(())
}

/// Fetch the whole catalog, then render it. Nothing is written here.
pub async fn generate_document<C>(client: &C, first_url: &str, storefront: &str) -> Result<FeedDocument>
where
    C: CatalogClient + ?Sized,
{
    let log = telemetry::generate();
    let products = catalog::fetch_all_products(client, first_url)
        .await
        .context("fetching catalog")?;

    let doc = {
        let _s = log.span(&GeneratePhase::Build).entered();
        feed::build_feed(&products, storefront)
    };
    if doc.stats.entries == 0 {
        log.warn("feed has no in-stock variants");
    }
    log.feed_summary(&doc.stats);
    Ok(doc)
}
