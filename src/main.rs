use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;

mod catalog;
mod feed;
mod generate;
mod telemetry;
mod util;

#[derive(Parser)]
#[command(name = "shopfeed", about = "Shopify catalog to XML product feed")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Generate(generate::GenerateCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and SHOPFEED_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Generate(args) => generate::run(args).await?,
    }

    Ok(())
}
