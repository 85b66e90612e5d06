use clap::Parser;
use databricks_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    databricks_cli::logging::init(cli.verbose);
    cli.run().await?;
    Ok(())
}
