//! docsearch-server — HTTP transport for the multi-tenant documentation
//! search service's tool surface.

use server::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    server::start_server(config).await?;
    Ok(())
}
