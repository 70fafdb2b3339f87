use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use restql_server::config::{load_config, FileConfig};
use restql_server::store::Library;
use restql_server::{graphql, routes};

#[derive(Parser)]
#[command(name = "restql-server", about = "REST endpoints generated from a GraphQL schema")]
struct Cli {
    /// Path to config TOML file (defaults apply when omitted)
    #[arg(long, env = "RESTQL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "Loading config");
            load_config(path)?
        }
        None => FileConfig::default(),
    };
    config.apply_env()?;

    let library = Arc::new(Library::seeded());
    let schema = graphql::build_schema(library, &config.graphql);
    let app = routes::build_router(schema, &config)?;

    let addr = config.bind_addr();
    tracing::info!("restql-server starting on {addr}");
    if config.graphql.graphiql {
        tracing::info!("GraphiQL IDE available at http://{addr}/graphql");
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
