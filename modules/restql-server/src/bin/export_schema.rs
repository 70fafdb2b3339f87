//! Export the demo GraphQL schema as SDL.
//!
//! Usage: cargo run --bin export-schema [output_path]

use std::sync::Arc;

use anyhow::{Context, Result};
use restql_server::config::GraphqlConfig;
use restql_server::graphql::build_schema;
use restql_server::store::Library;

fn main() -> Result<()> {
    let schema = build_schema(Arc::new(Library::default()), &GraphqlConfig::default());
    let sdl = schema.sdl();

    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "schema.graphql".to_string());

    std::fs::write(&out_path, &sdl)
        .with_context(|| format!("Failed to write schema file: {out_path}"))?;
    eprintln!("Schema exported to {out_path} ({} bytes)", sdl.len());
    Ok(())
}
