use anyhow::{bail, Context, Result};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use restql_core::RestBridge;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::FileConfig;
use crate::graphql::AppSchema;

/// Paths served by the host router; no root field may claim them.
pub const RESERVED_PATHS: [&str; 2] = ["/graphql", "/health"];

pub fn build_router(schema: AppSchema, config: &FileConfig) -> Result<Router> {
    let bridge = RestBridge::new(schema.clone(), &config.rest)
        .context("Failed to register REST endpoints")?;
    if let Some(path) = bridge
        .routes()
        .paths()
        .find(|path| RESERVED_PATHS.contains(path))
    {
        bail!("REST endpoint {path} collides with a server route");
    }

    let graphql_route = if config.graphql.graphiql {
        get(graphiql_handler).post(graphql_handler)
    } else {
        post(graphql_handler)
    };

    let router = Router::new()
        .route("/graphql", graphql_route)
        .route("/health", get(health))
        .with_state(AppState { schema })
        .merge(bridge.into_router())
        .layer(cors(&config.server.allowed_origins))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        );
    Ok(router)
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[derive(Clone)]
struct AppState {
    schema: AppSchema,
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    let span = tracing::info_span!("graphql_request");
    let response = state.schema.execute(req.into_inner()).instrument(span).await;
    if !response.errors.is_empty() {
        tracing::warn!(errors = ?response.errors, "GraphQL errors");
    }
    response.into()
}

async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health() -> &'static str {
    "ok"
}
