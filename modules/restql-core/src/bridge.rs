use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use tracing::{debug, error, info_span, warn, Instrument};

use crate::adapter::{extract_variables, RequestVariables};
use crate::config::BridgeConfig;
use crate::engine::{ExecutionResult, GraphQLEngine};
use crate::error::{Error, Result};
use crate::registry::{Endpoint, RouteTable};
use crate::schema::SchemaModel;

/// Registered endpoints plus the engine that executes them.
///
/// Cloning is cheap; the route table is shared read-only between requests.
#[derive(Clone)]
pub struct RestBridge {
    routes: Arc<RouteTable>,
    engine: Arc<dyn GraphQLEngine>,
}

impl RestBridge {
    pub fn new<E: GraphQLEngine>(engine: E, config: &BridgeConfig) -> Result<Self> {
        Self::from_shared(Arc::new(engine), config)
    }

    /// Load the engine's schema and register one endpoint per root field.
    pub fn from_shared(engine: Arc<dyn GraphQLEngine>, config: &BridgeConfig) -> Result<Self> {
        let schema = SchemaModel::parse(&engine.sdl(), &config.relay)?;
        let routes = RouteTable::register(&schema, config)?;
        Ok(Self {
            routes: Arc::new(routes),
            engine,
        })
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Assemble and run the document for one request to `endpoint`.
    pub async fn execute(
        &self,
        endpoint: &Endpoint,
        variables: RequestVariables,
    ) -> Result<ExecutionResult> {
        let document = endpoint.document(&variables)?;
        debug!(document = %document, "Executing synthesized document");

        let result = self.engine.execute(&document, variables).await;
        if !result.is_ok() {
            warn!(errors = ?result.errors, "GraphQL errors");
        }
        Ok(result)
    }

    /// Routes for every endpoint, to be merged into the host router.
    pub fn into_router<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut router = Router::new();
        for endpoint in self.routes.endpoints() {
            let state = EndpointState {
                bridge: self.clone(),
                endpoint: Arc::new(endpoint.clone()),
            };
            let method_router: MethodRouter<EndpointState> = if endpoint.method == Method::POST {
                post(dispatch)
            } else {
                get(dispatch)
            };
            router = router.route(&endpoint.path, method_router.with_state(state));
        }
        router
    }
}

#[derive(Clone)]
struct EndpointState {
    bridge: RestBridge,
    endpoint: Arc<Endpoint>,
}

async fn dispatch(
    State(state): State<EndpointState>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let endpoint = state.endpoint.clone();
    let span = info_span!(
        "rest_request",
        method = %method,
        path = endpoint.path.as_str(),
        field = endpoint.field_name.as_str(),
    );

    async move {
        let variables = extract_variables(
            &method,
            &headers,
            query.as_deref(),
            body,
            &endpoint.arguments,
        )?;
        state.bridge.execute(&endpoint, variables).await
    }
    .instrument(span.clone())
    .await
    .map(|result| (result.status_code(), Json(result)).into_response())
    .unwrap_or_else(|e| {
        let _enter = span.enter();
        log_failure(&e);
        e.into_response()
    })
}

fn log_failure(e: &Error) {
    if e.status_code().is_server_error() {
        error!(error = %e, "REST request failed");
    } else {
        warn!(error = %e, "Rejected REST request");
    }
}
