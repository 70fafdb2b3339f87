//! Bridges REST-style HTTP requests to a GraphQL engine.
//!
//! Every field on the query and mutation roots becomes one endpoint
//! (`GET /{field}` for queries, `POST /{field}` for mutations). The selection
//! set covering the field's whole return-type subgraph is synthesized once at
//! registration, and each request is turned into a complete operation document
//! that is executed against the engine.

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod global_id;
pub mod node;
pub mod registry;
pub mod schema;
pub mod selection;
pub mod variables;

pub use adapter::{extract_variables, RequestVariables};
pub use bridge::RestBridge;
pub use config::{BridgeConfig, RelayConfig};
pub use document::{
    InlineFragment, OperationDocument, OperationKind, Selection, SelectionNode, SelectionSet,
    VariableDefinition, VariableType,
};
pub use engine::{ExecutionResult, GraphQLEngine};
pub use error::{Error, Result};
pub use global_id::{DecodeError, GlobalId};
pub use node::NodeResolver;
pub use registry::{ArgumentBinding, Endpoint, RouteTable};
pub use schema::{ArgumentDef, Classification, FieldDef, SchemaModel, TypeDef, TypeKind, TypeRef};
pub use selection::{Expansion, Synthesizer, Traversal};
