//! One endpoint per root field, registered once at startup.
//!
//! Query fields bind to `GET`, mutation fields to `POST`. Each endpoint caches
//! everything that depends only on the schema: the synthesized selection set,
//! the variable definitions and, for polymorphic node fields, the
//! concrete-type fragments.

use axum::http::Method;
use indexmap::IndexMap;
use tracing::info;

use crate::adapter::RequestVariables;
use crate::config::BridgeConfig;
use crate::document::{OperationDocument, OperationKind, Selection, SelectionSet, VariableDefinition};
use crate::error::{Error, Result};
use crate::node::NodeResolver;
use crate::schema::{ArgumentDef, FieldDef, SchemaModel, TypeDef, TypeKind, TypeRef};
use crate::selection::{Synthesizer, Traversal};
use crate::variables::variable_definition;

/// A field argument bound to the variable of the same name.
#[derive(Debug, Clone)]
pub struct ArgumentBinding {
    pub name: String,
    pub ty: TypeRef,
    /// Kind of the argument's innermost named type, used to coerce
    /// query-string values.
    pub kind: TypeKind,
    pub variable: VariableDefinition,
}

impl ArgumentBinding {
    fn new(schema: &SchemaModel, argument: &ArgumentDef) -> Result<Self> {
        let kind = schema.lookup(argument.ty.named_type())?.kind;
        Ok(Self {
            name: argument.name.clone(),
            ty: argument.ty.clone(),
            kind,
            variable: variable_definition(argument),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    pub operation: OperationKind,
    pub field_name: String,
    pub arguments: Vec<ArgumentBinding>,
    pub selection_set: Option<SelectionSet>,
    pub node: Option<NodeResolver>,
}

impl Endpoint {
    fn build<'s>(
        schema: &'s SchemaModel,
        field: &'s FieldDef,
        operation: OperationKind,
        config: &BridgeConfig,
        synthesizer: &Synthesizer<'s>,
    ) -> Result<Self> {
        let method = match operation {
            OperationKind::Query => Method::GET,
            OperationKind::Mutation => Method::POST,
        };
        let arguments = field
            .arguments
            .values()
            .map(|argument| ArgumentBinding::new(schema, argument))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: config.route_path(&field.name),
            method,
            operation,
            field_name: field.name.clone(),
            arguments,
            selection_set: synthesizer.synthesize(field, &Traversal::root())?,
            node: NodeResolver::for_field(schema, field, &config.relay, synthesizer)?,
        })
    }

    /// Assemble the operation for one request.
    ///
    /// Only arguments present among the supplied variables are bound, so an
    /// omitted argument falls back to its schema default. A raw body binds
    /// every argument and leaves interpretation to the engine.
    pub fn document(&self, variables: &RequestVariables) -> Result<OperationDocument> {
        let bound: Vec<&ArgumentBinding> = match variables {
            RequestVariables::Map(values) => self
                .arguments
                .iter()
                .filter(|argument| values.contains_key(&argument.name))
                .collect(),
            RequestVariables::Raw(_) => self.arguments.iter().collect(),
        };

        let mut selection_set = self.selection_set.clone();
        if let (Some(node), RequestVariables::Map(values)) = (&self.node, variables) {
            if let Some(fragment) = node.fragment_for(values)? {
                selection_set
                    .get_or_insert_with(SelectionSet::new)
                    .push(Selection::InlineFragment(fragment));
            }
        }

        Ok(OperationDocument {
            kind: self.operation,
            field: self.field_name.clone(),
            variables: bound.iter().map(|argument| argument.variable.clone()).collect(),
            arguments: bound.iter().map(|argument| argument.name.clone()).collect(),
            selection_set,
        })
    }
}

/// Endpoints keyed by path, in registration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, Endpoint>,
}

impl RouteTable {
    /// Register every query and mutation root field. A root type that is
    /// absent contributes nothing; two fields on the same path are an error.
    pub fn register(schema: &SchemaModel, config: &BridgeConfig) -> Result<Self> {
        let synthesizer = Synthesizer::new(schema, &config.relay.id_field);
        let roots: [(Option<&TypeDef>, OperationKind); 2] = [
            (schema.query_type(), OperationKind::Query),
            (schema.mutation_type(), OperationKind::Mutation),
        ];

        let mut table = Self::default();
        for (root, operation) in roots {
            let Some(root) = root else { continue };
            for field in root.fields.values() {
                let endpoint = Endpoint::build(schema, field, operation, config, &synthesizer)?;
                table.insert(endpoint)?;
            }
        }
        Ok(table)
    }

    fn insert(&mut self, endpoint: Endpoint) -> Result<()> {
        if let Some(existing) = self.routes.get(&endpoint.path) {
            return Err(Error::DuplicateRoute {
                path: endpoint.path.clone(),
                first: format!("{} {}", existing.operation, existing.field_name),
                second: format!("{} {}", endpoint.operation, endpoint.field_name),
            });
        }
        info!(
            method = %endpoint.method,
            path = endpoint.path.as_str(),
            field = endpoint.field_name.as_str(),
            "Registered REST endpoint"
        );
        self.routes.insert(endpoint.path.clone(), endpoint);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Endpoint> {
        self.routes.get(path)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.routes.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
