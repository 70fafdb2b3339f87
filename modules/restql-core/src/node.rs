//! Concrete-type fragments for polymorphic node lookups.
//!
//! A root field such as `node(id: ID!): Node` only exposes the interface's
//! own fields. When the caller's global id names a concrete type, the
//! endpoint appends `... on <Type> { ... }` with that type's full selection.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::config::RelayConfig;
use crate::document::{InlineFragment, SelectionSet};
use crate::error::{Error, Result};
use crate::global_id::{DecodeError, GlobalId};
use crate::schema::{FieldDef, SchemaModel, TypeKind};
use crate::selection::{Expansion, Synthesizer, Traversal};

#[derive(Debug, Clone)]
pub struct NodeResolver {
    field: String,
    generic_type: String,
    id_argument: String,
    fragments: HashMap<String, SelectionSet>,
}

impl NodeResolver {
    /// Build a resolver when `field` returns a node-marked interface and takes
    /// the id argument. Fragments for every possible concrete type are
    /// synthesized up front.
    pub fn for_field<'s>(
        schema: &'s SchemaModel,
        field: &FieldDef,
        relay: &RelayConfig,
        synthesizer: &Synthesizer<'s>,
    ) -> Result<Option<Self>> {
        let return_type = schema.lookup(field.ty.named_type())?;
        if !return_type.is_node
            || return_type.kind != TypeKind::Interface
            || !field.arguments.contains_key(&relay.id_argument)
        {
            return Ok(None);
        }

        let mut fragments = HashMap::new();
        for concrete in schema.possible_types(&return_type.name) {
            let selection_set = match synthesizer.expand_type(concrete, &Traversal::root())? {
                Expansion::Expanded(selection_set) => selection_set,
                Expansion::Leaf | Expansion::Pruned => SelectionSet::new(),
            };
            fragments.insert(concrete.name.clone(), selection_set);
        }

        Ok(Some(Self {
            field: field.name.clone(),
            generic_type: return_type.name.clone(),
            id_argument: relay.id_argument.clone(),
            fragments,
        }))
    }

    /// Concrete type names with a precomputed fragment.
    pub fn concrete_types(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    pub fn resolve_node(&self, id: &str) -> Result<GlobalId, DecodeError> {
        GlobalId::decode(id)
    }

    /// Fragment for the type named by the id among `variables`.
    ///
    /// Returns `None` when no id string was supplied (the engine reports a
    /// missing required argument) or when the id names the interface itself.
    pub fn fragment_for(
        &self,
        variables: &serde_json::Map<String, JsonValue>,
    ) -> Result<Option<InlineFragment>> {
        let Some(JsonValue::String(id)) = variables.get(&self.id_argument) else {
            return Ok(None);
        };

        let global_id = self.resolve_node(id).map_err(|source| Error::InvalidGlobalId {
            id: id.clone(),
            source,
        })?;
        if global_id.type_name == self.generic_type {
            return Ok(None);
        }

        let selection_set = self.fragments.get(&global_id.type_name).ok_or_else(|| {
            Error::UnknownNodeType {
                type_name: global_id.type_name.clone(),
                field: self.field.clone(),
            }
        })?;
        Ok(Some(InlineFragment {
            type_condition: global_id.type_name,
            selection_set: selection_set.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tests::bookstore;

    fn node_resolver(schema: &SchemaModel, field: &str) -> Option<NodeResolver> {
        let relay = RelayConfig::default();
        let synthesizer = Synthesizer::new(schema, &relay.id_field);
        let field = &schema.query_type().unwrap().fields[field];
        NodeResolver::for_field(schema, field, &relay, &synthesizer).unwrap()
    }

    fn variables(id: &str) -> serde_json::Map<String, JsonValue> {
        let mut variables = serde_json::Map::new();
        variables.insert("id".into(), JsonValue::String(id.into()));
        variables
    }

    #[test]
    fn applies_only_to_polymorphic_node_fields() {
        let schema = bookstore();
        assert!(node_resolver(&schema, "node").is_some());
        assert!(node_resolver(&schema, "publisher").is_none());
        assert!(node_resolver(&schema, "books").is_none());
    }

    #[test]
    fn precomputes_every_concrete_type() {
        let schema = bookstore();
        let resolver = node_resolver(&schema, "node").unwrap();
        let mut types: Vec<_> = resolver.concrete_types().collect();
        types.sort();
        assert_eq!(types, vec!["Author", "Book", "Publisher"]);
    }

    #[test]
    fn book_fragment_truncates_nested_nodes() {
        let schema = bookstore();
        let resolver = node_resolver(&schema, "node").unwrap();
        let id = GlobalId::new("Book", "1").encode();
        let fragment = resolver.fragment_for(&variables(&id)).unwrap().unwrap();

        assert_eq!(fragment.type_condition, "Book");
        let book = &fragment.selection_set;
        assert_eq!(
            book.field_names(),
            vec!["id", "title", "genre", "publisher", "authors"]
        );

        let publisher = book.field("publisher").unwrap().selection_set.as_ref().unwrap();
        assert_eq!(publisher.field_names(), vec!["id"]);

        let author = book
            .field("authors")
            .and_then(|authors| authors.selection_set.as_ref())
            .and_then(|authors| authors.field("edges"))
            .and_then(|edges| edges.selection_set.as_ref())
            .and_then(|edges| edges.field("node"))
            .and_then(|node| node.selection_set.as_ref())
            .unwrap();
        assert_eq!(author.field_names(), vec!["id"]);
    }

    #[test]
    fn interface_ids_need_no_fragment() {
        let schema = bookstore();
        let resolver = node_resolver(&schema, "node").unwrap();
        let id = GlobalId::new("Node", "1").encode();
        assert!(resolver.fragment_for(&variables(&id)).unwrap().is_none());
        assert!(resolver.fragment_for(&serde_json::Map::new()).unwrap().is_none());
    }

    #[test]
    fn bad_ids_are_client_errors() {
        let schema = bookstore();
        let resolver = node_resolver(&schema, "node").unwrap();

        let err = resolver.fragment_for(&variables("@@@")).unwrap_err();
        assert!(matches!(err, Error::InvalidGlobalId { .. }));

        let id = GlobalId::new("Genre", "1").encode();
        let err = resolver.fragment_for(&variables(&id)).unwrap_err();
        assert!(matches!(err, Error::UnknownNodeType { type_name, .. } if type_name == "Genre"));
    }
}
