//! Selection-set synthesis over the schema's type graph.
//!
//! A field's selection covers its whole return-type subgraph, bounded by
//! path-local rules:
//!
//! - the first connection-marked type on a path expands, any later one is
//!   dropped from its parent;
//! - the first node-marked type on a path expands fully, any later one is
//!   reduced to its identity field;
//! - an unmarked composite type already on the ancestor path is dropped.
//!
//! The traversal state is cloned into each child, so siblings never see
//! each other's markers.

use crate::document::{Selection, SelectionNode, SelectionSet};
use crate::error::Result;
use crate::schema::{FieldDef, SchemaModel, TypeDef, TypeRef};

/// Markers seen along the current path from the root field.
#[derive(Debug, Clone, Default)]
pub struct Traversal<'s> {
    connection_seen: bool,
    node_seen: bool,
    ancestors: Vec<&'s str>,
}

impl Traversal<'_> {
    pub fn root() -> Self {
        Self::default()
    }
}

/// Outcome of expanding one type.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// Scalar or enum: selected without a sub-selection.
    Leaf,
    /// Dropped from the parent's selection.
    Pruned,
    Expanded(SelectionSet),
}

pub struct Synthesizer<'s> {
    schema: &'s SchemaModel,
    id_field: &'s str,
}

impl<'s> Synthesizer<'s> {
    pub fn new(schema: &'s SchemaModel, id_field: &'s str) -> Self {
        Self { schema, id_field }
    }

    /// Selection set for a root field; `None` for leaf fields.
    ///
    /// A root field is never dropped, so a pruned expansion still yields an
    /// (empty) selection set.
    pub fn synthesize(
        &self,
        field: &'s FieldDef,
        traversal: &Traversal<'s>,
    ) -> Result<Option<SelectionSet>> {
        Ok(match self.expand(&field.ty, traversal)? {
            Expansion::Leaf => None,
            Expansion::Pruned => Some(SelectionSet::new()),
            Expansion::Expanded(selection_set) => Some(selection_set),
        })
    }

    /// Expand the innermost named type of `ty`.
    pub fn expand(&self, ty: &TypeRef, traversal: &Traversal<'s>) -> Result<Expansion> {
        let (classification, type_def) = self.schema.classify(ty)?;
        if classification.is_leaf() {
            return Ok(Expansion::Leaf);
        }
        self.expand_type(type_def, traversal)
    }

    /// Expand an object or interface type.
    pub fn expand_type(
        &self,
        type_def: &'s TypeDef,
        traversal: &Traversal<'s>,
    ) -> Result<Expansion> {
        let mut next = traversal.clone();

        if type_def.is_connection {
            if traversal.connection_seen {
                return Ok(Expansion::Pruned);
            }
            next.connection_seen = true;
        }

        let mut identity_only = false;
        if type_def.is_node {
            if traversal.node_seen {
                identity_only = true;
            } else {
                next.node_seen = true;
            }
        }

        let marked = type_def.is_connection || type_def.is_node;
        if !marked && traversal.ancestors.contains(&type_def.name.as_str()) {
            return Ok(Expansion::Pruned);
        }
        next.ancestors.push(&type_def.name);

        let mut selection_set = SelectionSet::new();
        for field in type_def.fields.values() {
            if identity_only && field.name != self.id_field {
                continue;
            }
            match self.expand(&field.ty, &next)? {
                Expansion::Leaf => {
                    selection_set.push(Selection::Field(SelectionNode::leaf(&field.name)))
                }
                Expansion::Pruned => {}
                Expansion::Expanded(children) => selection_set.push(Selection::Field(
                    SelectionNode::with_selection_set(&field.name, children),
                )),
            }
        }
        Ok(Expansion::Expanded(selection_set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;
    use crate::error::Error;
    use crate::schema::tests::bookstore;

    fn root_selection(schema: &SchemaModel, field: &str) -> Option<SelectionSet> {
        let query = schema.query_type().unwrap();
        Synthesizer::new(schema, "id")
            .synthesize(&query.fields[field], &Traversal::root())
            .unwrap()
    }

    #[test]
    fn leaf_fields_have_no_selection() {
        let schema = bookstore();
        assert!(root_selection(&schema, "hello").is_none());
        assert!(root_selection(&schema, "genres").is_none());
    }

    #[test]
    fn books_expand_one_connection_and_one_node() {
        let schema = bookstore();
        let books = root_selection(&schema, "books").unwrap();

        let expected = "\
{
  pageInfo {
    hasPreviousPage
    hasNextPage
    startCursor
    endCursor
  }
  edges {
    node {
      id
      title
      genre
      publisher {
        id
      }
    }
    cursor
  }
}";
        assert_eq!(books.to_string(), expected);
    }

    #[test]
    fn later_nodes_are_reduced_to_identity() {
        let schema = bookstore();
        let publisher = root_selection(&schema, "publisher").unwrap();
        assert_eq!(publisher.field_names(), vec!["id", "name", "books"]);

        let book = publisher
            .field("books")
            .and_then(|books| books.selection_set.as_ref())
            .and_then(|books| books.field("edges"))
            .and_then(|edges| edges.selection_set.as_ref())
            .and_then(|edges| edges.field("node"))
            .and_then(|node| node.selection_set.as_ref())
            .unwrap();
        assert_eq!(book.field_names(), vec!["id"]);
    }

    #[test]
    fn node_interface_selects_its_own_fields() {
        let schema = bookstore();
        let node = root_selection(&schema, "node").unwrap();
        assert_eq!(node.field_names(), vec!["id"]);
    }

    #[test]
    fn unmarked_cycles_terminate() {
        let sdl = r#"
            type Category {
              name: String
              parent: Category
              children: [Category!]!
              tag: Tag
            }
            type Tag {
              label: String
              category: Category
            }
            type Query { category: Category }
        "#;
        let schema = SchemaModel::parse(sdl, &RelayConfig::default()).unwrap();
        let category = root_selection(&schema, "category").unwrap();
        assert_eq!(category.to_string(), "{\n  name\n  tag {\n    label\n  }\n}");
    }

    #[test]
    fn self_referencing_nodes_stop_after_one_level() {
        let sdl = r#"
            interface Node { id: ID! }
            type Person implements Node {
              id: ID!
              name: String
              friend: Person
            }
            type Query { me: Person }
        "#;
        let schema = SchemaModel::parse(sdl, &RelayConfig::default()).unwrap();
        let me = root_selection(&schema, "me").unwrap();
        assert_eq!(me.to_string(), "{\n  id\n  name\n  friend {\n    id\n  }\n}");
    }

    #[test]
    fn nested_connections_are_dropped() {
        let sdl = r#"
            type PageInfo { hasNextPage: Boolean! }
            type ThreadConnection {
              pageInfo: PageInfo!
              edges: [ThreadEdge]
            }
            type ThreadEdge { node: Thread }
            type Thread {
              title: String
              replies: ThreadConnection
            }
            type Query { threads: ThreadConnection }
        "#;
        let schema = SchemaModel::parse(sdl, &RelayConfig::default()).unwrap();
        let threads = root_selection(&schema, "threads").unwrap();
        let thread = threads
            .field("edges")
            .and_then(|edges| edges.selection_set.as_ref())
            .and_then(|edges| edges.field("node"))
            .and_then(|node| node.selection_set.as_ref())
            .unwrap();
        assert_eq!(thread.field_names(), vec!["title"]);
    }

    #[test]
    fn siblings_do_not_share_markers() {
        let sdl = r#"
            interface Node { id: ID! }
            type User implements Node { id: ID! name: String }
            type Pair {
              left: User
              right: User
            }
            type Query { pair: Pair }
        "#;
        let schema = SchemaModel::parse(sdl, &RelayConfig::default()).unwrap();
        let pair = root_selection(&schema, "pair").unwrap();
        for side in ["left", "right"] {
            let user = pair.field(side).and_then(|s| s.selection_set.as_ref()).unwrap();
            assert_eq!(user.field_names(), vec!["id", "name"]);
        }
    }

    #[test]
    fn pruned_children_leave_an_empty_set() {
        let sdl = r#"
            type Loop { next: Loop }
            type Query { loop: Loop }
        "#;
        let schema = SchemaModel::parse(sdl, &RelayConfig::default()).unwrap();
        let selection = root_selection(&schema, "loop").unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.to_string(), "{\n  __typename\n}");
    }

    #[test]
    fn union_return_types_are_rejected() {
        let sdl = r#"
            type A { a: String }
            type B { b: String }
            union AorB = A | B
            type Query { either: AorB }
        "#;
        let schema = SchemaModel::parse(sdl, &RelayConfig::default()).unwrap();
        let query = schema.query_type().unwrap();
        let err = Synthesizer::new(&schema, "id")
            .synthesize(&query.fields["either"], &Traversal::root())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { kind: "union", .. }));
    }
}
