//! Operation documents assembled per request, and their GraphQL text form.
//!
//! Rendering indents two spaces per level:
//!
//! ```text
//! mutation createPerson($name: String, $age: Int) {
//!   createPerson(name: $name, age: $age) {
//!     person {
//!       name
//!       age
//!     }
//!     ok
//!   }
//! }
//! ```

use std::fmt;

use async_graphql::Value;

const INDENT: &str = "  ";

/// An empty selection set is not valid GraphQL, so one renders as this.
const EMPTY_SELECTION: &str = "__typename";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => f.write_str("query"),
            OperationKind::Mutation => f.write_str("mutation"),
        }
    }
}

/// Type expression of a variable definition, e.g. `[String!]!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableType {
    Named(String),
    NonNull(Box<VariableType>),
    List(Box<VariableType>),
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::Named(name) => f.write_str(name),
            VariableType::NonNull(inner) => write!(f, "{inner}!"),
            VariableType::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: VariableType,
    pub default_value: Option<Value>,
}

impl fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}: {}", self.name, self.ty)?;
        if let Some(default) = &self.default_value {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSet {
    selections: Vec<Selection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selections(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    pub fn push(&mut self, selection: Selection) {
        self.selections.push(selection);
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Field selection by name, ignoring inline fragments.
    pub fn field(&self, name: &str) -> Option<&SelectionNode> {
        self.selections.iter().find_map(|selection| match selection {
            Selection::Field(node) if node.name == name => Some(node),
            _ => None,
        })
    }

    /// Names of the directly selected fields, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.selections
            .iter()
            .filter_map(|selection| match selection {
                Selection::Field(node) => Some(node.name.as_str()),
                Selection::InlineFragment(_) => None,
            })
            .collect()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        writeln!(f, "{{")?;
        let indent = INDENT.repeat(level + 1);
        if self.selections.is_empty() {
            writeln!(f, "{indent}{EMPTY_SELECTION}")?;
        }
        for selection in &self.selections {
            f.write_str(&indent)?;
            selection.write_indented(f, level + 1)?;
            writeln!(f)?;
        }
        write!(f, "{}}}", INDENT.repeat(level))
    }
}

impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(SelectionNode),
    InlineFragment(InlineFragment),
}

impl Selection {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        match self {
            Selection::Field(node) => {
                f.write_str(&node.name)?;
                if let Some(selection_set) = &node.selection_set {
                    f.write_str(" ")?;
                    selection_set.write_indented(f, level)?;
                }
                Ok(())
            }
            Selection::InlineFragment(fragment) => {
                write!(f, "... on {} ", fragment.type_condition)?;
                fragment.selection_set.write_indented(f, level)
            }
        }
    }
}

/// A selected field. Leaves carry no selection set.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    pub name: String,
    pub selection_set: Option<SelectionSet>,
}

impl SelectionNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selection_set: None,
        }
    }

    pub fn with_selection_set(name: impl Into<String>, selection_set: SelectionSet) -> Self {
        Self {
            name: name.into(),
            selection_set: Some(selection_set),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: String,
    pub selection_set: SelectionSet,
}

/// One operation invoking a single root field. Every argument is bound to
/// the variable of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDocument {
    pub kind: OperationKind,
    pub field: String,
    pub variables: Vec<VariableDefinition>,
    pub arguments: Vec<String>,
    pub selection_set: Option<SelectionSet>,
}

impl fmt::Display for OperationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.field)?;
        if !self.variables.is_empty() {
            let variables: Vec<String> = self.variables.iter().map(ToString::to_string).collect();
            write!(f, "({})", variables.join(", "))?;
        }
        writeln!(f, " {{")?;

        write!(f, "{INDENT}{}", self.field)?;
        if !self.arguments.is_empty() {
            let arguments: Vec<String> = self
                .arguments
                .iter()
                .map(|name| format!("{name}: ${name}"))
                .collect();
            write!(f, "({})", arguments.join(", "))?;
        }
        if let Some(selection_set) = &self.selection_set {
            f.write_str(" ")?;
            selection_set.write_indented(f, 1)?;
        }
        write!(f, "\n}}")
    }
}
