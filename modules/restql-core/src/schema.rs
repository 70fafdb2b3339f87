//! Owned, immutable view of a GraphQL schema's type graph.
//!
//! Built once from SDL at startup. Relay markers (node / connection) are
//! resolved while loading and stored on each [`TypeDef`], so traversal never
//! has to re-derive them.

use std::fmt;

use async_graphql::parser::types::{
    BaseType, FieldDefinition, InputValueDefinition, ServiceDocument, Type,
    TypeKind as ParsedKind, TypeSystemDefinition,
};
use async_graphql::Value;
use indexmap::IndexMap;

use crate::config::RelayConfig;
use crate::error::{Error, Result};

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];
const EDGES_FIELD: &str = "edges";
const PAGE_INFO_FIELD: &str = "pageInfo";

/// A reference to a type, including its list / non-null wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// The innermost named type, with every wrapper stripped.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    fn from_parsed(ty: &Type) -> Self {
        let base = match &ty.base {
            BaseType::Named(name) => TypeRef::Named(name.to_string()),
            BaseType::List(inner) => TypeRef::list(Self::from_parsed(inner)),
        };
        if ty.nullable {
            base
        } else {
            TypeRef::non_null(base)
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    InputObject,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::InputObject => "input object",
        }
    }
}

/// What a field's return type means for selection: leaves take no
/// sub-selection, composites always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Scalar,
    Enum,
    Object,
    Interface,
}

impl Classification {
    pub fn is_leaf(self) -> bool {
        matches!(self, Classification::Scalar | Classification::Enum)
    }
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    /// Declared fields in declaration order (objects and interfaces only).
    pub fields: IndexMap<String, FieldDef>,
    /// Interfaces this type declares it implements.
    pub interfaces: Vec<String>,
    /// The type is the node interface or implements it.
    pub is_node: bool,
    /// The type is a relay connection (page of edges plus page info).
    pub is_connection: bool,
}

impl TypeDef {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: IndexMap::new(),
            interfaces: Vec::new(),
            is_node: false,
            is_connection: false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub arguments: IndexMap<String, ArgumentDef>,
}

impl FieldDef {
    /// A field with no arguments, used to expand a type on its own.
    pub fn synthetic(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: IndexMap::new(),
        }
    }

    fn from_parsed(definition: &FieldDefinition) -> Self {
        Self {
            name: definition.name.node.to_string(),
            ty: TypeRef::from_parsed(&definition.ty.node),
            arguments: definition
                .arguments
                .iter()
                .map(|argument| {
                    let argument = ArgumentDef::from_parsed(&argument.node);
                    (argument.name.clone(), argument)
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
}

impl ArgumentDef {
    fn from_parsed(definition: &InputValueDefinition) -> Self {
        Self {
            name: definition.name.node.to_string(),
            ty: TypeRef::from_parsed(&definition.ty.node),
            default_value: definition.default_value.as_ref().map(|v| v.node.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaModel {
    types: IndexMap<String, TypeDef>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl SchemaModel {
    /// Parse SDL and resolve relay markers.
    pub fn parse(sdl: &str, relay: &RelayConfig) -> Result<Self> {
        let document = async_graphql::parser::parse_schema(sdl)
            .map_err(|e| Error::SchemaParse(e.to_string()))?;
        Ok(Self::from_document(&document, relay))
    }

    pub fn from_document(document: &ServiceDocument, relay: &RelayConfig) -> Self {
        let mut types: IndexMap<String, TypeDef> = BUILTIN_SCALARS
            .iter()
            .map(|name| (name.to_string(), TypeDef::new(*name, TypeKind::Scalar)))
            .collect();
        let mut query_type = None;
        let mut mutation_type = None;

        for definition in &document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema) => {
                    if let Some(query) = &schema.node.query {
                        query_type = Some(query.node.to_string());
                    }
                    if let Some(mutation) = &schema.node.mutation {
                        mutation_type = Some(mutation.node.to_string());
                    }
                }
                TypeSystemDefinition::Type(definition) => {
                    let definition = &definition.node;
                    let name = definition.name.node.to_string();
                    let (kind, implements, fields) = match &definition.kind {
                        ParsedKind::Scalar => (TypeKind::Scalar, &[][..], &[][..]),
                        ParsedKind::Enum(_) => (TypeKind::Enum, &[][..], &[][..]),
                        ParsedKind::Union(_) => (TypeKind::Union, &[][..], &[][..]),
                        ParsedKind::InputObject(_) => (TypeKind::InputObject, &[][..], &[][..]),
                        ParsedKind::Object(object) => (
                            TypeKind::Object,
                            object.implements.as_slice(),
                            object.fields.as_slice(),
                        ),
                        ParsedKind::Interface(interface) => (
                            TypeKind::Interface,
                            interface.implements.as_slice(),
                            interface.fields.as_slice(),
                        ),
                    };

                    // Extensions merge into the base definition, whichever comes first.
                    let type_def = types
                        .entry(name.clone())
                        .or_insert_with(|| TypeDef::new(name, kind));
                    if !definition.extend {
                        type_def.kind = kind;
                    }
                    for interface in implements {
                        let interface = interface.node.to_string();
                        if !type_def.interfaces.contains(&interface) {
                            type_def.interfaces.push(interface);
                        }
                    }
                    for field in fields {
                        let field = FieldDef::from_parsed(&field.node);
                        type_def.fields.insert(field.name.clone(), field);
                    }
                }
                TypeSystemDefinition::Directive(_) => {}
            }
        }

        let query_type = query_type.or_else(|| Self::default_root(&types, "Query"));
        let mutation_type = mutation_type.or_else(|| Self::default_root(&types, "Mutation"));

        let mut model = Self {
            types,
            query_type,
            mutation_type,
        };
        model.resolve_markers(relay);
        model
    }

    fn default_root(types: &IndexMap<String, TypeDef>, name: &str) -> Option<String> {
        types
            .get(name)
            .filter(|t| t.kind == TypeKind::Object)
            .map(|t| t.name.clone())
    }

    fn resolve_markers(&mut self, relay: &RelayConfig) {
        let markers: Vec<(bool, bool)> = self
            .types
            .values()
            .map(|type_def| {
                let composite = matches!(type_def.kind, TypeKind::Object | TypeKind::Interface);
                let is_node = composite
                    && (type_def.name == relay.node_interface
                        || self.implements(type_def, &relay.node_interface, &mut Vec::new()));
                let is_connection = composite
                    && type_def.name.ends_with(&relay.connection_suffix)
                    && type_def.fields.contains_key(EDGES_FIELD)
                    && type_def.fields.contains_key(PAGE_INFO_FIELD);
                (is_node, is_connection)
            })
            .collect();

        for (type_def, (is_node, is_connection)) in self.types.values_mut().zip(markers) {
            type_def.is_node = is_node;
            type_def.is_connection = is_connection;
        }
    }

    /// Whether `type_def` implements `interface`, directly or through the
    /// interfaces it implements.
    fn implements<'a>(
        &'a self,
        type_def: &'a TypeDef,
        interface: &str,
        visited: &mut Vec<&'a str>,
    ) -> bool {
        for name in &type_def.interfaces {
            if name == interface {
                return true;
            }
            if visited.contains(&name.as_str()) {
                continue;
            }
            visited.push(name);
            if let Some(parent) = self.types.get(name) {
                if self.implements(parent, interface, visited) {
                    return true;
                }
            }
        }
        false
    }

    pub fn query_type(&self) -> Option<&TypeDef> {
        self.query_type.as_deref().and_then(|name| self.types.get(name))
    }

    pub fn mutation_type(&self) -> Option<&TypeDef> {
        self.mutation_type.as_deref().and_then(|name| self.types.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&TypeDef> {
        self.types
            .get(name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Concrete object types a value of `name` can have at runtime.
    pub fn possible_types<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TypeDef> + 'a {
        self.types.values().filter(move |candidate| {
            candidate.kind == TypeKind::Object
                && (candidate.name == name || self.implements(candidate, name, &mut Vec::new()))
        })
    }

    /// Classify the innermost named type of `ty`.
    pub fn classify(&self, ty: &TypeRef) -> Result<(Classification, &TypeDef)> {
        let type_def = self.lookup(ty.named_type())?;
        let classification = match type_def.kind {
            TypeKind::Scalar => Classification::Scalar,
            TypeKind::Enum => Classification::Enum,
            TypeKind::Object => Classification::Object,
            TypeKind::Interface => Classification::Interface,
            kind @ (TypeKind::Union | TypeKind::InputObject) => {
                return Err(Error::UnsupportedType {
                    type_name: type_def.name.clone(),
                    kind: kind.as_str(),
                })
            }
        };
        Ok((classification, type_def))
    }
}
