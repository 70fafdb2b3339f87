use crate::document::{VariableDefinition, VariableType};
use crate::schema::{ArgumentDef, TypeRef};

/// Mirror an argument's wrappers onto a variable type, outermost first.
pub fn translate(ty: &TypeRef) -> VariableType {
    match ty {
        TypeRef::Named(name) => VariableType::Named(name.clone()),
        TypeRef::NonNull(inner) => VariableType::NonNull(Box::new(translate(inner))),
        TypeRef::List(inner) => VariableType::List(Box::new(translate(inner))),
    }
}

/// Variable bound to `argument`, named after it and carrying its default.
pub fn variable_definition(argument: &ArgumentDef) -> VariableDefinition {
    VariableDefinition {
        name: argument.name.clone(),
        ty: translate(&argument.ty),
        default_value: argument.default_value.clone(),
    }
}
