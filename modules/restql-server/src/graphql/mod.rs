pub mod catalog;
pub mod error;
pub mod greeting;
pub mod pagination;
pub mod people;

use std::sync::Arc;

use async_graphql::*;

use crate::config::GraphqlConfig;
use crate::store::Library;

/// Merged query root composing all domain query modules.
#[derive(MergedObject, Default)]
pub struct QueryRoot(catalog::CatalogQuery, greeting::GreetingQuery);

/// Merged mutation root composing all domain mutation modules.
#[derive(MergedObject, Default)]
pub struct MutationRoot(people::PeopleMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(library: Arc<Library>, config: &GraphqlConfig) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(library)
        .limit_depth(config.limit_depth)
        .limit_complexity(config.limit_complexity)
        .finish()
}
