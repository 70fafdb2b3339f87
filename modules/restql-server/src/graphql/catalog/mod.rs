pub mod types;

use std::sync::Arc;

use async_graphql::*;
use restql_core::GlobalId;

use crate::graphql::error;
use crate::graphql::pagination::{paginate, OffsetConnection};
use crate::store::Library;
use types::{Author, Book, Node, Publisher};

#[derive(Default)]
pub struct CatalogQuery;

#[Object]
impl CatalogQuery {
    /// Fetch any catalog object by its global id.
    async fn node(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Node>> {
        let global_id =
            GlobalId::decode(&id).map_err(|e| error::bad_request(format!("invalid id: {e}")))?;
        let Ok(pk) = global_id.raw_id.parse::<u32>() else {
            return Ok(None);
        };
        tracing::info!(type_name = global_id.type_name.as_str(), pk, "graphql.node");

        let library = ctx.data_unchecked::<Arc<Library>>();
        let node = match global_id.type_name.as_str() {
            "Book" => library.book(pk).map(|b| Node::Book(b.into())),
            "Author" => library.author(pk).map(|a| Node::Author(a.into())),
            "Publisher" => library.publisher(pk).map(|p| Node::Publisher(p.into())),
            _ => None,
        };
        Ok(node)
    }

    async fn books(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
    ) -> Result<OffsetConnection<Book>> {
        tracing::info!(first = ?first, "graphql.books");
        let library = ctx.data_unchecked::<Arc<Library>>();
        let books = library.books().iter().map(Book::from).collect();
        paginate(books, after, first).await
    }

    async fn authors(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
    ) -> Result<OffsetConnection<Author>> {
        let library = ctx.data_unchecked::<Arc<Library>>();
        let authors = library.authors().iter().map(Author::from).collect();
        paginate(authors, after, first).await
    }

    async fn publishers(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
    ) -> Result<OffsetConnection<Publisher>> {
        let library = ctx.data_unchecked::<Arc<Library>>();
        let publishers = library.publishers().iter().map(Publisher::from).collect();
        paginate(publishers, after, first).await
    }
}
