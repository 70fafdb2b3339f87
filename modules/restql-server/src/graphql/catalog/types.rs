use std::sync::Arc;

use async_graphql::*;
use chrono::{DateTime, Utc};
use restql_core::GlobalId;

use crate::graphql::pagination::{paginate, OffsetConnection};
use crate::store::{AuthorRecord, BookRecord, Library, PublisherRecord};

fn global_id(type_name: &str, id: u32) -> ID {
    ID(GlobalId::new(type_name, id.to_string()).encode())
}

/// Anything fetchable by global id through `node(id:)`.
#[derive(Interface, Clone)]
#[graphql(field(name = "id", ty = "&ID"))]
pub enum Node {
    Book(Book),
    Author(Author),
    Publisher(Publisher),
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Publisher {
    pub id: ID,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub pk: u32,
}

impl From<&PublisherRecord> for Publisher {
    fn from(p: &PublisherRecord) -> Self {
        Self {
            id: global_id("Publisher", p.id),
            name: p.name.clone(),
            created_at: p.created_at,
            pk: p.id,
        }
    }
}

#[ComplexObject]
impl Publisher {
    async fn books(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
    ) -> Result<OffsetConnection<Book>> {
        let library = ctx.data_unchecked::<Arc<Library>>();
        let books = library
            .books_by_publisher(self.pk)
            .into_iter()
            .map(Book::from)
            .collect();
        paginate(books, after, first).await
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Author {
    pub id: ID,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub pk: u32,
}

impl From<&AuthorRecord> for Author {
    fn from(a: &AuthorRecord) -> Self {
        Self {
            id: global_id("Author", a.id),
            name: a.name.clone(),
            created_at: a.created_at,
            pk: a.id,
        }
    }
}

#[ComplexObject]
impl Author {
    async fn books(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
    ) -> Result<OffsetConnection<Book>> {
        let library = ctx.data_unchecked::<Arc<Library>>();
        let books = library
            .books_by_author(self.pk)
            .into_iter()
            .map(Book::from)
            .collect();
        paginate(books, after, first).await
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Book {
    pub id: ID,
    pub title: String,
    #[graphql(skip)]
    pub pk: u32,
    #[graphql(skip)]
    pub publisher_id: Option<u32>,
}

impl From<&BookRecord> for Book {
    fn from(b: &BookRecord) -> Self {
        Self {
            id: global_id("Book", b.id),
            title: b.title.clone(),
            pk: b.id,
            publisher_id: b.publisher_id,
        }
    }
}

#[ComplexObject]
impl Book {
    async fn publisher(&self, ctx: &Context<'_>) -> Option<Publisher> {
        let library = ctx.data_unchecked::<Arc<Library>>();
        self.publisher_id
            .and_then(|id| library.publisher(id))
            .map(Publisher::from)
    }

    async fn authors(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
    ) -> Result<OffsetConnection<Author>> {
        let library = ctx.data_unchecked::<Arc<Library>>();
        let authors = library
            .book(self.pk)
            .map(|book| library.authors_of(book))
            .unwrap_or_default()
            .into_iter()
            .map(Author::from)
            .collect();
        paginate(authors, after, first).await
    }
}
