//! In-memory catalog backing the demo schema.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct PublisherRecord {
    pub id: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthorRecord {
    pub id: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: u32,
    pub title: String,
    pub publisher_id: Option<u32>,
    pub author_ids: Vec<u32>,
}

/// Read-only after construction; shared between requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Library {
    publishers: Vec<PublisherRecord>,
    authors: Vec<AuthorRecord>,
    books: Vec<BookRecord>,
}

impl Library {
    pub fn new(
        publishers: Vec<PublisherRecord>,
        authors: Vec<AuthorRecord>,
        books: Vec<BookRecord>,
    ) -> Self {
        Self {
            publishers,
            authors,
            books,
        }
    }

    /// Two publishers, two authors and one book for each.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let publishers = vec![
            PublisherRecord {
                id: 1,
                name: "Packt".to_string(),
                created_at: now,
            },
            PublisherRecord {
                id: 2,
                name: "O'Reilly Media".to_string(),
                created_at: now,
            },
        ];
        let authors = vec![
            AuthorRecord {
                id: 1,
                name: "Tarek Ziade".to_string(),
                created_at: now,
            },
            AuthorRecord {
                id: 2,
                name: "David Mertz".to_string(),
                created_at: now,
            },
        ];
        let books = vec![
            BookRecord {
                id: 1,
                title: "Python Microservices Development".to_string(),
                publisher_id: Some(1),
                author_ids: vec![1],
            },
            BookRecord {
                id: 2,
                title: "Functional Programming in Python".to_string(),
                publisher_id: Some(2),
                author_ids: vec![2],
            },
        ];
        Self::new(publishers, authors, books)
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn authors(&self) -> &[AuthorRecord] {
        &self.authors
    }

    pub fn publishers(&self) -> &[PublisherRecord] {
        &self.publishers
    }

    pub fn book(&self, id: u32) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn author(&self, id: u32) -> Option<&AuthorRecord> {
        self.authors.iter().find(|a| a.id == id)
    }

    pub fn publisher(&self, id: u32) -> Option<&PublisherRecord> {
        self.publishers.iter().find(|p| p.id == id)
    }

    pub fn authors_of(&self, book: &BookRecord) -> Vec<&AuthorRecord> {
        book.author_ids
            .iter()
            .filter_map(|id| self.author(*id))
            .collect()
    }

    pub fn books_by_author(&self, author_id: u32) -> Vec<&BookRecord> {
        self.books
            .iter()
            .filter(|b| b.author_ids.contains(&author_id))
            .collect()
    }

    pub fn books_by_publisher(&self, publisher_id: u32) -> Vec<&BookRecord> {
        self.books
            .iter()
            .filter(|b| b.publisher_id == Some(publisher_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_resolve_both_ways() {
        let library = Library::seeded();
        let book = library.book(1).unwrap();
        let authors: Vec<_> = library.authors_of(book).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(authors, vec!["Tarek Ziade"]);

        let titles: Vec<_> = library
            .books_by_publisher(2)
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Functional Programming in Python"]);
        assert_eq!(library.books_by_author(2).len(), 1);
        assert!(library.book(99).is_none());
    }
}
