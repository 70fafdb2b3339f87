//! Offset pagination over in-memory slices, with relay-style opaque cursors.

use async_graphql::connection::{query, Connection, CursorType, Edge};
use async_graphql::{OutputType, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const CURSOR_PREFIX: &str = "arrayconnection:";
const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// Position of an item in the full result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor(pub usize);

#[derive(Error, Debug)]
pub enum CursorError {
    #[error("invalid cursor encoding")]
    Encoding,
    #[error("malformed cursor")]
    Malformed,
}

impl CursorType for OffsetCursor {
    type Error = CursorError;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        let bytes = STANDARD.decode(s).map_err(|_| CursorError::Encoding)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::Encoding)?;
        text.strip_prefix(CURSOR_PREFIX)
            .and_then(|offset| offset.parse().ok())
            .map(OffsetCursor)
            .ok_or(CursorError::Malformed)
    }

    fn encode_cursor(&self) -> String {
        STANDARD.encode(format!("{CURSOR_PREFIX}{}", self.0))
    }
}

pub type OffsetConnection<T> = Connection<OffsetCursor, T>;

/// Page through `items` forward from `after`, `first` items at a time.
pub async fn paginate<T: OutputType>(
    items: Vec<T>,
    after: Option<String>,
    first: Option<i32>,
) -> Result<OffsetConnection<T>> {
    query(
        after,
        None::<String>,
        first,
        None::<i32>,
        |after: Option<OffsetCursor>, _before: Option<OffsetCursor>, first, _last| async move {
            let total = items.len();
            let start = after.map(|c| c.0 + 1).unwrap_or(0).min(total);
            let limit = first.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
            let end = (start + limit).min(total);

            let mut connection = Connection::new(start > 0, end < total);
            connection.edges.extend(
                items
                    .into_iter()
                    .enumerate()
                    .skip(start)
                    .take(end - start)
                    .map(|(offset, item)| Edge::new(OffsetCursor(offset), item)),
            );
            Ok::<_, async_graphql::Error>(connection)
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursors_round_trip_through_base64() {
        let cursor = OffsetCursor(3);
        assert_eq!(cursor.encode_cursor(), "YXJyYXljb25uZWN0aW9uOjM=");
        assert_eq!(OffsetCursor::decode_cursor("YXJyYXljb25uZWN0aW9uOjM=").unwrap(), cursor);
        assert!(matches!(
            OffsetCursor::decode_cursor("bm9wZQ=="),
            Err(CursorError::Malformed)
        ));
        assert!(matches!(
            OffsetCursor::decode_cursor("%%%"),
            Err(CursorError::Encoding)
        ));
    }

    #[tokio::test]
    async fn pages_forward_from_the_cursor() {
        let items: Vec<i32> = (0..5).collect();

        let page = paginate(items.clone(), None, Some(2)).await.unwrap();
        assert_eq!(page.edges.iter().map(|e| e.node).collect::<Vec<_>>(), vec![0, 1]);
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);

        let after = OffsetCursor(1).encode_cursor();
        let page = paginate(items.clone(), Some(after), Some(10)).await.unwrap();
        assert_eq!(page.edges.iter().map(|e| e.node).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(!page.has_next_page);
        assert!(page.has_previous_page);

        let past_the_end = OffsetCursor(40).encode_cursor();
        let page = paginate(items, Some(past_the_end), None).await.unwrap();
        assert!(page.edges.is_empty());
    }
}
