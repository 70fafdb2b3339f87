use async_graphql::{Error, ErrorExtensions};

pub fn bad_request(message: impl Into<String>) -> Error {
    Error::new(message.into()).extend_with(|_, e| e.set("code", "BAD_REQUEST"))
}
