pub mod config;
pub mod graphql;
pub mod routes;
pub mod store;
