use async_graphql::*;

#[derive(Default)]
pub struct GreetingQuery;

#[Object]
impl GreetingQuery {
    async fn hello(&self, #[graphql(default = "stranger")] name: String) -> String {
        format!("Hello {name}")
    }
}
