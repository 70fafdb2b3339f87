use async_graphql::*;

#[derive(SimpleObject, Clone)]
pub struct Person {
    pub name: Option<String>,
    pub age: Option<i32>,
}

#[derive(SimpleObject)]
pub struct CreatePersonPayload {
    pub person: Person,
    pub ok: bool,
}

#[derive(Default)]
pub struct PeopleMutation;

#[Object]
impl PeopleMutation {
    /// Echo a person back; nothing is persisted.
    async fn create_person(
        &self,
        name: Option<String>,
        age: Option<i32>,
    ) -> Option<CreatePersonPayload> {
        tracing::info!(has_name = name.is_some(), age = ?age, "graphql.create_person");
        Some(CreatePersonPayload {
            person: Person { name, age },
            ok: true,
        })
    }
}
