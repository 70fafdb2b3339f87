use async_graphql::{ObjectType, Schema, SubscriptionType, Variables};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::adapter::RequestVariables;
use crate::document::OperationDocument;

/// The GraphQL schema and executor the bridge sits in front of.
#[async_trait]
pub trait GraphQLEngine: Send + Sync + 'static {
    /// Schema definition language for the whole schema.
    fn sdl(&self) -> String;

    async fn execute(
        &self,
        document: &OperationDocument,
        variables: RequestVariables,
    ) -> ExecutionResult;
}

#[async_trait]
impl<Query, Mutation, Subscription> GraphQLEngine for Schema<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    fn sdl(&self) -> String {
        Schema::sdl(self)
    }

    async fn execute(
        &self,
        document: &OperationDocument,
        variables: RequestVariables,
    ) -> ExecutionResult {
        let variables = Variables::from_json(JsonValue::Object(variables.into_json()));
        let request = async_graphql::Request::new(document.to_string()).variables(variables);
        Schema::execute(self, request).await.into()
    }
}

/// Data and errors as returned to the HTTP caller.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ExecutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonValue>,
    /// The document was rejected before execution (errors and no data).
    #[serde(skip)]
    pub invalid: bool,
}

impl ExecutionResult {
    /// 400 for a rejected document, 200 otherwise. Field errors alongside
    /// data are part of a normal response.
    pub fn status_code(&self) -> StatusCode {
        if self.invalid {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<async_graphql::Response> for ExecutionResult {
    fn from(response: async_graphql::Response) -> Self {
        // Parse and validation errors carry no path; resolver errors always
        // do, even when a non-null root field nulls out all of `data`.
        let invalid = response.data == async_graphql::Value::Null
            && !response.errors.is_empty()
            && response.errors.iter().all(|error| error.path.is_empty());

        let data = match response.data {
            async_graphql::Value::Null => None,
            data => match data.into_json() {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!(error = %e, "Dropping response data that is not valid JSON");
                    None
                }
            },
        };
        let errors = response
            .errors
            .iter()
            .map(|error| {
                serde_json::to_value(error).unwrap_or_else(|e| {
                    warn!(error = %e, message = %error.message, "Failed to serialize GraphQL error");
                    serde_json::json!({ "message": error.message })
                })
            })
            .collect();

        Self {
            data,
            errors,
            invalid,
        }
    }
}
