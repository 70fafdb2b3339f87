//! Turns an HTTP request into variable values for the endpoint's arguments.

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::ArgumentBinding;
use crate::schema::{TypeKind, TypeRef};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestVariables {
    /// Values keyed by argument name.
    Map(Map<String, JsonValue>),
    /// A POST body of a type the adapter does not decode, passed through as is.
    Raw(Bytes),
}

impl RequestVariables {
    pub fn empty() -> Self {
        RequestVariables::Map(Map::new())
    }

    /// Variables as a JSON object. A raw body is used only when it happens to
    /// hold a JSON object.
    pub fn into_json(self) -> Map<String, JsonValue> {
        match self {
            RequestVariables::Map(values) => values,
            RequestVariables::Raw(body) => match serde_json::from_slice(&body) {
                Ok(JsonValue::Object(values)) => values,
                _ => Map::new(),
            },
        }
    }
}

/// Extract variables from the query string (`GET`) or body (`POST`).
///
/// `HEAD` is served by `GET` routes and reads the query string too. Any other
/// method is a routing error.
pub fn extract_variables(
    method: &Method,
    headers: &HeaderMap,
    query: Option<&str>,
    body: Bytes,
    arguments: &[ArgumentBinding],
) -> Result<RequestVariables> {
    if *method == Method::GET || *method == Method::HEAD {
        let pairs = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes());
        return Ok(RequestVariables::Map(coerce_pairs(pairs, arguments)));
    }
    if *method != Method::POST {
        return Err(Error::UnsupportedMethod(method.clone()));
    }

    let content_type = media_type(headers);
    if is_json(&content_type) {
        return decode_json(&body).map(RequestVariables::Map);
    }
    if content_type == FORM_CONTENT_TYPE {
        let pairs = url::form_urlencoded::parse(&body);
        return Ok(RequestVariables::Map(coerce_pairs(pairs, arguments)));
    }
    Ok(RequestVariables::Raw(body))
}

/// Media type without parameters, lowercased.
fn media_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

fn decode_json(body: &[u8]) -> Result<Map<String, JsonValue>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body)? {
        JsonValue::Object(values) => Ok(values),
        _ => Err(Error::BodyNotObject),
    }
}

fn coerce_pairs(
    pairs: url::form_urlencoded::Parse<'_>,
    arguments: &[ArgumentBinding],
) -> Map<String, JsonValue> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, value) in pairs {
        grouped
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    let mut values = Map::new();
    for (key, raw) in grouped {
        match arguments.iter().find(|argument| argument.name == key) {
            Some(argument) => {
                values.insert(key, coerce(&argument.ty, argument.kind, raw));
            }
            None => debug!(key = key.as_str(), "Ignoring parameter with no matching argument"),
        }
    }
    values
}

/// Coerce the raw values given for one key to the argument's type. Values
/// that fail to parse stay strings and the engine reports them.
fn coerce(ty: &TypeRef, kind: TypeKind, mut raw: Vec<String>) -> JsonValue {
    match ty {
        TypeRef::NonNull(inner) => coerce(inner, kind, raw),
        TypeRef::List(inner) => {
            if let [single] = raw.as_slice() {
                if let Ok(JsonValue::Array(items)) = serde_json::from_str(single) {
                    return JsonValue::Array(items);
                }
            }
            // Repeated keys fill one list level; each value is coerced to the
            // item type, so nested lists take a JSON array per key.
            JsonValue::Array(
                raw.into_iter()
                    .map(|value| coerce(inner, kind, vec![value]))
                    .collect(),
            )
        }
        TypeRef::Named(name) => {
            // Repeated keys on a non-list argument: last one wins.
            let value = raw.pop().unwrap_or_default();
            coerce_scalar(name, kind, value)
        }
    }
}

fn coerce_scalar(type_name: &str, kind: TypeKind, raw: String) -> JsonValue {
    let parsed = match (kind, type_name) {
        (TypeKind::Scalar, "Int") => raw.parse::<i64>().ok().map(JsonValue::from),
        (TypeKind::Scalar, "Float") => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number),
        (TypeKind::Scalar, "Boolean") => raw.parse::<bool>().ok().map(JsonValue::Bool),
        (TypeKind::InputObject, _) => match serde_json::from_str(&raw) {
            Ok(JsonValue::Object(object)) => Some(JsonValue::Object(object)),
            _ => None,
        },
        _ => None,
    };
    parsed.unwrap_or(JsonValue::String(raw))
}
