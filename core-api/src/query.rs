//! Query string encoding for filter structs

use crate::error::{ClientError, Result};
use serde::Serialize;
use serde_json::Value;

/// Encode a flat filter struct as `a=1&b=two`
///
/// Absent (`None`/null) fields are omitted. Arrays are joined with commas.
/// Nested objects are rejected.
pub fn to_query_string<Q: Serialize + ?Sized>(query: &Q) -> Result<String> {
    let value = serde_json::to_value(query)
        .map_err(|e| ClientError::Unknown(format!("Failed to encode query: {}", e)))?;

    let Value::Object(fields) = value else {
        return Err(ClientError::Unknown(
            "Query parameters must serialize to an object".to_string(),
        ));
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let Some(value) = scalar_to_string(&key, value)? else {
            continue;
        };
        pairs.push(format!(
            "{}={}",
            urlencoding::encode(&key),
            urlencoding::encode(&value)
        ));
    }

    Ok(pairs.join("&"))
}

fn scalar_to_string(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                if let Some(part) = scalar_to_string(key, item)? {
                    parts.push(part);
                }
            }
            if parts.is_empty() {
                Ok(None)
            } else {
                Ok(Some(parts.join(",")))
            }
        }
        Value::Object(_) => Err(ClientError::Unknown(format!(
            "Query parameter '{}' cannot be an object",
            key
        ))),
    }
}
