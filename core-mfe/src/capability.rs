//! Named JSON-in/JSON-out async functions a module exposes to its host

use crate::error::{MfeError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type CapabilityFn = dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// Capability name to handler
#[derive(Clone, Default)]
pub struct CapabilityMap {
    entries: BTreeMap<String, Arc<CapabilityFn>>,
}

impl CapabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a capability
    pub fn insert<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let handler: Arc<CapabilityFn> = Arc::new(move |args| handler(args).boxed());
        self.entries.insert(name.into(), handler);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.insert(name, handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Capability names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call a capability; `None` when no capability has that name
    pub fn call(&self, name: &str, args: Value) -> Option<BoxFuture<'static, Result<Value>>> {
        self.entries.get(name).map(|handler| handler(args))
    }
}

impl fmt::Debug for CapabilityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityMap")
            .field("capabilities", &self.names())
            .finish()
    }
}

/// Decode capability arguments into a typed struct
///
/// `null` decodes as if an empty object was passed, so argument structs
/// with all-optional fields accept a bare call.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| MfeError::InvalidArguments(e.to_string()))
}

/// Encode a capability result
pub fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| MfeError::Invocation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Echo {
        #[serde(default)]
        text: Option<String>,
    }

    #[tokio::test]
    async fn test_insert_and_call() {
        let map = CapabilityMap::new()
            .with("echo", |args| async move {
                let echo: Echo = parse_args(args)?;
                Ok(json!({ "text": echo.text.unwrap_or_default() }))
            })
            .with("fail", |_| async { Err(MfeError::Invocation("nope".into())) });

        assert_eq!(map.names(), vec!["echo", "fail"]);

        let out = map.call("echo", json!({ "text": "hi" })).unwrap().await.unwrap();
        assert_eq!(out, json!({ "text": "hi" }));

        let out = map.call("echo", Value::Null).unwrap().await.unwrap();
        assert_eq!(out, json!({ "text": "" }));

        assert!(map.call("fail", Value::Null).unwrap().await.is_err());
        assert!(map.call("missing", Value::Null).is_none());
    }

    #[test]
    fn test_parse_args_rejects_wrong_shape() {
        let parsed: Result<Echo> = parse_args(json!({ "text": 5 }));
        assert!(matches!(parsed, Err(MfeError::InvalidArguments(_))));
    }
}
