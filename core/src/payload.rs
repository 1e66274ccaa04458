//! Caller-supplied request configuration.

use std::collections::BTreeMap;

use serde_json::Value;

/// Configuration bundle for a single request: target URL, headers, query or
/// body parameters, and free-form options.
///
/// Option keys are the enumerated names from [`crate::options`]; any other
/// key fails the build. `BTreeMap` keeps iteration order deterministic so
/// compiling the same payload twice yields identical requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub parameters: BTreeMap<String, String>,
    pub options: BTreeMap<String, Value>,
}

impl Payload {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluent_helpers_fill_the_maps() {
        let payload = Payload::new("http://localhost")
            .header("X-Trace", "1")
            .param("q", "rust")
            .option("timeout", 5);

        assert_eq!(payload.url, "http://localhost");
        assert_eq!(payload.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert_eq!(payload.parameters.get("q").map(String::as_str), Some("rust"));
        assert_eq!(payload.options.get("timeout"), Some(&Value::from(5)));
    }

    #[test]
    fn maps_default_to_empty() {
        let payload = Payload::new("http://localhost");
        assert!(payload.headers.is_empty());
        assert!(payload.parameters.is_empty());
        assert!(payload.options.is_empty());
    }
}
