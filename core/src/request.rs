//! Request compilation pipeline.
//!
//! # Design
//! `CompiledRequest::build` turns a `Payload` into a fully resolved,
//! immutable request description in a fixed step order: headers, parameters,
//! options, protocol restriction, then a merge of user transport tuning over
//! the defaults. The first unrecognized option name aborts the build before
//! any network activity; no partial request ever reaches the transport.
//! A compiled request is consumed exactly once by [`CompiledRequest::send`].

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::error::Error;
use crate::method::Method;
use crate::options::{self, BehaviorFlag, Directive, TransportKey, DEFAULT_HEADERS};
use crate::payload::Payload;
use crate::response::Response;
use crate::transport::Transport;

/// Fully resolved request description, ready for transport submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    pub method: Method,
    /// Target URL, with the query string merged in for non-POST methods.
    pub url: String,
    /// Ordered `"key: value"` header lines, defaults first. Duplicate names
    /// are both transmitted; the last one wins per HTTP convention.
    pub headers: Vec<String>,
    /// Form-encoded body, set only for POST.
    pub body: Option<String>,
    /// Transport tuning knobs, merged over the defaults (user values win).
    pub transport: BTreeMap<TransportKey, Value>,
    /// Flags interpreted by the wrapper itself.
    pub behavior: BTreeMap<BehaviorFlag, Value>,
}

impl CompiledRequest {
    /// Compile `payload` for `method`.
    ///
    /// Fails with [`Error::InvalidOption`] on the first unrecognized option
    /// name.
    pub fn build(method: Method, payload: Payload) -> Result<Self, Error> {
        let mut request = CompiledRequest {
            method,
            url: payload.url.clone(),
            headers: Vec::new(),
            body: None,
            transport: BTreeMap::new(),
            behavior: BTreeMap::new(),
        };

        request.add_headers(&payload);
        request.add_parameters(&payload)?;
        request.apply_options(&payload)?;

        // Redirects may only land on web protocols.
        request
            .transport
            .insert(TransportKey::Protocols, json!(["http", "https"]));

        // Merge user tuning over the defaults; user values win.
        let user = std::mem::take(&mut request.transport);
        let mut merged = options::default_transport_options();
        merged.extend(user);
        request.transport = merged;

        tracing::debug!(method = %request.method, url = %request.url, "compiled request");
        Ok(request)
    }

    /// Execute against `transport` and decode the result.
    ///
    /// Consumes the request; the returned [`Response`] keeps it for
    /// introspection.
    pub fn send<T: Transport>(self, transport: &T) -> Result<Response, Error> {
        let raw = transport.execute(&self)?;
        Response::decode(raw, self)
    }

    fn add_headers(&mut self, payload: &Payload) {
        self.headers
            .extend(DEFAULT_HEADERS.iter().map(|h| h.to_string()));
        // format a header as 'x-header: value'
        self.headers
            .extend(payload.headers.iter().map(|(k, v)| format!("{k}: {v}")));
    }

    fn add_parameters(&mut self, payload: &Payload) -> Result<(), Error> {
        if payload.parameters.is_empty() {
            return Ok(());
        }
        let encoded = serde_urlencoded::to_string(&payload.parameters)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if self.method == Method::Post {
            self.body = Some(encoded);
        } else {
            // append parameters to the url; no merge with an existing query
            self.url = format!("{}?{}", self.url, encoded);
        }
        Ok(())
    }

    fn apply_options(&mut self, payload: &Payload) -> Result<(), Error> {
        let options = &payload.options;
        if options.is_empty() {
            return Ok(());
        }

        // Basic-auth credential from the username/password pair. The pair
        // also resolves as behavior flags below, matching the option loop.
        if let (Some(user), Some(pass)) = (options.get("username"), options.get("password")) {
            let credential = format!(
                "{}:{}",
                options::value_to_string(user),
                options::value_to_string(pass)
            );
            self.transport
                .insert(TransportKey::UserPwd, Value::String(credential));
        }

        for (name, value) in options {
            match options::resolve(name)? {
                Directive::Transport(key) => {
                    self.transport.insert(key, value.clone());
                }
                Directive::Behavior(flag) => {
                    self.behavior.insert(flag, value.clone());
                }
            }
        }
        Ok(())
    }
}
