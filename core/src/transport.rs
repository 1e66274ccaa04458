//! Transport seam and the ureq-backed default executor.
//!
//! # Design
//! `CompiledRequest` carries transport tuning declaratively; this module
//! maps the merged tuning table onto a per-request `ureq::Agent`. The
//! `Transport` trait keeps the pipeline testable without a network, and is
//! the only place where I/O happens. Transport errors are passed through
//! without retry.

use std::time::Duration;

use base64::engine::general_purpose;
use base64::Engine as _;
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::options::{self, TransportKey};
use crate::request::CompiledRequest;

/// Raw transport result, before decoding.
#[derive(Debug, Clone)]
pub struct RawResult {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Content type declared by the server, if any.
    pub content_type: Option<String>,
}

/// Executes a compiled request against the network.
pub trait Transport {
    fn execute(&self, request: &CompiledRequest) -> Result<RawResult, Error>;
}

/// Default transport backed by `ureq`.
///
/// Builds a fresh agent per request from the compiled tuning table, so
/// per-request options never leak between invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &CompiledRequest) -> Result<RawResult, Error> {
        check_protocol(request)?;

        let agent = build_agent(request);
        let http_request = to_http_request(request)?;

        tracing::debug!(method = %request.method, url = %request.url, "executing request");
        let mut response = agent.run(http_request).map_err(Error::from)?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();
        let content_type = response
            .headers()
            .get(ureq::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.body_mut().read_to_string().map_err(Error::from)?;

        Ok(RawResult {
            status,
            headers,
            body,
            content_type,
        })
    }
}

/// Reject URLs whose scheme falls outside the compiled protocol set before
/// any I/O happens.
fn check_protocol(request: &CompiledRequest) -> Result<(), Error> {
    let parsed = Url::parse(&request.url).map_err(|e| Error::InvalidUrl {
        url: request.url.clone(),
        reason: e.to_string(),
    })?;

    let allowed = request
        .transport
        .get(&TransportKey::Protocols)
        .and_then(Value::as_array);
    let scheme_allowed = match allowed {
        Some(schemes) => schemes.iter().any(|s| s.as_str() == Some(parsed.scheme())),
        None => matches!(parsed.scheme(), "http" | "https"),
    };
    if !scheme_allowed {
        return Err(Error::InvalidUrl {
            url: request.url.clone(),
            reason: format!("scheme '{}' is not allowed", parsed.scheme()),
        });
    }
    Ok(())
}

/// Map the compiled tuning table onto an agent configuration.
fn build_agent(request: &CompiledRequest) -> ureq::Agent {
    let opts = &request.transport;
    let mut config = ureq::Agent::config_builder();

    if let Some(ua) = opts.get(&TransportKey::UserAgent).and_then(Value::as_str) {
        config = config.user_agent(ua);
    }
    if let Some(secs) = opts.get(&TransportKey::Timeout).and_then(Value::as_u64) {
        config = config.timeout_global(Some(Duration::from_secs(secs)));
    }
    if let Some(secs) = opts.get(&TransportKey::ConnectTimeout).and_then(Value::as_u64) {
        config = config.timeout_connect(Some(Duration::from_secs(secs)));
    }
    if let Some(value) = opts.get(&TransportKey::FollowRedirects) {
        config = config.max_redirects(if truthy(value) { 10 } else { 0 });
    }
    if let Some(value) = opts.get(&TransportKey::FailOnError) {
        config = config.http_status_as_error(truthy(value));
    }

    let verify_ssl = opts.get(&TransportKey::VerifySsl).map(truthy).unwrap_or(true);
    let verify_host = opts.get(&TransportKey::VerifyHost).map(truthy).unwrap_or(true);
    if !verify_ssl || !verify_host {
        config = config.tls_config(
            ureq::tls::TlsConfig::builder()
                .disable_verification(true)
                .build(),
        );
    }

    if opts.contains_key(&TransportKey::CookieJar) || opts.contains_key(&TransportKey::CookieFile) {
        tracing::warn!("file-based cookie persistence is not supported by this transport");
    }

    config.build().new_agent()
}

/// Assemble the wire request: compiled headers, credential and cookie
/// headers derived from the tuning table, then the body.
fn to_http_request(request: &CompiledRequest) -> Result<ureq::http::Request<Vec<u8>>, Error> {
    let mut builder = ureq::http::Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str());

    if request.body.is_some() && !has_header(&request.headers, "content-type") {
        builder = builder.header("Content-Type", "application/x-www-form-urlencoded");
    }
    for line in &request.headers {
        if let Some((name, value)) = line.split_once(':') {
            builder = builder.header(name.trim(), value.trim());
        }
    }

    if let Some(credential) = request.transport.get(&TransportKey::UserPwd).and_then(Value::as_str) {
        let encoded = general_purpose::STANDARD.encode(credential);
        builder = builder.header("Authorization", format!("Basic {encoded}"));
    }
    if let Some(cookies) = request.transport.get(&TransportKey::Cookies) {
        builder = builder.header("Cookie", options::value_to_string(cookies));
    }
    if let Some(encoding) = request.transport.get(&TransportKey::Encoding).and_then(Value::as_str) {
        if !encoding.is_empty() {
            builder = builder.header("Accept-Encoding", encoding);
        }
    }

    let body = request.body.clone().map(String::into_bytes).unwrap_or_default();
    builder
        .body(body)
        .map_err(|e| Error::Transport(e.to_string()))
}

fn has_header(headers: &[String], name: &str) -> bool {
    headers.iter().any(|line| {
        line.split_once(':')
            .map(|(n, _)| n.trim().eq_ignore_ascii_case(name))
            .unwrap_or(false)
    })
}

/// Truthiness the way loosely typed option values arrive: booleans as-is,
/// numbers as nonzero, strings as nonempty.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        _ => true,
    }
}
