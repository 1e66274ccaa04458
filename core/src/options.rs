//! Option routing tables and transport defaults.
//!
//! # Design
//! Every name accepted in `Payload::options` lives in exactly one of two
//! constant tables: transport options are forwarded to the HTTP backend as
//! tuning knobs, behavior flags are interpreted by the wrapper itself.
//! Lookup is exact and case-sensitive, transport table first; an unknown
//! name fails resolution. The tables are process-wide constants, never
//! mutated after initialization, and their disjointness is asserted by a
//! test.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::error::Error;

/// Tuning knob forwarded to the HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransportKey {
    UserAgent,
    Timeout,
    ConnectTimeout,
    Encoding,
    FollowRedirects,
    FailOnError,
    VerifySsl,
    VerifyHost,
    Cookies,
    CookieJar,
    CookieFile,
    /// Combined `"username:password"` basic-auth credential. Set by the
    /// build pipeline, not resolvable from a user option name.
    UserPwd,
    /// Referer propagation on redirects. Default-only.
    AutoReferer,
    /// Schemes the transport may talk to. Set by the build pipeline.
    Protocols,
}

/// Flag interpreted by the wrapper itself, never forwarded to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BehaviorFlag {
    AutoFormat,
    Username,
    Password,
    ReturnStatus,
    ReturnContentType,
    BodyFormat,
}

/// Classification of a user-supplied option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Transport(TransportKey),
    Behavior(BehaviorFlag),
}

/// Option names routed to the transport.
pub(crate) const TRANSPORT_OPTIONS: &[(&str, TransportKey)] = &[
    ("user_agent", TransportKey::UserAgent),
    ("ua", TransportKey::UserAgent), // alias
    ("timeout", TransportKey::Timeout),
    ("connect_timeout", TransportKey::ConnectTimeout),
    ("encoding", TransportKey::Encoding),
    ("follow_redirects", TransportKey::FollowRedirects),
    ("fail_on_error", TransportKey::FailOnError),
    ("verify_ssl", TransportKey::VerifySsl),
    ("verify_host", TransportKey::VerifyHost),
    ("cookies", TransportKey::Cookies),
    ("cookiejar", TransportKey::CookieJar),
    ("cookie_file", TransportKey::CookieFile),
];

/// Option names interpreted by the wrapper.
pub(crate) const BEHAVIOR_FLAGS: &[(&str, BehaviorFlag)] = &[
    ("auto_format", BehaviorFlag::AutoFormat),
    ("username", BehaviorFlag::Username),
    ("password", BehaviorFlag::Password),
    ("return_status", BehaviorFlag::ReturnStatus),
    ("return_content_type", BehaviorFlag::ReturnContentType),
    ("body_format", BehaviorFlag::BodyFormat),
];

/// Classify `name` as a transport option or behavior flag.
///
/// Transport table wins by construction; the tables are disjoint.
pub fn resolve(name: &str) -> Result<Directive, Error> {
    if let Some((_, key)) = TRANSPORT_OPTIONS.iter().find(|(n, _)| *n == name) {
        return Ok(Directive::Transport(*key));
    }
    if let Some((_, flag)) = BEHAVIOR_FLAGS.iter().find(|(n, _)| *n == name) {
        return Ok(Directive::Behavior(*flag));
    }
    Err(Error::InvalidOption(name.to_string()))
}

/// User agent sent when no `user_agent`/`ua` option overrides it.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Sling Http Client";

/// Headers always placed ahead of user headers in the compiled sequence.
pub(crate) const DEFAULT_HEADERS: &[&str] = &["Accept: */*"];

/// Transport configuration applied under user-supplied values; user options
/// win on key collision.
pub fn default_transport_options() -> BTreeMap<TransportKey, Value> {
    BTreeMap::from([
        (TransportKey::FollowRedirects, Value::Bool(true)),
        (TransportKey::Encoding, Value::String(String::new())),
        (TransportKey::ConnectTimeout, json!(60)),
        (TransportKey::Timeout, json!(300)),
        (TransportKey::AutoReferer, Value::Bool(true)),
        (TransportKey::FailOnError, Value::Bool(true)),
        (
            TransportKey::UserAgent,
            Value::String(DEFAULT_USER_AGENT.to_string()),
        ),
    ])
}

/// Render an option value the way it appears in a header or credential:
/// strings verbatim, everything else in JSON notation.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
