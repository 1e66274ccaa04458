//! Fluent convenience wrapper over a pluggable HTTP transport.
//!
//! # Overview
//! Compiles a caller-supplied [`Payload`] (url, headers, parameters,
//! free-form options) into an immutable [`CompiledRequest`], executes it
//! through a [`Transport`], and normalizes the result into a [`Response`]
//! with format-aware body decoding (JSON, XML, plain text).
//!
//! # Design
//! - Option names route through two disjoint constant tables: transport
//!   tuning knobs forwarded to the backend, behavior flags interpreted by
//!   the wrapper itself. The first unknown name aborts the build before any
//!   I/O.
//! - A `CompiledRequest` is built once, immutable after construction, and
//!   consumed exactly once by `send`; the `Response` keeps it for
//!   introspection.
//! - The default transport wraps `ureq`; the `Transport` trait keeps the
//!   build and decode pipeline testable without a network.

pub mod client;
pub mod error;
pub mod method;
pub mod options;
pub mod payload;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Client;
pub use error::Error;
pub use method::Method;
pub use options::{resolve, BehaviorFlag, Directive, TransportKey, DEFAULT_USER_AGENT};
pub use payload::Payload;
pub use request::CompiledRequest;
pub use response::{Body, Response};
pub use transport::{RawResult, Transport, UreqTransport};
