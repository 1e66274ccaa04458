//! Fluent entry points binding the pipeline to a transport.

use crate::error::Error;
use crate::method::Method;
use crate::payload::Payload;
use crate::request::CompiledRequest;
use crate::response::Response;
use crate::transport::{Transport, UreqTransport};

/// Convenience client: compiles a payload, executes it through the bound
/// transport, and decodes the result.
///
/// Each call builds its own [`CompiledRequest`]; the client holds no mutable
/// state between invocations, so one client may serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Client<T = UreqTransport> {
    transport: T,
}

impl Client<UreqTransport> {
    /// Client backed by the default `ureq` transport.
    pub fn new() -> Self {
        Self {
            transport: UreqTransport,
        }
    }
}

impl<T: Transport> Client<T> {
    /// Client backed by a caller-supplied transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Build, send and decode one request.
    pub fn request(&self, method: Method, payload: Payload) -> Result<Response, Error> {
        CompiledRequest::build(method, payload)?.send(&self.transport)
    }

    pub fn get(&self, payload: Payload) -> Result<Response, Error> {
        self.request(Method::Get, payload)
    }

    pub fn post(&self, payload: Payload) -> Result<Response, Error> {
        self.request(Method::Post, payload)
    }

    pub fn put(&self, payload: Payload) -> Result<Response, Error> {
        self.request(Method::Put, payload)
    }

    pub fn patch(&self, payload: Payload) -> Result<Response, Error> {
        self.request(Method::Patch, payload)
    }

    pub fn delete(&self, payload: Payload) -> Result<Response, Error> {
        self.request(Method::Delete, payload)
    }
}
