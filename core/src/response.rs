//! Normalized response with format-aware body decoding.
//!
//! # Design
//! The decoder reads the content type the transport declared, unless a
//! behavior flag (`body_format`, `return_content_type`) overrides it or
//! `auto_format` is switched off. JSON and XML parse into structured
//! values; everything else passes through as text — an unrecognized content
//! type is never an error. A parse failure is recoverable: the raw body
//! rides along on [`Error::MalformedBody`].

use serde_json::Value;
use xmltree::Element;

use crate::error::Error;
use crate::options::BehaviorFlag;
use crate::request::CompiledRequest;
use crate::transport::RawResult;

/// Decoded response body.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Xml(Element),
    Text(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_xml(&self) -> Option<&Element> {
        match self {
            Body::Xml(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Normalized HTTP response: status, headers, raw and decoded body, plus the
/// originating compiled request for introspection.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    raw: String,
    body: Body,
    request: CompiledRequest,
}

impl Response {
    /// Decode `raw` according to the declared or overridden content type.
    pub(crate) fn decode(raw: RawResult, request: CompiledRequest) -> Result<Response, Error> {
        let format = declared_format(&raw, &request);
        tracing::trace!(status = raw.status, ?format, "decoding response");
        let body = decode_body(&raw.body, format)?;
        Ok(Response {
            status: raw.status,
            headers: raw.headers,
            raw: raw.body,
            body,
            request,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as received from the transport, before decoding.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Decoded JSON body, if the response decoded as JSON.
    pub fn json(&self) -> Option<&Value> {
        self.body.as_json()
    }

    /// The compiled request this response answers.
    pub fn request(&self) -> &CompiledRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Xml,
    Plain,
}

fn declared_format(raw: &RawResult, request: &CompiledRequest) -> Format {
    // auto_format = false keeps the body raw regardless of content type
    if let Some(flag) = request.behavior.get(&BehaviorFlag::AutoFormat) {
        if flag.as_bool() == Some(false) {
            return Format::Plain;
        }
    }

    // format overrides win over the transport's declared type
    let forced = request
        .behavior
        .get(&BehaviorFlag::BodyFormat)
        .or_else(|| request.behavior.get(&BehaviorFlag::ReturnContentType))
        .and_then(Value::as_str);
    if let Some(name) = forced {
        return match name {
            "json" => Format::Json,
            "xml" => Format::Xml,
            _ => Format::Plain,
        };
    }

    match raw.content_type.as_deref() {
        Some(ct) if is_json(ct) => Format::Json,
        Some(ct) if is_xml(ct) => Format::Xml,
        _ => Format::Plain,
    }
}

fn is_json(content_type: &str) -> bool {
    content_type.contains("application/json")
        || content_type.contains("text/json")
        || content_type.contains("+json")
}

fn is_xml(content_type: &str) -> bool {
    content_type.contains("application/xml")
        || content_type.contains("text/xml")
        || content_type.contains("+xml")
}

fn decode_body(raw: &str, format: Format) -> Result<Body, Error> {
    match format {
        Format::Json => serde_json::from_str(raw).map(Body::Json).map_err(|e| {
            Error::MalformedBody {
                content_type: "json".to_string(),
                reason: e.to_string(),
                raw: raw.to_string(),
            }
        }),
        Format::Xml => Element::parse(raw.as_bytes()).map(Body::Xml).map_err(|e| {
            Error::MalformedBody {
                content_type: "xml".to_string(),
                reason: e.to_string(),
                raw: raw.to_string(),
            }
        }),
        Format::Plain => Ok(Body::Text(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::payload::Payload;

    fn request(payload: Payload) -> CompiledRequest {
        CompiledRequest::build(Method::Get, payload).unwrap()
    }

    fn raw(content_type: Option<&str>, body: &str) -> RawResult {
        RawResult {
            status: 200,
            headers: content_type
                .map(|ct| vec![("content-type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.to_string(),
            content_type: content_type.map(str::to_string),
        }
    }

    #[test]
    fn json_content_type_decodes_to_a_structured_value() {
        let response = Response::decode(
            raw(Some("application/json"), r#"{"k":1}"#),
            request(Payload::new("http://x")),
        )
        .unwrap();
        assert_eq!(response.json().unwrap()["k"], 1);
        assert_eq!(response.raw(), r#"{"k":1}"#);
    }

    #[test]
    fn charset_suffix_does_not_confuse_detection() {
        let response = Response::decode(
            raw(Some("application/json; charset=utf-8"), r#"{"k":1}"#),
            request(Payload::new("http://x")),
        )
        .unwrap();
        assert!(response.json().is_some());
    }

    #[test]
    fn malformed_json_is_recoverable() {
        let err = Response::decode(
            raw(Some("application/json"), "{not json"),
            request(Payload::new("http://x")),
        )
        .unwrap_err();
        match err {
            Error::MalformedBody { raw, content_type, .. } => {
                assert_eq!(raw, "{not json");
                assert_eq!(content_type, "json");
            }
            other => panic!("expected MalformedBody, got {other:?}"),
        }
    }

    #[test]
    fn xml_content_type_decodes_to_an_element_tree() {
        let response = Response::decode(
            raw(Some("application/xml"), "<note><to>caller</to></note>"),
            request(Payload::new("http://x")),
        )
        .unwrap();
        let element = response.body().as_xml().unwrap();
        assert_eq!(element.name, "note");
        assert_eq!(
            element.get_child("to").and_then(|c| c.get_text()).as_deref(),
            Some("caller")
        );
    }

    #[test]
    fn malformed_xml_is_recoverable() {
        let err = Response::decode(
            raw(Some("text/xml"), "<unclosed"),
            request(Payload::new("http://x")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedBody { content_type, .. } if content_type == "xml"));
    }

    #[test]
    fn unknown_content_type_passes_through_as_text() {
        let response = Response::decode(
            raw(Some("text/html"), "<p>hi</p>"),
            request(Payload::new("http://x")),
        )
        .unwrap();
        assert_eq!(response.body().as_text(), Some("<p>hi</p>"));
    }

    #[test]
    fn missing_content_type_passes_through_as_text() {
        let response =
            Response::decode(raw(None, "plain"), request(Payload::new("http://x"))).unwrap();
        assert_eq!(response.body().as_text(), Some("plain"));
    }

    #[test]
    fn auto_format_off_keeps_json_raw() {
        let response = Response::decode(
            raw(Some("application/json"), r#"{"k":1}"#),
            request(Payload::new("http://x").option("auto_format", false)),
        )
        .unwrap();
        assert_eq!(response.body().as_text(), Some(r#"{"k":1}"#));
    }

    #[test]
    fn body_format_override_forces_json_decoding() {
        let response = Response::decode(
            raw(Some("text/plain"), r#"{"k":1}"#),
            request(Payload::new("http://x").option("body_format", "json")),
        )
        .unwrap();
        assert_eq!(response.json().unwrap()["k"], 1);
    }

    #[test]
    fn return_content_type_override_forces_xml_decoding() {
        let response = Response::decode(
            raw(None, "<a/>"),
            request(Payload::new("http://x").option("return_content_type", "xml")),
        )
        .unwrap();
        assert_eq!(response.body().as_xml().unwrap().name, "a");
    }

    #[test]
    fn response_exposes_the_originating_request() {
        let response = Response::decode(
            raw(None, ""),
            request(Payload::new("http://x").param("q", "1")),
        )
        .unwrap();
        assert_eq!(response.request().url, "http://x?q=1");
        assert_eq!(response.request().method, Method::Get);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = Response::decode(
            raw(Some("text/plain"), "ok"),
            request(Payload::new("http://x")),
        )
        .unwrap();
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert!(response.is_success());
    }
}
