//! HTTP methods supported by the wrapper.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// HTTP method for a request.
///
/// POST routes parameters into the request body; every other method carries
/// them in the URL query string. PUT, PATCH and DELETE are transmitted as
/// custom methods by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Exact, case-sensitive match on the uppercase method name.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}
