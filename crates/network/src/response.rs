use serde::Serialize;

use crate::{FanError, FanResult, USAGE};

/// HTTP response sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    message: &'a str,
}

impl Response {
    /// Creates a successful plain text response.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    /// Creates a successful HTML response.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.into(),
        }
    }

    /// Creates a JSON response with the given status code.
    pub fn json<T: Serialize>(status: u16, value: &T) -> FanResult<Self> {
        let body = serde_json::to_string(value).map_err(FanError::encode)?;
        Ok(Self {
            status,
            content_type: "application/json",
            body,
        })
    }

    /// Unknown route, the body lists the available ones.
    pub fn not_found() -> Self {
        Self::error(404, USAGE)
    }

    pub fn bad_request() -> Self {
        Self::error(400, "Malformed request")
    }

    pub fn method_not_allowed() -> Self {
        Self::error(405, "Only GET requests are supported")
    }

    pub fn internal_error(message: &str) -> Self {
        Self::error(500, message)
    }

    fn error(status: u16, message: &str) -> Self {
        let body = ErrorBody { status, message };
        // Serializing a couple of plain fields cannot fail.
        Self::json(status, &body).unwrap_or_else(|_| Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: message.to_owned(),
        })
    }

    /// Returns the standard reason phrase for the status code.
    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    /// Encodes the response as an HTTP/1.1 message that closes the connection.
    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.content_type,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}
