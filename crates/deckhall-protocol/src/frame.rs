//! JSON-RPC 2.0 frame types.
//!
//! Every WebSocket text message carries exactly one envelope, and every
//! envelope classifies as one of three frames: a [`Call`] (request or
//! notification), a [`ResponseFrame`], or an [`ErrorFrame`]. The codec in
//! [`crate::codec`] converts between raw payload bytes and these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The protocol version string every envelope must carry.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC request id: integer, string, or explicit null.
///
/// Any other JSON type in the `id` slot makes the envelope invalid.
/// A *missing* id is not represented here; that is what turns a call
/// into a notification, modelled as `Option<RequestId>` on [`Call`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id. Only integer numbers are accepted.
    Number(i64),
    /// String id.
    String(String),
    /// Explicit `null` id.
    Null,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// A method invocation from the peer.
///
/// With an id this is a request and the peer expects exactly one
/// response or error frame carrying the same id. Without an id it is a
/// notification: the method is still invoked but nothing is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The method name to dispatch on.
    pub method: String,
    /// Raw parameters; `Value::Null` when the envelope had none.
    pub params: Value,
    /// Request id; `None` marks a notification.
    pub id: Option<RequestId>,
}

impl Call {
    /// Returns `true` if this call expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A successful result frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFrame {
    /// Echo of the request id.
    pub id: RequestId,
    /// The result value.
    pub result: Value,
}

/// An error frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorFrame {
    /// Echo of the request id, when the failed request had one.
    pub id: Option<RequestId>,
    /// The error payload.
    pub error: ErrorObject,
}

/// The `error` member of an error frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code (see the `codes` constants).
    pub code: i64,
    /// Human-readable message; for domain errors this is the variant name.
    pub message: String,
    /// Optional extra payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Builds an error object with no `data` member.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// `-32601 "Method not found"`.
    pub fn method_not_found() -> Self {
        Self::new(codes::METHOD_NOT_FOUND, "Method not found")
    }

    /// `-32602 "Invalid params"`.
    pub fn invalid_params() -> Self {
        Self::new(codes::INVALID_PARAMS, "Invalid params")
    }

    /// `-32603 "Internal error"`.
    pub fn internal_error() -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal error")
    }

    /// `-32000` with the raising error's textual name as the message.
    pub fn server_error(name: impl Into<String>) -> Self {
        Self::new(codes::SERVER_ERROR, name)
    }
}

/// One parsed JSON-RPC envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A request or notification from the peer.
    Call(Call),
    /// A result frame.
    Response(ResponseFrame),
    /// An error frame.
    Error(ErrorFrame),
}

/// Standard JSON-RPC 2.0 error codes, plus the server-error code used
/// for domain failures.
pub mod codes {
    /// Malformed JSON.
    pub const PARSE_ERROR: i64 = -32700;
    /// Structurally invalid envelope.
    pub const INVALID_REQUEST: i64 = -32600;
    /// No handler registered for the method.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Parameters failed validation against the method's schema.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Unexpected internal fault.
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Handler raised a domain error.
    pub const SERVER_ERROR: i64 = -32000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_serializes_transparently() {
        assert_eq!(
            serde_json::to_string(&RequestId::Number(7)).unwrap(),
            "7"
        );
        assert_eq!(
            serde_json::to_string(&RequestId::String("a".into())).unwrap(),
            "\"a\""
        );
        assert_eq!(
            serde_json::to_string(&RequestId::Null).unwrap(),
            "null"
        );
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId::Number(3).to_string(), "3");
        assert_eq!(RequestId::String("x9".into()).to_string(), "x9");
        assert_eq!(RequestId::Null.to_string(), "null");
    }

    #[test]
    fn test_call_is_notification() {
        let call = Call {
            method: "ping".into(),
            params: Value::Null,
            id: None,
        };
        assert!(call.is_notification());

        let call = Call {
            id: Some(RequestId::Number(1)),
            ..call
        };
        assert!(!call.is_notification());
    }

    #[test]
    fn test_error_object_omits_absent_data() {
        let json =
            serde_json::to_string(&ErrorObject::method_not_found()).unwrap();
        assert_eq!(
            json,
            r#"{"code":-32601,"message":"Method not found"}"#
        );
    }

    #[test]
    fn test_error_object_constructors() {
        assert_eq!(ErrorObject::invalid_params().code, codes::INVALID_PARAMS);
        assert_eq!(ErrorObject::internal_error().code, codes::INTERNAL_ERROR);
        let e = ErrorObject::server_error("RoomFull");
        assert_eq!(e.code, codes::SERVER_ERROR);
        assert_eq!(e.message, "RoomFull");
    }
}
