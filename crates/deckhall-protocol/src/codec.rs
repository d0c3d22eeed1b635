//! Parsing and encoding of JSON-RPC 2.0 envelopes.
//!
//! [`parse_frame`] classifies an inbound text payload into a [`Frame`],
//! distinguishing malformed JSON from structurally invalid envelopes so
//! the two map to their distinct wire error codes. The `encode_*`
//! functions are pure and produce minified JSON containing only the
//! canonical members of each envelope shape.

use serde::Serialize;
use serde_json::Value;

use crate::error::FrameError;
use crate::frame::{
    Call, ErrorFrame, ErrorObject, Frame, RequestId, ResponseFrame,
    JSONRPC_VERSION,
};

/// UTF-8 byte order mark, tolerated at the start of a payload.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parses one text-frame payload into a [`Frame`].
///
/// A single trailing NUL byte and a leading UTF-8 BOM are stripped
/// before parsing; some clients append or prepend them and the envelope
/// is otherwise well-formed.
pub fn parse_frame(payload: &[u8]) -> Result<Frame, FrameError> {
    let mut bytes = payload;
    if let Some(stripped) = bytes.strip_suffix(&[0u8]) {
        bytes = stripped;
    }
    if let Some(stripped) = bytes.strip_prefix(UTF8_BOM) {
        bytes = stripped;
    }

    let value: Value =
        serde_json::from_slice(bytes).map_err(FrameError::Malformed)?;
    let obj = value.as_object().ok_or(FrameError::NotAnObject)?;

    match obj.get("jsonrpc").and_then(Value::as_str) {
        Some(JSONRPC_VERSION) => {}
        _ => return Err(FrameError::BadVersion),
    }

    if let Some(method) = obj.get("method") {
        let method = method
            .as_str()
            .ok_or(FrameError::BadMethod)?
            .to_string();
        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        let id = match obj.get("id") {
            None => None,
            Some(raw) => Some(classify_id(raw)?),
        };
        return Ok(Frame::Call(Call { method, params, id }));
    }

    if let Some(result) = obj.get("result") {
        let id = classify_id(obj.get("id").ok_or(FrameError::MissingId)?)?;
        return Ok(Frame::Response(ResponseFrame {
            id,
            result: result.clone(),
        }));
    }

    if let Some(error) = obj.get("error") {
        let error = classify_error(error)?;
        let id = match obj.get("id") {
            None => None,
            Some(raw) => Some(classify_id(raw)?),
        };
        return Ok(Frame::Error(ErrorFrame { id, error }));
    }

    Err(FrameError::UnknownShape)
}

/// Validates the `id` member: integer, string, or null only.
fn classify_id(raw: &Value) -> Result<RequestId, FrameError> {
    match raw {
        Value::Number(n) => {
            n.as_i64().map(RequestId::Number).ok_or(FrameError::BadId)
        }
        Value::String(s) => Ok(RequestId::String(s.clone())),
        Value::Null => Ok(RequestId::Null),
        _ => Err(FrameError::BadId),
    }
}

/// Validates the `error` member: `{code: int, message: string, data?}`.
fn classify_error(raw: &Value) -> Result<ErrorObject, FrameError> {
    let obj = raw.as_object().ok_or(FrameError::BadErrorObject)?;
    let code = obj
        .get("code")
        .and_then(Value::as_i64)
        .ok_or(FrameError::BadErrorObject)?;
    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .ok_or(FrameError::BadErrorObject)?
        .to_string();
    let data = obj.get("data").cloned();
    Ok(ErrorObject {
        code,
        message,
        data,
    })
}

// ---------------------------------------------------------------------------
// Encoders
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RequestWire<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    method: &'a str,
    params: &'a Value,
}

#[derive(Serialize)]
struct NotificationWire<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
}

#[derive(Serialize)]
struct ResponseWire<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    result: &'a Value,
}

#[derive(Serialize)]
struct ErrorWire<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    error: &'a ErrorObject,
}

fn to_json<T: Serialize>(wire: &T) -> String {
    // The wire structs contain only Value/String/ErrorObject members,
    // none of which can fail to serialize.
    serde_json::to_string(wire).expect("wire struct serializes")
}

/// Encodes a request envelope.
pub fn encode_request(id: &RequestId, method: &str, params: &Value) -> String {
    to_json(&RequestWire {
        jsonrpc: JSONRPC_VERSION,
        id,
        method,
        params,
    })
}

/// Encodes a notification envelope (no id).
pub fn encode_notification(method: &str, params: &Value) -> String {
    to_json(&NotificationWire {
        jsonrpc: JSONRPC_VERSION,
        method,
        params,
    })
}

/// Encodes a result envelope.
pub fn encode_response(id: &RequestId, result: &Value) -> String {
    to_json(&ResponseWire {
        jsonrpc: JSONRPC_VERSION,
        id,
        result,
    })
}

/// Encodes a result envelope whose result is JSON `null`.
pub fn encode_response_null(id: &RequestId) -> String {
    encode_response(id, &Value::Null)
}

/// Encodes an error envelope. A missing id is written as `null`.
pub fn encode_error(id: Option<&RequestId>, error: &ErrorObject) -> String {
    to_json(&ErrorWire {
        jsonrpc: JSONRPC_VERSION,
        id: id.unwrap_or(&RequestId::Null),
        error,
    })
}

// =========================================================================
// Tests
// =========================================================================
