//! Error types for the framing layer.

use crate::frame::{codes, ErrorObject};

/// Why a payload failed to parse into a [`Frame`](crate::Frame).
///
/// The distinction between `Malformed` and the structural variants
/// matters on the wire: malformed JSON maps to `-32700` while a
/// well-formed envelope of the wrong shape maps to `-32600`.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload is not valid JSON.
    #[error("malformed JSON payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The payload parsed but is not a JSON object.
    #[error("envelope is not a JSON object")]
    NotAnObject,

    /// The `jsonrpc` member is missing or not `"2.0"`.
    #[error("missing or mismatched jsonrpc version")]
    BadVersion,

    /// The `method` member is present but not a string.
    #[error("method must be a string")]
    BadMethod,

    /// The `id` member is not an integer, string, or null.
    #[error("id must be an integer, string, or null")]
    BadId,

    /// A result frame arrived without an `id`.
    #[error("result frame requires an id")]
    MissingId,

    /// The `error` member is not `{code: int, message: string, ...}`.
    #[error("malformed error object")]
    BadErrorObject,

    /// The envelope carries none of `method`, `result`, or `error`.
    #[error("unrecognised envelope shape")]
    UnknownShape,
}

/// Maps a parse failure to the error object sent back to the peer.
pub fn map_parse_frame_error(err: &FrameError) -> ErrorObject {
    match err {
        FrameError::Malformed(_) => {
            ErrorObject::new(codes::PARSE_ERROR, "Parse error")
        }
        _ => ErrorObject::new(codes::INVALID_REQUEST, "Invalid Request"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_malformed_to_parse_error() {
        let json_err =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped =
            map_parse_frame_error(&FrameError::Malformed(json_err));
        assert_eq!(mapped.code, codes::PARSE_ERROR);
        assert_eq!(mapped.message, "Parse error");
    }

    #[test]
    fn test_map_structural_errors_to_invalid_request() {
        for err in [
            FrameError::NotAnObject,
            FrameError::BadVersion,
            FrameError::BadMethod,
            FrameError::BadId,
            FrameError::MissingId,
            FrameError::BadErrorObject,
            FrameError::UnknownShape,
        ] {
            let mapped = map_parse_frame_error(&err);
            assert_eq!(mapped.code, codes::INVALID_REQUEST);
            assert_eq!(mapped.message, "Invalid Request");
        }
    }
}
