//! JSON-RPC 2.0 wire protocol for Deckhall.
//!
//! This crate defines the "language" that the lobby server and its
//! clients speak:
//!
//! - **Frames** ([`Frame`], [`Call`], [`ResponseFrame`], [`ErrorFrame`]):
//!   the three envelope kinds of JSON-RPC 2.0, plus [`RequestId`].
//! - **Codec** ([`parse_frame`], the `encode_*` functions): byte-level
//!   parsing and minified encoding with the JSON-RPC error-code mapping.
//! - **Payloads** ([`RoomDetail`], [`RoomSummary`], parameter and result
//!   structs): the typed bodies carried inside frames.
//!
//! The protocol layer sits between transport (raw text frames) and the
//! dispatcher (typed method calls). It knows nothing about connections
//! or rooms, only about envelope shapes.

mod codec;
mod error;
mod frame;
mod wire;

pub use codec::{
    encode_error, encode_notification, encode_request, encode_response,
    encode_response_null, parse_frame,
};
pub use error::{map_parse_frame_error, FrameError};
pub use frame::{
    codes, Call, ErrorFrame, ErrorObject, Frame, RequestId, ResponseFrame,
    JSONRPC_VERSION,
};
pub use wire::{
    ConfigUpdateParams, CreateRoomParams, EmptyParams, JoinRoomParams,
    LeaveRoomResult, PlayerReadiness, ReadyParams, RoomConfigInfo,
    RoomDetail, RoomId, RoomLifecycle, RoomListResult, RoomPlayerInfo,
    RoomSummary, SetNameParams, SetNameResult, StatusMessage, UserId,
};
