//! The per-connection method dispatcher.
//!
//! A [`Dispatcher`] owns the `method name → handler` map. It is built
//! once at startup and never mutated afterwards, so connection tasks
//! read it without locking. [`register`](Dispatcher::register) wraps a
//! typed handler in a thunk that parses the call's params into the
//! declared request type, invokes the handler, and serialises the
//! result, so every entry in the map has the same uniform shape.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use deckhall_lobby::LobbyError;
use deckhall_protocol::{
    encode_error, encode_notification, encode_response, Call, ErrorObject,
    StatusMessage,
};

use crate::connection::ConnectionState;
use crate::ServerError;

/// The uniform handler signature stored in the map.
///
/// Thunks report failures as ready-to-encode [`ErrorObject`]s: a params
/// mismatch becomes `-32602` and a domain error becomes `-32000` with
/// the variant name as the message.
type Handler<S> = Box<
    dyn Fn(&S, &mut ConnectionState, Value) -> Result<Value, ErrorObject>
        + Send
        + Sync,
>;

/// Routes parsed calls to typed handlers over shared state `S`.
pub struct Dispatcher<S> {
    handlers: HashMap<&'static str, Handler<S>>,
}

impl<S> Dispatcher<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a typed handler for `method`.
    ///
    /// The generated thunk parses `params` into `Req` (a missing or
    /// `null` params member parses as an empty object; unknown fields
    /// are ignored), invokes `handler`, and serialises the `Resp`.
    ///
    /// # Errors
    /// `HandlerExists` if the method name is already taken.
    pub fn register<Req, Resp, F>(
        &mut self,
        method: &'static str,
        handler: F,
    ) -> Result<(), ServerError>
    where
        Req: DeserializeOwned,
        Resp: Serialize,
        F: Fn(&S, &mut ConnectionState, Req) -> Result<Resp, LobbyError>
            + Send
            + Sync
            + 'static,
    {
        if self.handlers.contains_key(method) {
            return Err(ServerError::HandlerExists(method));
        }

        let thunk: Handler<S> =
            Box::new(move |state, conn, params| {
                let params = match params {
                    Value::Null => Value::Object(Default::default()),
                    other => other,
                };
                let request: Req = serde_json::from_value(params)
                    .map_err(|_| ErrorObject::invalid_params())?;
                let response = handler(state, conn, request)
                    .map_err(|e| ErrorObject::server_error(e.name()))?;
                serde_json::to_value(response)
                    .map_err(|_| ErrorObject::internal_error())
            });

        self.handlers.insert(method, thunk);
        Ok(())
    }

    /// `true` if a handler is registered for `method`.
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Number of registered methods.
    pub fn method_count(&self) -> usize {
        self.handlers.len()
    }

    /// The welcome notification pushed to a freshly accepted connection.
    pub fn on_connect(&self) -> String {
        let params = serde_json::to_value(StatusMessage::welcome())
            .unwrap_or(Value::Null);
        encode_notification("system", &params)
    }

    /// Routes one call. Returns the serialised reply frame, or `None`
    /// when nothing must be written (notifications).
    ///
    /// Unknown methods answer `-32601` for requests and are dropped
    /// silently for notifications. A notification whose handler fails
    /// is logged and produces no frame.
    pub fn on_call(
        &self,
        state: &S,
        conn: &mut ConnectionState,
        call: &Call,
    ) -> Option<String> {
        let Some(handler) = self.handlers.get(call.method.as_str()) else {
            return match &call.id {
                Some(id) => Some(encode_error(
                    Some(id),
                    &ErrorObject::method_not_found(),
                )),
                None => {
                    tracing::debug!(
                        method = %call.method,
                        "notification for unknown method dropped"
                    );
                    None
                }
            };
        };

        let outcome = handler(state, conn, call.params.clone());
        match (&call.id, outcome) {
            (Some(id), Ok(result)) => Some(encode_response(id, &result)),
            (Some(id), Err(error)) => Some(encode_error(Some(id), &error)),
            (None, Ok(_)) => None,
            (None, Err(error)) => {
                tracing::debug!(
                    method = %call.method,
                    code = error.code,
                    message = %error.message,
                    "notification handler failed"
                );
                None
            }
        }
    }
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
