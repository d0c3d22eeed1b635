//! The lobby application: registries plus the method surface.
//!
//! [`LobbyApp`] owns the authoritative state behind two mutexes, one
//! per registry. Handlers are synchronous and never await while holding
//! a lock, so critical sections run to completion. The method surface
//! is a closed set registered once by [`register_methods`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use deckhall_lobby::{LobbyError, RoomRegistry, UserRegistry};
use deckhall_protocol::{
    ConfigUpdateParams, CreateRoomParams, EmptyParams, JoinRoomParams,
    ReadyParams, RoomListResult, SetNameParams, StatusMessage,
};

use crate::connection::ConnectionState;
use crate::dispatch::Dispatcher;
use crate::ServerError;

/// Shared server state: the user and room registries.
#[derive(Default)]
pub struct LobbyApp {
    users: Mutex<UserRegistry>,
    rooms: Mutex<RoomRegistry>,
}

/// Locks a registry, recovering the guard from a poisoned lock left
/// behind by a panicked handler.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LobbyApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the user registry, for tests and diagnostics.
    pub fn with_users<R>(&self, f: impl FnOnce(&UserRegistry) -> R) -> R {
        f(&lock(&self.users))
    }

    /// Read access to the room registry, for tests and diagnostics.
    pub fn with_rooms<R>(&self, f: impl FnOnce(&RoomRegistry) -> R) -> R {
        f(&lock(&self.rooms))
    }

    /// Connection-teardown callback. Idempotent: the first call releases
    /// the user's room membership and identity, later calls are no-ops.
    pub fn on_disconnect(&self, conn: &mut ConnectionState) {
        if conn.disconnected {
            return;
        }
        conn.disconnected = true;

        if let Some(user_id) = conn.user_id.take() {
            lock(&self.rooms).handle_disconnect(user_id);
            lock(&self.users).remove(user_id);
            tracing::debug!(%user_id, "connection state released");
        }
        conn.user_name = None;
        conn.room_id = None;
    }
}

/// Registers the lobby's closed method set on `dispatcher`.
///
/// Called exactly once while the server is being built; the map is
/// never touched again afterwards.
pub fn register_methods(
    dispatcher: &mut Dispatcher<LobbyApp>,
) -> Result<(), ServerError> {
    dispatcher.register(
        "ping",
        |_app: &LobbyApp, _conn, _req: EmptyParams| {
            Ok::<_, LobbyError>(StatusMessage::pong())
        },
    )?;

    dispatcher.register(
        "user_set_name",
        |app: &LobbyApp, conn, req: SetNameParams| {
            let result = lock(&app.users).set_name(
                conn.user_id,
                conn.user_name.as_deref(),
                &req.nickname,
            )?;
            conn.user_id = Some(result.id);
            conn.user_name = Some(result.username.clone());
            Ok(result)
        },
    )?;

    dispatcher.register(
        "room_list",
        |app: &LobbyApp, _conn, _req: EmptyParams| {
            Ok::<_, LobbyError>(RoomListResult {
                rooms: lock(&app.rooms).list_rooms(),
            })
        },
    )?;

    dispatcher.register(
        "room_create",
        |app: &LobbyApp, conn, req: CreateRoomParams| {
            let detail = lock(&app.rooms).create_room(
                conn.user_id,
                conn.user_name.as_deref(),
                &req,
            )?;
            conn.room_id = Some(detail.id);
            Ok(detail)
        },
    )?;

    dispatcher.register(
        "room_join",
        |app: &LobbyApp, conn, req: JoinRoomParams| {
            let detail = lock(&app.rooms).join_room(
                conn.user_id,
                conn.user_name.as_deref(),
                req.room_id,
            )?;
            conn.room_id = Some(detail.id);
            Ok(detail)
        },
    )?;

    dispatcher.register(
        "room_leave",
        |app: &LobbyApp, conn, _req: EmptyParams| {
            let result = lock(&app.rooms).leave_room(conn.user_id)?;
            conn.room_id = None;
            Ok(result)
        },
    )?;

    dispatcher.register(
        "room_ready",
        |app: &LobbyApp, conn, req: ReadyParams| {
            lock(&app.rooms).set_prepared(conn.user_id, req.prepared)
        },
    )?;

    dispatcher.register(
        "room_start",
        |app: &LobbyApp, conn, _req: EmptyParams| {
            lock(&app.rooms).start_game(conn.user_id)
        },
    )?;

    dispatcher.register(
        "room_config_update",
        |app: &LobbyApp, conn, req: ConfigUpdateParams| {
            lock(&app.rooms).update_config(conn.user_id, req.player_limit)
        },
    )?;

    Ok(())
}

// =========================================================================
// Tests
// =========================================================================
