//! The room registry: lifecycle, membership, readiness, host migration.
//!
//! Every mutation keeps the three indices (rooms by id, room ids by
//! name, and the user → room membership map) in sync.
//! A room with zero players never survives an operation: the last
//! leaver (or disconnect) deletes it and frees its name reservation.
//!
//! Like [`UserRegistry`](crate::UserRegistry), this type is not
//! thread-safe by itself; the dispatcher serialises access through a
//! mutex held for the length of one handler call.

use std::collections::HashMap;

use deckhall_protocol::{
    CreateRoomParams, LeaveRoomResult, PlayerReadiness, RoomConfigInfo,
    RoomDetail, RoomId, RoomLifecycle, RoomPlayerInfo, RoomSummary, UserId,
};
use deckhall_table::{CardRound, RoundConfig};

use crate::LobbyError;

/// Fewest players a room may be configured for.
pub const MIN_PLAYER_LIMIT: u8 = 2;
/// Most players a room may be configured for.
pub const MAX_PLAYER_LIMIT: u8 = 8;

/// One member of a room, in join order.
#[derive(Debug, Clone)]
pub struct RoomPlayer {
    pub user_id: UserId,
    pub username: String,
    pub state: PlayerReadiness,
    pub is_host: bool,
}

/// Adjustable room settings.
#[derive(Debug, Clone, Copy)]
pub struct RoomConfig {
    pub player_limit: u8,
}

/// A lobby room. Position 0 of `players` is always the current host.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub state: RoomLifecycle,
    pub host_user_id: UserId,
    pub config: RoomConfig,
    pub players: Vec<RoomPlayer>,
    /// The running round, present exactly while `state` is `InGame`.
    pub round: Option<CardRound>,
}

impl Room {
    /// Snapshot for `room_list`.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            state: self.state,
            player_count: self.players.len() as u8,
            player_limit: self.config.player_limit,
        }
    }

    /// Full snapshot returned by every room mutation.
    pub fn detail(&self) -> RoomDetail {
        RoomDetail {
            id: self.id,
            name: self.name.clone(),
            state: self.state,
            host_id: self.host_user_id,
            player_limit: self.config.player_limit,
            config: RoomConfigInfo {
                player_limit: self.config.player_limit,
            },
            players: self
                .players
                .iter()
                .map(|p| RoomPlayerInfo {
                    user_id: p.user_id,
                    username: p.username.clone(),
                    state: p.state,
                    is_host: p.is_host,
                })
                .collect(),
        }
    }

    fn player_mut(&mut self, user_id: UserId) -> Option<&mut RoomPlayer> {
        self.players.iter_mut().find(|p| p.user_id == user_id)
    }
}

/// Owns every room and the name and membership indices.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    ids_by_name: HashMap<String, RoomId>,
    rooms_by_user: HashMap<UserId, RoomId>,
    next_id: u32,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every room. Order is unspecified but stable within
    /// a single call.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.rooms.values().map(Room::summary).collect()
    }

    /// Creates a room with the caller as sole player and host.
    ///
    /// A missing `name` is auto-assigned from the new room's id; a
    /// provided name must be non-empty after trimming and not taken.
    pub fn create_room(
        &mut self,
        user_id: Option<UserId>,
        username: Option<&str>,
        params: &CreateRoomParams,
    ) -> Result<RoomDetail, LobbyError> {
        let user_id = user_id.ok_or(LobbyError::NotLoggedIn)?;
        let username = username.ok_or(LobbyError::MissingUsername)?;

        let requested_name = match &params.name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(LobbyError::InvalidRoomName);
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        if params.player_limit < MIN_PLAYER_LIMIT
            || params.player_limit > MAX_PLAYER_LIMIT
        {
            return Err(LobbyError::InvalidPlayerLimit);
        }
        if self.rooms_by_user.contains_key(&user_id) {
            return Err(LobbyError::AlreadyInRoom);
        }

        let id = RoomId(self.next_id + 1);
        let name =
            requested_name.unwrap_or_else(|| format!("Room {}", id.0));
        if self.ids_by_name.contains_key(&name) {
            return Err(LobbyError::RoomNameExists);
        }

        self.next_id += 1;
        let room = Room {
            id,
            name: name.clone(),
            state: RoomLifecycle::Waiting,
            host_user_id: user_id,
            config: RoomConfig {
                player_limit: params.player_limit,
            },
            players: vec![RoomPlayer {
                user_id,
                username: username.to_string(),
                state: PlayerReadiness::NotPrepared,
                is_host: true,
            }],
            round: None,
        };
        let detail = room.detail();

        self.ids_by_name.insert(name, id);
        self.rooms_by_user.insert(user_id, id);
        self.rooms.insert(id, room);
        tracing::info!(room_id = %id, host = %user_id, "room created");

        Ok(detail)
    }

    /// Adds the caller to a waiting room with a free slot.
    pub fn join_room(
        &mut self,
        user_id: Option<UserId>,
        username: Option<&str>,
        room_id: RoomId,
    ) -> Result<RoomDetail, LobbyError> {
        let user_id = user_id.ok_or(LobbyError::NotLoggedIn)?;
        let username = username.ok_or(LobbyError::MissingUsername)?;

        if self.rooms_by_user.contains_key(&user_id) {
            return Err(LobbyError::AlreadyInRoom);
        }
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(LobbyError::RoomNotFound)?;
        if room.state == RoomLifecycle::InGame {
            return Err(LobbyError::RoomInProgress);
        }
        if room.players.len() >= room.config.player_limit as usize {
            return Err(LobbyError::RoomFull);
        }

        room.players.push(RoomPlayer {
            user_id,
            username: username.to_string(),
            state: PlayerReadiness::NotPrepared,
            is_host: false,
        });
        self.rooms_by_user.insert(user_id, room_id);
        tracing::info!(
            room_id = %room_id,
            %user_id,
            players = room.players.len(),
            "player joined"
        );

        Ok(room.detail())
    }

    /// Removes the caller from their room.
    ///
    /// Leaving is permitted even while a round is running; the leaver's
    /// seat at the round table is forfeited. If the leaver was host, the
    /// next-oldest member is promoted. The last leaver deletes the room.
    pub fn leave_room(
        &mut self,
        user_id: Option<UserId>,
    ) -> Result<LeaveRoomResult, LobbyError> {
        let user_id = user_id.ok_or(LobbyError::NotLoggedIn)?;
        let room_id = self
            .rooms_by_user
            .get(&user_id)
            .copied()
            .ok_or(LobbyError::NotInRoom)?;

        self.remove_member(room_id, user_id);
        Ok(LeaveRoomResult { room_id })
    }

    /// Sets the caller's readiness. Legal only while the room waits.
    pub fn set_prepared(
        &mut self,
        user_id: Option<UserId>,
        prepared: bool,
    ) -> Result<RoomDetail, LobbyError> {
        let user_id = user_id.ok_or(LobbyError::NotLoggedIn)?;
        let room = self.room_of_mut(user_id)?;
        if room.state == RoomLifecycle::InGame {
            return Err(LobbyError::RoomInProgress);
        }

        let player = room
            .player_mut(user_id)
            .ok_or(LobbyError::NotInRoom)?;
        player.state = if prepared {
            PlayerReadiness::Prepared
        } else {
            PlayerReadiness::NotPrepared
        };

        Ok(room.detail())
    }

    /// Starts the round. Host only; every member must be prepared.
    ///
    /// On success the room enters `InGame` with a live [`CardRound`]:
    /// members are seated in join order and the dealer rotates.
    pub fn start_game(
        &mut self,
        user_id: Option<UserId>,
    ) -> Result<RoomDetail, LobbyError> {
        let user_id = user_id.ok_or(LobbyError::NotLoggedIn)?;
        let room = self.room_of_mut(user_id)?;
        if room.state == RoomLifecycle::InGame {
            return Err(LobbyError::RoomInProgress);
        }
        if room.host_user_id != user_id {
            return Err(LobbyError::NotHost);
        }
        if room
            .players
            .iter()
            .any(|p| p.state != PlayerReadiness::Prepared)
        {
            return Err(LobbyError::PlayersNotReady);
        }

        let mut round = CardRound::new(RoundConfig {
            seat_count: room.config.player_limit as usize,
            ..RoundConfig::default()
        })?;
        for (seat, player) in room.players.iter().enumerate() {
            round.seat_player(player.user_id, seat)?;
        }
        round.start_round()?;

        room.state = RoomLifecycle::InGame;
        room.round = Some(round);
        tracing::info!(
            room_id = %room.id,
            players = room.players.len(),
            "game started"
        );

        Ok(room.detail())
    }

    /// Adjusts the player limit. Host only, waiting rooms only, and
    /// never below the current occupancy.
    pub fn update_config(
        &mut self,
        user_id: Option<UserId>,
        player_limit: u8,
    ) -> Result<RoomDetail, LobbyError> {
        let user_id = user_id.ok_or(LobbyError::NotLoggedIn)?;
        let room = self.room_of_mut(user_id)?;
        if room.state == RoomLifecycle::InGame {
            return Err(LobbyError::RoomInProgress);
        }
        if room.host_user_id != user_id {
            return Err(LobbyError::NotHost);
        }
        if player_limit < MIN_PLAYER_LIMIT
            || player_limit > MAX_PLAYER_LIMIT
            || (player_limit as usize) < room.players.len()
        {
            return Err(LobbyError::InvalidPlayerLimit);
        }

        room.config.player_limit = player_limit;
        Ok(room.detail())
    }

    /// Connection-teardown hook: removes the user from any room they
    /// occupy with the same migration and auto-delete semantics as
    /// [`leave_room`](Self::leave_room). All errors are swallowed.
    pub fn handle_disconnect(&mut self, user_id: UserId) {
        if let Some(room_id) = self.rooms_by_user.get(&user_id).copied() {
            self.remove_member(room_id, user_id);
        }
    }

    /// The room a user occupies, if any.
    pub fn room_of(&self, user_id: UserId) -> Option<RoomId> {
        self.rooms_by_user.get(&user_id).copied()
    }

    /// Read access to a room, for snapshots and assertions.
    pub fn room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room_of_mut(
        &mut self,
        user_id: UserId,
    ) -> Result<&mut Room, LobbyError> {
        let room_id = self
            .rooms_by_user
            .get(&user_id)
            .copied()
            .ok_or(LobbyError::NotInRoom)?;
        self.rooms
            .get_mut(&room_id)
            .ok_or(LobbyError::RoomNotFound)
    }

    /// Shared removal path for leave and disconnect.
    fn remove_member(&mut self, room_id: RoomId, user_id: UserId) {
        self.rooms_by_user.remove(&user_id);

        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        let Some(pos) =
            room.players.iter().position(|p| p.user_id == user_id)
        else {
            return;
        };
        let was_host = room.players[pos].is_host;
        room.players.remove(pos);

        if let Some(round) = &mut room.round {
            let _ = round.forfeit(user_id);
        }

        if room.players.is_empty() {
            let name = room.name.clone();
            self.rooms.remove(&room_id);
            self.ids_by_name.remove(&name);
            tracing::info!(%room_id, "room deleted (empty)");
            return;
        }

        if was_host {
            let next = &mut room.players[0];
            next.is_host = true;
            room.host_user_id = next.user_id;
            tracing::info!(
                %room_id,
                new_host = %room.host_user_id,
                "host migrated"
            );
        }
        tracing::info!(
            %room_id,
            %user_id,
            players = room.players.len(),
            "player left"
        );
    }
}
