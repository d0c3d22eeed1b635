//! The user registry: nickname → identity.
//!
//! Identities are (nickname, id) pairs. Ids are strictly increasing and
//! never reused; nicknames are unique while held. The registry owns its
//! stored nickname strings; callers keep their own copies, so a delete
//! here can never invalidate a connection's cached name.
//!
//! # Concurrency note
//!
//! `UserRegistry` is not thread-safe by itself: the dispatcher wraps it
//! in a mutex and holds the lock for the duration of a single handler
//! call. Keeping it a plain `HashMap` avoids hidden locking overhead.

use std::collections::HashMap;

use deckhall_protocol::{SetNameResult, UserId};

use crate::LobbyError;

/// Maps nicknames to user ids and back.
#[derive(Debug, Default)]
pub struct UserRegistry {
    /// Primary map: held nickname → id.
    ids_by_nickname: HashMap<String, UserId>,
    /// Reverse index, kept in sync with `ids_by_nickname`.
    nicknames_by_id: HashMap<UserId, String>,
    /// Last id handed out.
    next_id: i64,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims or renames an identity.
    ///
    /// `existing_id` and `cached_name` are the connection's current
    /// binding. The contract:
    ///
    /// - the nickname is trimmed; empty → `InvalidUsername`;
    /// - a bound connection re-claiming its own name is a no-op;
    /// - a bound connection renames, keeping its id, unless the target
    ///   name is held by someone else (`UserExists`);
    /// - a bound id whose cached name is missing is treated as stale:
    ///   the old entry is dropped and a fresh identity allocated;
    /// - an unbound connection claims the name, failing with
    ///   `UserExists` if it is already held.
    pub fn set_name(
        &mut self,
        existing_id: Option<UserId>,
        cached_name: Option<&str>,
        nickname: &str,
    ) -> Result<SetNameResult, LobbyError> {
        let trimmed = nickname.trim();
        if trimmed.is_empty() {
            return Err(LobbyError::InvalidUsername);
        }

        if let Some(id) = existing_id {
            match cached_name {
                Some(current) if current == trimmed => {
                    return Ok(SetNameResult {
                        id,
                        username: trimmed.to_string(),
                    });
                }
                Some(current) => {
                    if let Some(&holder) = self.ids_by_nickname.get(trimmed)
                    {
                        if holder != id {
                            return Err(LobbyError::UserExists);
                        }
                    }
                    self.ids_by_nickname.remove(current);
                    self.ids_by_nickname.insert(trimmed.to_string(), id);
                    self.nicknames_by_id.insert(id, trimmed.to_string());
                    tracing::debug!(%id, from = current, to = trimmed, "user renamed");
                    return Ok(SetNameResult {
                        id,
                        username: trimmed.to_string(),
                    });
                }
                None => {
                    // Id without a cached name: stale binding. Drop it
                    // and fall through to a fresh allocation.
                    self.remove(id);
                }
            }
        }

        if self.ids_by_nickname.contains_key(trimmed) {
            return Err(LobbyError::UserExists);
        }

        self.next_id += 1;
        let id = UserId(self.next_id);
        self.ids_by_nickname.insert(trimmed.to_string(), id);
        self.nicknames_by_id.insert(id, trimmed.to_string());
        tracing::debug!(%id, nickname = trimmed, "user registered");

        Ok(SetNameResult {
            id,
            username: trimmed.to_string(),
        })
    }

    /// Releases an identity, freeing its nickname.
    pub fn remove(&mut self, id: UserId) {
        if let Some(nickname) = self.nicknames_by_id.remove(&id) {
            self.ids_by_nickname.remove(&nickname);
            tracing::debug!(%id, %nickname, "user removed");
        }
    }

    /// The id holding `nickname`, if any.
    pub fn id_of(&self, nickname: &str) -> Option<UserId> {
        self.ids_by_nickname.get(nickname).copied()
    }

    /// The nickname held by `id`, if any.
    pub fn nickname_of(&self, id: UserId) -> Option<&str> {
        self.nicknames_by_id.get(&id).map(String::as_str)
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.ids_by_nickname.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_nickname.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_name_first_claim_allocates_id_one() {
        let mut reg = UserRegistry::new();

        let result = reg.set_name(None, None, "Alice").unwrap();

        assert_eq!(result.id, UserId(1));
        assert_eq!(result.username, "Alice");
        assert_eq!(reg.id_of("Alice"), Some(UserId(1)));
    }

    #[test]
    fn test_set_name_ids_strictly_increase() {
        let mut reg = UserRegistry::new();

        let a = reg.set_name(None, None, "Alice").unwrap();
        let b = reg.set_name(None, None, "Bob").unwrap();
        let c = reg.set_name(None, None, "Charlie").unwrap();

        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_set_name_trims_surrounding_whitespace() {
        let mut reg = UserRegistry::new();

        let result = reg.set_name(None, None, "  Alice \t").unwrap();

        assert_eq!(result.username, "Alice");
        assert_eq!(reg.id_of("Alice"), Some(result.id));
        assert_eq!(reg.id_of("  Alice \t"), None);
    }

    #[test]
    fn test_set_name_empty_after_trim_is_invalid() {
        let mut reg = UserRegistry::new();

        let result = reg.set_name(None, None, "   ");

        assert!(matches!(result, Err(LobbyError::InvalidUsername)));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_set_name_duplicate_claim_is_rejected() {
        let mut reg = UserRegistry::new();
        reg.set_name(None, None, "Alice").unwrap();

        let result = reg.set_name(None, None, "Alice");

        assert!(matches!(result, Err(LobbyError::UserExists)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_set_name_same_name_is_noop() {
        let mut reg = UserRegistry::new();
        let first = reg.set_name(None, None, "Alice").unwrap();

        let second = reg
            .set_name(Some(first.id), Some("Alice"), "Alice")
            .unwrap();

        assert_eq!(second, first);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_set_name_trim_equivalent_is_noop() {
        let mut reg = UserRegistry::new();
        let first = reg.set_name(None, None, "Alice").unwrap();

        let second = reg
            .set_name(Some(first.id), Some("Alice"), " Alice ")
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_rename_keeps_id_and_frees_old_name() {
        let mut reg = UserRegistry::new();
        let first = reg.set_name(None, None, "Alice").unwrap();

        let renamed = reg
            .set_name(Some(first.id), Some("Alice"), "Alicia")
            .unwrap();

        assert_eq!(renamed.id, first.id);
        assert_eq!(renamed.username, "Alicia");
        assert_eq!(reg.id_of("Alice"), None, "old name must be freed");
        assert_eq!(reg.id_of("Alicia"), Some(first.id));
    }

    #[test]
    fn test_rename_to_taken_name_is_rejected() {
        let mut reg = UserRegistry::new();
        let alice = reg.set_name(None, None, "Alice").unwrap();
        reg.set_name(None, None, "Bob").unwrap();

        let result = reg.set_name(Some(alice.id), Some("Alice"), "Bob");

        assert!(matches!(result, Err(LobbyError::UserExists)));
        // The failed rename must not disturb either entry.
        assert_eq!(reg.id_of("Alice"), Some(alice.id));
        assert!(reg.id_of("Bob").is_some());
    }

    #[test]
    fn test_stale_id_without_cached_name_gets_fresh_identity() {
        let mut reg = UserRegistry::new();
        let old = reg.set_name(None, None, "Alice").unwrap();

        // The connection claims to hold `old.id` but lost its name.
        let fresh = reg.set_name(Some(old.id), None, "Alya").unwrap();

        assert!(fresh.id > old.id, "stale id is dropped, not reused");
        assert_eq!(reg.id_of("Alice"), None);
        assert_eq!(reg.id_of("Alya"), Some(fresh.id));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_remove_frees_nickname_for_reclaim() {
        let mut reg = UserRegistry::new();
        let alice = reg.set_name(None, None, "Alice").unwrap();

        reg.remove(alice.id);

        assert!(reg.is_empty());
        let again = reg.set_name(None, None, "Alice").unwrap();
        assert!(again.id > alice.id, "ids are never reused");
    }

    #[test]
    fn test_remove_unknown_id_is_harmless() {
        let mut reg = UserRegistry::new();
        reg.set_name(None, None, "Alice").unwrap();

        reg.remove(UserId(99));

        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_nickname_of() {
        let mut reg = UserRegistry::new();
        let alice = reg.set_name(None, None, "Alice").unwrap();

        assert_eq!(reg.nickname_of(alice.id), Some("Alice"));
        assert_eq!(reg.nickname_of(UserId(42)), None);
    }
}
