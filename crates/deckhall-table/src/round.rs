//! The card-round phase machine.
//!
//! [`CardRound`] layers game phases over the generic [`Table`]. The
//! table never interprets the phase; every legality check lives here.
//!
//! ```text
//! Seating     -- seat_player / remove_player --> Seating
//! Seating     -- start_round (>= min players) --> Dealing (dealer rotates)
//! Dealing     -- finish_dealing --> Tossing
//! Tossing     -- resolve_toss(seat) --> Challenging (toss owner := seat)
//! Challenging -- resolve_challenge(seat | none) --> Playing
//! Playing     -- finish_round --> Finished (turn cleared)
//! Finished    -- reset_for_next_round --> Seating (deck rebuilt)
//! ```
//!
//! Any operation outside its phase fails with `InvalidPhaseTransition`.

use serde::{Deserialize, Serialize};
use std::fmt;

use deckhall_protocol::UserId;

use crate::deck::{build_deck, shuffle_deck, Card};
use crate::table::Table;
use crate::{RoundError, TableError};

/// The discrete state of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Players take seats; the round has not begun.
    Seating,
    /// Cards are being dealt.
    Dealing,
    /// Players bid for the toss.
    Tossing,
    /// The toss winner may be challenged.
    Challenging,
    /// Tricks are being played.
    Playing,
    /// The round is over; awaiting reset.
    Finished,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Seating => "seating",
            Self::Dealing => "dealing",
            Self::Tossing => "tossing",
            Self::Challenging => "challenging",
            Self::Playing => "playing",
            Self::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Settings for one round table.
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig {
    /// Number of seats at the table.
    pub seat_count: usize,
    /// Minimum seated players required to start.
    pub min_players: usize,
    /// Physical decks shuffled together.
    pub deck_count: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            seat_count: 8,
            min_players: 2,
            deck_count: 2,
        }
    }
}

/// One card round: a seat table, a phase, a toss owner, and a deck.
#[derive(Debug, Clone)]
pub struct CardRound {
    table: Table<RoundPhase>,
    config: RoundConfig,
    toss_owner: Option<usize>,
    deck: Vec<Card>,
}

impl CardRound {
    /// Creates a round in the `Seating` phase with a fresh shuffled deck.
    pub fn new(config: RoundConfig) -> Result<Self, RoundError> {
        if config.min_players < 2 {
            return Err(TableError::InvalidConfig(
                "min_players must be at least 2".into(),
            )
            .into());
        }
        if config.min_players > config.seat_count {
            return Err(TableError::InvalidConfig(
                "min_players exceeds seat count".into(),
            )
            .into());
        }
        let table = Table::new(config.seat_count, RoundPhase::Seating)?;
        let mut deck = build_deck(config.deck_count);
        shuffle_deck(&mut deck);
        Ok(Self {
            table,
            config,
            toss_owner: None,
            deck,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        *self.table.phase()
    }

    pub fn dealer(&self) -> Option<usize> {
        self.table.dealer()
    }

    pub fn current_turn(&self) -> Option<usize> {
        self.table.current_turn()
    }

    pub fn toss_owner(&self) -> Option<usize> {
        self.toss_owner
    }

    pub fn seated_count(&self) -> usize {
        self.table.seated_count()
    }

    pub fn seat_of(&self, user_id: UserId) -> Option<usize> {
        self.table.seat_of(user_id)
    }

    /// Remaining cards in the deck.
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    fn require_phase(&self, expected: RoundPhase) -> Result<(), RoundError> {
        let current = self.phase();
        if current != expected {
            return Err(RoundError::InvalidPhaseTransition(current));
        }
        Ok(())
    }

    /// Seats a player. Legal only while `Seating`.
    pub fn seat_player(
        &mut self,
        user_id: UserId,
        seat: usize,
    ) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Seating)?;
        self.table.seat_player(user_id, seat)?;
        Ok(())
    }

    /// Unseats a player. Legal only while `Seating`.
    pub fn remove_player(
        &mut self,
        user_id: UserId,
    ) -> Result<usize, RoundError> {
        self.require_phase(RoundPhase::Seating)?;
        Ok(self.table.remove_player(user_id)?)
    }

    /// Unseats a player mid-round, in any phase.
    ///
    /// Used when a room member leaves or disconnects while the round is
    /// running. Vacating the dealer's or current turn's seat clears
    /// that pointer.
    pub fn forfeit(&mut self, user_id: UserId) -> Result<usize, RoundError> {
        Ok(self.table.remove_player(user_id)?)
    }

    /// Starts the round: rotates the dealer, hands the turn to the
    /// dealer, and enters `Dealing`.
    pub fn start_round(&mut self) -> Result<usize, RoundError> {
        self.require_phase(RoundPhase::Seating)?;
        if self.table.seated_count() < self.config.min_players {
            return Err(RoundError::NotEnoughPlayers {
                seated: self.table.seated_count(),
                required: self.config.min_players,
            });
        }
        let dealer = self.table.rotate_dealer()?;
        self.table.set_current_turn(Some(dealer));
        self.table.set_phase(RoundPhase::Dealing);
        tracing::debug!(dealer, "round started");
        Ok(dealer)
    }

    /// Dealing is complete; enters `Tossing`.
    pub fn finish_dealing(&mut self) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Dealing)?;
        self.table.set_phase(RoundPhase::Tossing);
        Ok(())
    }

    /// Records the toss winner and enters `Challenging`.
    pub fn resolve_toss(&mut self, seat: usize) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Tossing)?;
        if self.table.player_at(seat).is_none() {
            if seat >= self.table.seat_count() {
                return Err(TableError::InvalidSeat(seat).into());
            }
            return Err(TableError::SeatEmpty(seat).into());
        }
        self.toss_owner = Some(seat);
        self.table.set_phase(RoundPhase::Challenging);
        Ok(())
    }

    /// Resolves the challenge and enters `Playing`.
    ///
    /// With a challenger the turn goes to them; otherwise it goes to
    /// the toss winner, which must have been set.
    pub fn resolve_challenge(
        &mut self,
        challenger: Option<usize>,
    ) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Challenging)?;
        let toss_owner =
            self.toss_owner.ok_or(RoundError::MissingTossWinner)?;
        if let Some(seat) = challenger {
            if self.table.player_at(seat).is_none() {
                if seat >= self.table.seat_count() {
                    return Err(TableError::InvalidSeat(seat).into());
                }
                return Err(TableError::SeatEmpty(seat).into());
            }
        }
        self.table
            .set_current_turn(Some(challenger.unwrap_or(toss_owner)));
        self.table.set_phase(RoundPhase::Playing);
        Ok(())
    }

    /// Passes the turn to the next occupied seat. Legal while `Playing`.
    pub fn advance_turn(&mut self) -> Result<usize, RoundError> {
        self.require_phase(RoundPhase::Playing)?;
        Ok(self.table.advance_turn()?)
    }

    /// Ends play: clears the turn pointer and enters `Finished`.
    pub fn finish_round(&mut self) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Playing)?;
        self.table.set_current_turn(None);
        self.table.set_phase(RoundPhase::Finished);
        tracing::debug!("round finished");
        Ok(())
    }

    /// Rebuilds the deck, clears the toss owner, and returns to
    /// `Seating`. The dealer pointer is retained so the next
    /// `start_round` rotates past it.
    pub fn reset_for_next_round(&mut self) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Finished)?;
        self.deck = build_deck(self.config.deck_count);
        shuffle_deck(&mut self.deck);
        self.toss_owner = None;
        self.table.set_phase(RoundPhase::Seating);
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
