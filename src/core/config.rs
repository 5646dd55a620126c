//! Table configuration.
//!
//! A `GameConfig` is built once per game and validated when the engine is
//! constructed. Tests and demos can pin the deck order and the seating of
//! roles; otherwise both are shuffled from the game seed.

use serde::{Deserialize, Serialize};

use super::deck::{DeckComposition, Policy};
use super::error::{GameError, GameResult};
use super::player::PlayerId;
use super::role::{Role, RoleTable};

/// Living-player count below which term limits no longer apply.
pub const DEFAULT_TERM_LIMIT_RELAXATION: usize = 5;

/// Complete game configuration.
///
/// ```
/// use secret_hitler_rl::core::GameConfig;
///
/// let config = GameConfig::new(7).with_seed(99);
/// assert_eq!(config.player_count, 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats.
    pub player_count: usize,

    /// Role counts. Defaults to the standard table for `player_count`.
    pub roles: RoleTable,

    /// Tiles in the policy deck.
    pub deck: DeckComposition,

    /// Term limits are skipped while fewer than this many players are alive.
    pub term_limit_relaxation_below: usize,

    /// First presidential candidate.
    pub first_president: PlayerId,

    /// Seed for role assignment, deck shuffles and reshuffles.
    pub seed: u64,

    /// Fixed seating of roles, one per seat. Shuffled when `None`.
    pub fixed_roles: Option<Vec<Role>>,

    /// Fixed deck order, first element on top. Shuffled when `None`.
    pub stacked_deck: Option<Vec<Policy>>,
}

impl GameConfig {
    /// Standard configuration for `player_count` players.
    ///
    /// Unsupported player counts are reported by [`Self::validate`].
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        let roles = RoleTable::for_player_count(player_count).unwrap_or(RoleTable {
            liberals: player_count.saturating_sub(1),
            fascists: 0,
        });
        Self {
            player_count,
            roles,
            deck: DeckComposition::default(),
            term_limit_relaxation_below: DEFAULT_TERM_LIMIT_RELAXATION,
            first_president: PlayerId::new(0),
            seed: 0,
            fixed_roles: None,
            stacked_deck: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: RoleTable) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: DeckComposition) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn with_term_limit_relaxation(mut self, below: usize) -> Self {
        self.term_limit_relaxation_below = below;
        self
    }

    #[must_use]
    pub fn with_first_president(mut self, player: PlayerId) -> Self {
        self.first_president = player;
        self
    }

    /// Seat roles in this exact order instead of shuffling.
    #[must_use]
    pub fn with_fixed_roles(mut self, roles: Vec<Role>) -> Self {
        self.fixed_roles = Some(roles);
        self
    }

    /// Use this deck order (first element on top) instead of shuffling.
    #[must_use]
    pub fn with_stacked_deck(mut self, top_first: Vec<Policy>) -> Self {
        self.stacked_deck = Some(top_first);
        self
    }

    /// Check that roles, deck and seats are consistent.
    pub fn validate(&self) -> GameResult<()> {
        let invalid = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.player_count < 5 || self.player_count > 255 {
            return invalid(format!("player count {} out of range", self.player_count));
        }
        if self.roles.player_count() != self.player_count {
            return invalid(format!(
                "role table seats {} players, table has {}",
                self.roles.player_count(),
                self.player_count
            ));
        }
        if self.first_president.index() >= self.player_count {
            return invalid(format!("first president {} has no seat", self.first_president));
        }
        if self.deck.total() < 3 {
            return invalid(format!("deck of {} tiles cannot fill a hand", self.deck.total()));
        }
        if let Some(roles) = &self.fixed_roles {
            let mut expected = self.roles.roles();
            let mut given = roles.clone();
            expected.sort_by_key(|r| r.one_hot_index());
            given.sort_by_key(|r| r.one_hot_index());
            if expected != given {
                return invalid(format!("fixed roles {roles:?} do not match the role table"));
            }
        }
        if let Some(stacked) = &self.stacked_deck {
            if DeckComposition::of(stacked) != self.deck {
                return invalid(format!(
                    "stacked deck composition {:?} differs from {:?}",
                    DeckComposition::of(stacked),
                    self.deck
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        for n in 5..=10 {
            assert!(GameConfig::new(n).validate().is_ok(), "{n} players");
        }
    }

    #[test]
    fn test_unsupported_count_rejected() {
        assert!(matches!(
            GameConfig::new(2).validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fixed_roles_must_match_table() {
        let ok = GameConfig::new(5).with_fixed_roles(vec![
            Role::Hitler,
            Role::Liberal,
            Role::Fascist,
            Role::Liberal,
            Role::Liberal,
        ]);
        assert!(ok.validate().is_ok());

        let bad = GameConfig::new(5).with_fixed_roles(vec![Role::Liberal; 5]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_stacked_deck_must_match_composition() {
        let mut tiles = DeckComposition::default().tiles();
        assert!(GameConfig::new(7).with_stacked_deck(tiles.clone()).validate().is_ok());

        tiles.pop();
        assert!(GameConfig::new(7).with_stacked_deck(tiles).validate().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = GameConfig::new(7)
            .with_seed(5)
            .with_term_limit_relaxation(6)
            .with_first_president(PlayerId::new(3));
        assert_eq!(config.seed, 5);
        assert_eq!(config.term_limit_relaxation_below, 6);
        assert_eq!(config.first_president, PlayerId::new(3));
    }
}
