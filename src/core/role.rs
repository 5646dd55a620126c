//! Secret roles, party membership and the role table per player count.

use serde::{Deserialize, Serialize};

use super::error::{GameError, GameResult};

/// A player's secret role, assigned once at game start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Liberal,
    Fascist,
    Hitler,
}

impl Role {
    /// Party membership as revealed by an investigation.
    ///
    /// Hitler is a member of the Fascist party.
    #[must_use]
    pub const fn party(self) -> Party {
        match self {
            Role::Liberal => Party::Liberal,
            Role::Fascist | Role::Hitler => Party::Fascist,
        }
    }

    /// The team that wins together with this role.
    #[must_use]
    pub const fn team(self) -> Team {
        match self.party() {
            Party::Liberal => Team::Liberals,
            Party::Fascist => Team::Fascists,
        }
    }

    #[must_use]
    pub const fn is_hitler(self) -> bool {
        matches!(self, Role::Hitler)
    }

    /// Position in a one-hot `[Liberal, Fascist, Hitler]` encoding.
    #[must_use]
    pub const fn one_hot_index(self) -> usize {
        match self {
            Role::Liberal => 0,
            Role::Fascist => 1,
            Role::Hitler => 2,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Liberal => "Liberal",
            Role::Fascist => "Fascist",
            Role::Hitler => "Hitler",
        };
        f.write_str(name)
    }
}

/// Party membership card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Liberal,
    Fascist,
}

/// Winning side of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Liberals,
    Fascists,
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Liberals => f.write_str("Liberals"),
            Team::Fascists => f.write_str("Fascists"),
        }
    }
}

/// Role counts for one table.
///
/// ```
/// use secret_hitler_rl::core::RoleTable;
///
/// let table = RoleTable::for_player_count(7).unwrap();
/// assert_eq!((table.liberals, table.fascists), (4, 2));
/// assert_eq!(table.player_count(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    pub liberals: usize,
    /// Ordinary fascists, not counting Hitler.
    pub fascists: usize,
}

impl RoleTable {
    /// Standard distribution for 5-10 players.
    pub fn for_player_count(player_count: usize) -> GameResult<Self> {
        let (liberals, fascists) = match player_count {
            5 => (3, 1),
            6 => (4, 1),
            7 => (4, 2),
            8 => (5, 2),
            9 => (5, 3),
            10 => (6, 3),
            n => {
                return Err(GameError::InvalidConfig(format!(
                    "no standard role table for {n} players (supported: 5-10)"
                )))
            }
        };
        Ok(Self { liberals, fascists })
    }

    /// Liberals + fascists + Hitler.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.liberals + self.fascists + 1
    }

    /// Unshuffled role list, Liberals first.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        let mut roles = Vec::with_capacity(self.player_count());
        roles.extend(std::iter::repeat(Role::Liberal).take(self.liberals));
        roles.extend(std::iter::repeat(Role::Fascist).take(self.fascists));
        roles.push(Role::Hitler);
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hitler_investigates_as_fascist() {
        assert_eq!(Role::Hitler.party(), Party::Fascist);
        assert_eq!(Role::Fascist.party(), Party::Fascist);
        assert_eq!(Role::Liberal.party(), Party::Liberal);
        assert_eq!(Role::Hitler.team(), Team::Fascists);
    }

    #[test]
    fn test_standard_tables() {
        for n in 5..=10 {
            let table = RoleTable::for_player_count(n).unwrap();
            assert_eq!(table.player_count(), n);
            assert!(table.liberals > table.fascists);
        }
    }

    #[test]
    fn test_seven_player_roles() {
        let roles = RoleTable::for_player_count(7).unwrap().roles();
        assert_eq!(roles.iter().filter(|r| **r == Role::Liberal).count(), 4);
        assert_eq!(roles.iter().filter(|r| **r == Role::Fascist).count(), 2);
        assert_eq!(roles.iter().filter(|r| r.is_hitler()).count(), 1);
    }

    #[test]
    fn test_unsupported_player_count() {
        assert!(matches!(
            RoleTable::for_player_count(4),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(RoleTable::for_player_count(11).is_err());
    }

    #[test]
    fn test_one_hot_indices_distinct() {
        let idx = [Role::Liberal, Role::Fascist, Role::Hitler].map(Role::one_hot_index);
        assert_eq!(idx, [0, 1, 2]);
    }
}
