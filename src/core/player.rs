//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Seat identifier, stable for the lifetime of a game. Seats are 0-based and
//! also define the presidential rotation order.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier supporting up to 255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat to the left in a table of `player_count` seats.
    ///
    /// ```
    /// use secret_hitler_rl::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(2).next(7), PlayerId::new(3));
    /// assert_eq!(PlayerId::new(6).next(7), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// Iterate over all seats of a `player_count` table.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use secret_hitler_rl::core::{PlayerId, PlayerMap};
///
/// let mut alive: PlayerMap<bool> = PlayerMap::with_value(7, true);
/// alive[PlayerId::new(3)] = false;
/// assert_eq!(alive.iter().filter(|(_, a)| **a).count(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a map with every entry set to `value`.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Build a map from one value per seat, in seat order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Bounds-checked lookup for ids that came from outside the engine.
    #[must_use]
    pub fn try_get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_next_wraps() {
        assert_eq!(PlayerId::new(0).next(5), PlayerId::new(1));
        assert_eq!(PlayerId::new(4).next(5), PlayerId::new(0));
        assert_eq!(format!("{}", PlayerId::new(3)), "Player 3");
    }

    #[test]
    fn test_player_id_all() {
        let players: Vec<_> = PlayerId::all(7).collect();
        assert_eq!(players.len(), 7);
        assert_eq!(players[0], PlayerId::new(0));
        assert_eq!(players[6], PlayerId::new(6));
    }

    #[test]
    fn test_player_map_factory_and_mutation() {
        let mut map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(3)], 30);

        map[PlayerId::new(1)] = 7;
        assert_eq!(map[PlayerId::new(1)], 7);
        assert_eq!(map.player_count(), 4);
    }

    #[test]
    fn test_player_map_try_get_out_of_range() {
        let map: PlayerMap<u8> = PlayerMap::with_default(3);
        assert!(map.try_get(PlayerId::new(2)).is_some());
        assert!(map.try_get(PlayerId::new(3)).is_none());
    }

    #[test]
    fn test_player_map_from_vec_iter() {
        let map = PlayerMap::from_vec(vec!['a', 'b', 'c']);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[2], (PlayerId::new(2), &'c'));
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<bool> = PlayerMap::new(3, |p| p.index() % 2 == 0);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
