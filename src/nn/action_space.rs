//! Fixed action index space per player count.
//!
//! Legal action lists change length from one decision to the next; the
//! action space gives every possible [`Action`] a stable index so recorded
//! transitions and masks line up across a dataset.
//!
//! Layout for `n` players:
//!
//! | Range | Actions |
//! |---|---|
//! | 0..2 | `Vote(Ja)`, `Vote(Nein)` |
//! | 2..4 | `Discard(Liberal)`, `Discard(Fascist)` |
//! | 4..6 | `Enact(Liberal)`, `Enact(Fascist)` |
//! | 6..8 | `Veto(true)`, `Veto(false)` |
//! | 8.. | `Nominate`, `Investigate`, `DesignatePresident`, `Execute`, `n` each |

use crate::core::{Action, PlayerId, Policy, Vote};

const FIXED: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpace {
    player_count: usize,
}

impl ActionSpace {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self { player_count }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        FIXED + 4 * self.player_count
    }

    /// Global index of `action`. `None` if it targets a seat outside the table.
    ///
    /// ```
    /// use secret_hitler_rl::core::{Action, PlayerId};
    /// use secret_hitler_rl::nn::ActionSpace;
    ///
    /// let space = ActionSpace::new(5);
    /// let index = space.index(&Action::Execute(PlayerId::new(2))).unwrap();
    /// assert_eq!(space.action(index), Some(Action::Execute(PlayerId::new(2))));
    /// ```
    #[must_use]
    pub fn index(&self, action: &Action) -> Option<usize> {
        let policy_offset = |p: &Policy| match p {
            Policy::Liberal => 0,
            Policy::Fascist => 1,
        };
        let targeted = |block: usize, p: &PlayerId| {
            (p.index() < self.player_count).then(|| FIXED + block * self.player_count + p.index())
        };
        match action {
            Action::Vote(Vote::Ja) => Some(0),
            Action::Vote(Vote::Nein) => Some(1),
            Action::Discard(p) => Some(2 + policy_offset(p)),
            Action::Enact(p) => Some(4 + policy_offset(p)),
            Action::Veto(true) => Some(6),
            Action::Veto(false) => Some(7),
            Action::Nominate(p) => targeted(0, p),
            Action::Investigate(p) => targeted(1, p),
            Action::DesignatePresident(p) => targeted(2, p),
            Action::Execute(p) => targeted(3, p),
        }
    }

    /// Action at a global index.
    #[must_use]
    pub fn action(&self, index: usize) -> Option<Action> {
        let fixed = [
            Action::Vote(Vote::Ja),
            Action::Vote(Vote::Nein),
            Action::Discard(Policy::Liberal),
            Action::Discard(Policy::Fascist),
            Action::Enact(Policy::Liberal),
            Action::Enact(Policy::Fascist),
            Action::Veto(true),
            Action::Veto(false),
        ];
        if index < FIXED {
            return Some(fixed[index]);
        }
        if index >= self.size() || self.player_count == 0 {
            return None;
        }
        let offset = index - FIXED;
        let seat = PlayerId::new((offset % self.player_count) as u8);
        match offset / self.player_count {
            0 => Some(Action::Nominate(seat)),
            1 => Some(Action::Investigate(seat)),
            2 => Some(Action::DesignatePresident(seat)),
            _ => Some(Action::Execute(seat)),
        }
    }

    /// Boolean mask over the whole space, `true` for each legal action.
    #[must_use]
    pub fn mask(&self, legal: &[Action]) -> Vec<bool> {
        let mut mask = vec![false; self.size()];
        for index in legal.iter().filter_map(|a| self.index(a)) {
            mask[index] = true;
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(ActionSpace::new(5).size(), 28);
        assert_eq!(ActionSpace::new(10).size(), 48);
    }

    #[test]
    fn test_every_index_maps_back() {
        let space = ActionSpace::new(7);
        for index in 0..space.size() {
            let action = space.action(index).unwrap();
            assert_eq!(space.index(&action), Some(index), "{action:?}");
        }
        assert_eq!(space.action(space.size()), None);
    }

    #[test]
    fn test_out_of_table_target() {
        let space = ActionSpace::new(5);
        assert_eq!(space.index(&Action::Nominate(PlayerId::new(5))), None);
    }

    #[test]
    fn test_mask() {
        let space = ActionSpace::new(5);
        let mask = space.mask(&[Action::Vote(Vote::Ja), Action::Vote(Vote::Nein)]);
        assert_eq!(mask.iter().filter(|m| **m).count(), 2);
        assert!(mask[0] && mask[1]);
    }
}
