//! Observation encoding for model input.
//!
//! ## Feature layout
//!
//! For a table of `n` players the flat vector has `3 + n + 1 + 2 + 3` entries:
//!
//! | Offset | Feature |
//! |---|---|
//! | 0 | Liberal policies enacted / Liberal tiles in the deck |
//! | 1 | Fascist policies enacted / Fascist tiles in the deck |
//! | 2 | Election tracker / 3 |
//! | 3..3+n | Alive bit per seat |
//! | 3+n | Veto power active |
//! | 4+n, 5+n | Known deck: Liberal and Fascist share of tiles in circulation |
//! | 6+n..9+n | One-hot own role `[Liberal, Fascist, Hitler]` |

use crate::core::{DeckComposition, Observation, PlayerId, ELECTION_TRACKER_LIMIT};
use crate::nn::traits::EncodedState;

/// Turns an observation into model input.
///
/// Encoders only ever see an [`Observation`], so they cannot leak hidden
/// roles into the input.
pub trait StateEncoder {
    fn encode(&self, obs: &Observation) -> EncodedState;

    /// Shape of every encoded state.
    fn output_shape(&self) -> Vec<usize>;

    fn player_count(&self) -> usize;
}

/// Flat feature encoder.
///
/// ```
/// use secret_hitler_rl::nn::{FeatureEncoder, StateEncoder};
///
/// let encoder = FeatureEncoder::new(7);
/// assert_eq!(encoder.feature_len(), 3 + 7 + 1 + 2 + 3);
/// ```
#[derive(Clone, Debug)]
pub struct FeatureEncoder {
    player_count: usize,
    deck: DeckComposition,
}

impl FeatureEncoder {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            deck: DeckComposition::default(),
        }
    }

    /// Normalize policy counts against a non-standard deck.
    #[must_use]
    pub fn with_deck(mut self, deck: DeckComposition) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn feature_len(&self) -> usize {
        3 + self.player_count + 1 + 2 + 3
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

impl StateEncoder for FeatureEncoder {
    fn encode(&self, obs: &Observation) -> EncodedState {
        let public = &obs.public;
        let mut tensor = Vec::with_capacity(self.feature_len());

        tensor.push(ratio(usize::from(public.liberal_enacted), self.deck.liberal));
        tensor.push(ratio(usize::from(public.fascist_enacted), self.deck.fascist));
        tensor.push(ratio(
            usize::from(public.election_tracker),
            usize::from(ELECTION_TRACKER_LIMIT),
        ));

        for seat in PlayerId::all(self.player_count) {
            tensor.push(if public.is_alive(seat) { 1.0 } else { 0.0 });
        }

        tensor.push(if public.veto_active { 1.0 } else { 0.0 });

        let known = public.known_deck;
        tensor.push(ratio(known.liberal, known.total()));
        tensor.push(ratio(known.fascist, known.total()));

        let mut role = [0.0f32; 3];
        role[obs.role.one_hot_index()] = 1.0;
        tensor.extend_from_slice(&role);

        EncodedState::flat(tensor)
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![self.feature_len()]
    }

    fn player_count(&self) -> usize {
        self.player_count
    }
}
