//! Step-wise environment for Python.

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::core::{GameConfig, PlayerId};
use crate::nn::{ActionSpace, FeatureEncoder, StateEncoder};
use crate::rules::Engine;
use crate::training::{DefaultReward, RewardFn};

use super::value_error;

/// One table, driven one action at a time.
///
/// Actions are indices into the table's global action space; `legal_actions`
/// lists the ones the pending seat may take.
#[pyclass(name = "Game", unsendable)]
pub struct PyGame {
    engine: Engine,
    encoder: FeatureEncoder,
    space: ActionSpace,
    reward: DefaultReward,
}

impl PyGame {
    fn seat(&self, player: u8) -> PyResult<PlayerId> {
        let seat = PlayerId::new(player);
        if seat.index() >= self.engine.config().player_count {
            return Err(value_error(format!("no seat {player}")));
        }
        Ok(seat)
    }
}

#[pymethods]
impl PyGame {
    /// Create a new table.
    ///
    /// # Arguments
    /// - player_count: Number of players (5-10)
    /// - seed: RNG seed for roles and deck
    /// - term_limit_relaxation_below: term limits stop once fewer are alive
    #[new]
    #[pyo3(signature = (player_count = 7, seed = 42, term_limit_relaxation_below = 5))]
    fn new(player_count: usize, seed: u64, term_limit_relaxation_below: usize) -> PyResult<Self> {
        let config = GameConfig::new(player_count)
            .with_seed(seed)
            .with_term_limit_relaxation(term_limit_relaxation_below);
        let engine = Engine::new(config).map_err(value_error)?;
        Ok(Self {
            engine,
            encoder: FeatureEncoder::new(player_count),
            space: ActionSpace::new(player_count),
            reward: DefaultReward::default(),
        })
    }

    /// Seat that must act next, or None once the game is over.
    fn current_player(&self) -> Option<u8> {
        self.engine.next_decision().map(|d| d.player.0)
    }

    /// Name of the pending decision, e.g. "Vote".
    fn decision(&self) -> Option<String> {
        self.engine
            .next_decision()
            .map(|d| format!("{:?}", d.kind))
    }

    /// Action indices legal for the current player.
    fn legal_actions(&self) -> Vec<usize> {
        let Some(decision) = self.engine.next_decision() else {
            return Vec::new();
        };
        self.engine
            .legal_actions(decision.player)
            .iter()
            .filter_map(|a| self.space.index(a))
            .collect()
    }

    /// Boolean mask over the whole action space.
    fn legal_mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<bool>> {
        let legal = match self.engine.next_decision() {
            Some(decision) => self.engine.legal_actions(decision.player),
            None => Vec::new(),
        };
        PyArray1::from_vec_bound(py, self.space.mask(&legal))
    }

    /// Encoded observation of `player` (default: the current player).
    #[pyo3(signature = (player = None))]
    fn observe<'py>(
        &self,
        py: Python<'py>,
        player: Option<u8>,
    ) -> PyResult<Bound<'py, PyArray1<f32>>> {
        let seat = match player {
            Some(p) => self.seat(p)?,
            None => match self.engine.next_decision() {
                Some(decision) => decision.player,
                None => return Err(value_error("game is over; pass a player")),
            },
        };
        let state = self.encoder.encode(&self.engine.observation(seat));
        Ok(PyArray1::from_slice_bound(py, state.as_slice()))
    }

    /// Apply action `action_index` for the current player.
    ///
    /// Returns (reward, done) for that player.
    fn step(&mut self, action_index: usize) -> PyResult<(f64, bool)> {
        let decision = self
            .engine
            .next_decision()
            .ok_or_else(|| value_error("game is over"))?;
        let action = self
            .space
            .action(action_index)
            .ok_or_else(|| value_error(format!("no action with index {action_index}")))?;

        let player = decision.player;
        let prev = self.engine.observation(player);
        self.engine
            .apply_action(player, action)
            .map_err(value_error)?;
        let next = self.engine.observation(player);
        let done = next.public.game_ended;
        Ok((self.reward.reward(&prev, &next, &action, done), done))
    }

    /// Describe an action index, e.g. "Nominate(P3)".
    fn describe_action(&self, action_index: usize) -> Option<String> {
        self.space.action(action_index).map(|a| format!("{a:?}"))
    }

    fn is_terminal(&self) -> bool {
        self.engine.is_terminal()
    }

    /// "Liberals" or "Fascists" once the game is over.
    fn winner(&self) -> Option<String> {
        self.engine.winner().map(|t| t.to_string())
    }

    /// Why the game ended.
    fn win_reason(&self) -> Option<String> {
        self.engine.win_reason().map(|r| r.to_string())
    }

    /// Role of a seat, for evaluation only.
    fn role(&self, player: u8) -> PyResult<String> {
        Ok(self.engine.role(self.seat(player)?).to_string())
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.space.size()
    }

    #[getter]
    fn feature_len(&self) -> usize {
        self.encoder.feature_len()
    }

    fn __repr__(&self) -> String {
        let public = self.engine.public();
        format!(
            "Game(players={}, liberal={}, fascist={}, tracker={}, over={})",
            public.player_count,
            public.liberal_enacted,
            public.fascist_enacted,
            public.election_tracker,
            public.game_ended
        )
    }
}
