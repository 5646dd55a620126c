//! Self-play bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::prelude::*;

use crate::core::Team;
use crate::training::{random_agents, NullSink, RunStats, SelfPlayConfig, SelfPlayRunner};

use super::value_error;

type Batch<'py> = (
    Bound<'py, PyArray2<f32>>,
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<f32>>,
    Bound<'py, PyArray2<f32>>,
    Bound<'py, PyArray1<bool>>,
);

/// Batches of random-agent games, returned as numpy arrays.
#[pyclass(name = "SelfPlay", unsendable)]
pub struct PySelfPlay {
    runner: SelfPlayRunner,
    stats: RunStats,
}

#[pymethods]
impl PySelfPlay {
    /// # Arguments
    /// - player_count: Number of players (5-10)
    /// - games: Games per call to `run`
    /// - seed_offset: Seed of the first game
    /// - max_actions: Cap on actions per game
    #[new]
    #[pyo3(signature = (player_count = 7, games = 100, seed_offset = 0, max_actions = 2000))]
    fn new(player_count: usize, games: usize, seed_offset: u64, max_actions: usize) -> Self {
        let config = SelfPlayConfig::default()
            .with_player_count(player_count)
            .with_games(games)
            .with_seed_offset(seed_offset)
            .with_max_actions(max_actions);
        Self {
            runner: SelfPlayRunner::new(config),
            stats: RunStats::default(),
        }
    }

    /// Play a batch and return (states, actions, rewards, next_states, dones).
    ///
    /// `actions` holds global action indices.
    fn run<'py>(&mut self, py: Python<'py>) -> PyResult<Batch<'py>> {
        let report = self.runner.run(random_agents, &mut NullSink);
        let dim = self.runner.encoder().feature_len();

        let transitions: Vec<_> = report
            .trajectories
            .iter()
            .flat_map(|t| t.transitions.iter())
            .collect();
        let n = transitions.len();

        let mut states = Vec::with_capacity(n * dim);
        let mut next_states = Vec::with_capacity(n * dim);
        let mut actions = Vec::with_capacity(n);
        let mut rewards = Vec::with_capacity(n);
        let mut dones = Vec::with_capacity(n);
        for t in &transitions {
            states.extend_from_slice(t.state.as_slice());
            next_states.extend_from_slice(t.next_state.as_slice());
            actions.push(t.action_index as i64);
            rewards.push(t.reward as f32);
            dones.push(t.done);
        }
        self.stats = report.stats;

        let states = PyArray1::from_vec_bound(py, states)
            .reshape([n, dim])
            .map_err(value_error)?;
        let next_states = PyArray1::from_vec_bound(py, next_states)
            .reshape([n, dim])
            .map_err(value_error)?;
        Ok((
            states,
            PyArray1::from_vec_bound(py, actions),
            PyArray1::from_vec_bound(py, rewards),
            next_states,
            PyArray1::from_vec_bound(py, dones),
        ))
    }

    #[getter]
    fn games_played(&self) -> usize {
        self.stats.games_played
    }

    #[getter]
    fn games_failed(&self) -> usize {
        self.stats.games_failed
    }

    #[getter]
    fn liberal_win_rate(&self) -> f64 {
        self.stats.win_rate(Team::Liberals)
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.runner.action_space().size()
    }

    fn __repr__(&self) -> String {
        let config = self.runner.config();
        format!(
            "SelfPlay(players={}, games={}, seed_offset={})",
            config.player_count, config.games, config.seed_offset
        )
    }
}
