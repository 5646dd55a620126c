//! Python bindings.
//!
//! # Quick Start
//!
//! ```python
//! import secret_hitler_rl as sh
//!
//! game = sh.Game(player_count=7, seed=42)
//! while not game.is_terminal():
//!     legal = game.legal_actions()
//!     reward, done = game.step(legal[0])
//!
//! runner = sh.SelfPlay(player_count=7, games=100)
//! states, actions, rewards, next_states, dones = runner.run()
//! ```

use pyo3::prelude::*;

mod py_game;
mod py_self_play;

pub use py_game::PyGame;
pub use py_self_play::PySelfPlay;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

/// secret_hitler_rl: step-wise game environment and self-play data generation.
#[pymodule]
fn secret_hitler_rl(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGame>()?;
    m.add_class::<PySelfPlay>()?;
    Ok(())
}
