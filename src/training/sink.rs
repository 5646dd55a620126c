//! Per-game summaries and where they go.
//!
//! A sink receives one [`GameSummary`] per finished game. Recording is
//! fire-and-forget: a failed write is logged and the run continues.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::core::{Team, WinReason};
use crate::rules::Engine;

/// Outcome of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub winner: Option<Team>,
    pub win_reason: Option<WinReason>,
    pub liberal_enacted: u8,
    pub fascist_enacted: u8,
    pub hitler_assassinated: bool,
    /// Committed actions.
    pub actions: usize,
    pub rounds: u32,
}

impl GameSummary {
    #[must_use]
    pub fn from_engine(engine: &Engine) -> Self {
        let session = engine.session();
        Self {
            seed: engine.config().seed,
            winner: session.winner,
            win_reason: session.win_reason,
            liberal_enacted: session.liberal_enacted,
            fascist_enacted: session.fascist_enacted,
            hitler_assassinated: session.hitler_assassinated,
            actions: engine.action_history().len(),
            rounds: session.round,
        }
    }
}

/// Receives game summaries.
pub trait SummarySink {
    fn record(&mut self, summary: &GameSummary);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SummarySink for NullSink {
    fn record(&mut self, _summary: &GameSummary) {}
}

/// Keeps summaries in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub summaries: Vec<GameSummary>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn wins(&self, team: Team) -> usize {
        self.summaries
            .iter()
            .filter(|s| s.winner == Some(team))
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

impl SummarySink for MemorySink {
    fn record(&mut self, summary: &GameSummary) {
        self.summaries.push(summary.clone());
    }
}

/// Writes summaries back to back in bincode format.
///
/// ```
/// use secret_hitler_rl::training::{read_summaries, BincodeSink, GameSummary, SummarySink};
///
/// let mut sink = BincodeSink::new(Vec::new());
/// sink.record(&GameSummary {
///     seed: 3,
///     winner: None,
///     win_reason: None,
///     liberal_enacted: 0,
///     fascist_enacted: 0,
///     hitler_assassinated: false,
///     actions: 0,
///     rounds: 1,
/// });
/// let bytes = sink.into_inner();
/// let summaries = read_summaries(bytes.as_slice()).unwrap();
/// assert_eq!(summaries[0].seed, 3);
/// ```
#[derive(Debug)]
pub struct BincodeSink<W: Write> {
    writer: W,
    written: usize,
    failed: usize,
}

impl<W: Write> BincodeSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: 0,
        }
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn flush(&mut self) {
        if let Err(err) = self.writer.flush() {
            log::error!("failed to flush summary sink: {err}");
        }
    }

    pub fn into_inner(mut self) -> W {
        self.flush();
        self.writer
    }
}

impl<W: Write> SummarySink for BincodeSink<W> {
    fn record(&mut self, summary: &GameSummary) {
        match bincode::serialize_into(&mut self.writer, summary) {
            Ok(()) => self.written += 1,
            Err(err) => {
                self.failed += 1;
                log::error!("failed to write summary for seed {}: {err}", summary.seed);
            }
        }
    }
}

/// Read every summary from a stream produced by [`BincodeSink`].
pub fn read_summaries<R: Read>(mut reader: R) -> Result<Vec<GameSummary>, bincode::Error> {
    let mut summaries = Vec::new();
    loop {
        match bincode::deserialize_from(&mut reader) {
            Ok(summary) => summaries.push(summary),
            Err(err) => match *err {
                bincode::ErrorKind::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Ok(summaries);
                }
                _ => return Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(seed: u64, winner: Team) -> GameSummary {
        GameSummary {
            seed,
            winner: Some(winner),
            win_reason: Some(match winner {
                Team::Liberals => WinReason::LiberalPolicies,
                Team::Fascists => WinReason::FascistPolicies,
            }),
            liberal_enacted: 5,
            fascist_enacted: 2,
            hitler_assassinated: false,
            actions: 40,
            rounds: 9,
        }
    }

    #[test]
    fn test_memory_sink_counts_wins() {
        let mut sink = MemorySink::new();
        sink.record(&summary(1, Team::Liberals));
        sink.record(&summary(2, Team::Fascists));
        sink.record(&summary(3, Team::Liberals));
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.wins(Team::Liberals), 2);
        assert_eq!(sink.wins(Team::Fascists), 1);
    }

    #[test]
    fn test_bincode_sink_stream() {
        let mut sink = BincodeSink::new(Vec::new());
        sink.record(&summary(1, Team::Liberals));
        sink.record(&summary(2, Team::Fascists));
        assert_eq!(sink.written(), 2);

        let bytes = sink.into_inner();
        let back = read_summaries(bytes.as_slice()).unwrap();
        assert_eq!(back, vec![summary(1, Team::Liberals), summary(2, Team::Fascists)]);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        let mut sink = BincodeSink::new(FailingWriter);
        sink.record(&summary(1, Team::Liberals));
        assert_eq!(sink.written(), 0);
        assert_eq!(sink.failed(), 1);
    }

    #[test]
    fn test_summary_from_engine() {
        use crate::core::GameConfig;

        let engine = Engine::new(GameConfig::new(5).with_seed(12)).unwrap();
        let summary = GameSummary::from_engine(&engine);
        assert_eq!(summary.seed, 12);
        assert_eq!(summary.winner, None);
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.actions, 0);
    }
}
