//! Win conditions.
//!
//! Evaluated in priority order; the first match ends the game.
//!
//! 1. Five Liberal policies.
//! 2. Six Fascist policies.
//! 3. Three or more Fascist policies and Hitler is the chancellor in office.
//! 4. Hitler was executed.

use crate::core::{GameSession, PlayerMap, PlayerRecord, WinReason};

/// Liberal policies needed to win.
pub const LIBERAL_TRACK: u8 = 5;
/// Fascist policies needed to win.
pub const FASCIST_TRACK: u8 = 6;
/// Fascist policies after which electing Hitler chancellor wins.
pub const HITLER_ZONE: u8 = 3;

/// Check the session for a win. Pure: calling it twice gives the same answer.
#[must_use]
pub fn evaluate(session: &GameSession, players: &PlayerMap<PlayerRecord>) -> Option<WinReason> {
    if session.liberal_enacted >= LIBERAL_TRACK {
        return Some(WinReason::LiberalPolicies);
    }
    if session.fascist_enacted >= FASCIST_TRACK {
        return Some(WinReason::FascistPolicies);
    }
    let hitler_in_office = session
        .government
        .and_then(|g| players.try_get(g.chancellor))
        .is_some_and(|record| record.role.is_hitler());
    if session.fascist_enacted >= HITLER_ZONE && hitler_in_office {
        return Some(WinReason::HitlerElected);
    }
    if session.hitler_assassinated {
        return Some(WinReason::HitlerExecuted);
    }
    None
}
