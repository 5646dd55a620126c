//! Properties that hold in every reachable state of random games.

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use secret_hitler_rl::agents::{Agent, RandomAgent};
use secret_hitler_rl::core::{Action, GameConfig, GameError, PlayerId, PlayerMap, Vote};
use secret_hitler_rl::rules::{DecisionKind, Engine};

const TILES: usize = 17;

fn conserved(engine: &Engine) -> usize {
    let session = engine.session();
    engine.deck().len()
        + engine.deck().discard_len()
        + engine.deck().held_len()
        + usize::from(session.liberal_enacted)
        + usize::from(session.fascist_enacted)
}

/// Play a full random game, checking invariants after every action.
fn check_game(player_count: usize, seed: u64) -> Result<(), TestCaseError> {
    let mut engine = Engine::new(GameConfig::new(player_count).with_seed(seed)).unwrap();
    let mut agents: Vec<RandomAgent> = PlayerId::all(player_count)
        .map(|p| RandomAgent::new(seed.wrapping_add(u64::from(p.0) * 1000)))
        .collect();
    let mut investigated: PlayerMap<FxHashSet<PlayerId>> = PlayerMap::with_default(player_count);

    prop_assert_eq!(conserved(&engine), TILES);

    let mut steps = 0;
    while let Some(decision) = engine.next_decision() {
        steps += 1;
        prop_assert!(steps < 5_000, "game did not terminate");

        if let Some(limited) = engine.session().term_limited {
            if engine.alive_count() >= engine.config().term_limit_relaxation_below {
                for action in engine.legal_actions(decision.player) {
                    if let Action::Nominate(nominee) = action {
                        prop_assert!(!limited.includes(nominee));
                    }
                }
            }
        }

        let obs = engine.observation(decision.player);
        let legal = engine.legal_actions(decision.player);
        prop_assert!(!legal.is_empty());
        let action = agents[decision.player.index()].act(&obs, &decision, &legal);
        engine.apply_action(decision.player, action).unwrap();

        let session = engine.session();
        prop_assert_eq!(conserved(&engine), TILES);
        prop_assert!(session.election_tracker <= 3);
        prop_assert_eq!(engine.public().liberal_enacted, session.liberal_enacted);
        prop_assert_eq!(engine.public().fascist_enacted, session.fascist_enacted);
        prop_assert_eq!(engine.public().draw_pile_len, engine.deck().len());
        prop_assert_eq!(engine.public().discard_len, engine.deck().discard_len());
        prop_assert_eq!(engine.public().held_len, engine.deck().held_len());
        if let Some(next) = engine.next_decision() {
            let held = engine.deck().held_len();
            match next.kind {
                DecisionKind::Discard => prop_assert_eq!(held, 3),
                DecisionKind::Enact | DecisionKind::VetoConsent => prop_assert_eq!(held, 2),
                _ => prop_assert_eq!(held, 0),
            }
        }

        for (player, record) in engine.players().iter() {
            prop_assert!(!record.investigated.contains(&player));
            prop_assert!(investigated[player].is_subset(&record.investigated));
            investigated[player] = record.investigated.clone();
        }
    }

    // Terminal is frozen.
    prop_assert!(engine.is_terminal());
    let winner = engine.winner();
    prop_assert!(winner.is_some());
    prop_assert_eq!(engine.evaluate_win(), engine.win_reason());
    prop_assert_eq!(engine.evaluate_win(), engine.win_reason());
    let session = engine.session().clone();
    for player in PlayerId::all(player_count) {
        let err = engine.apply_action(player, Action::Vote(Vote::Ja));
        prop_assert_eq!(err, Err(GameError::PostTerminalMutation));
    }
    prop_assert_eq!(engine.session(), &session);
    prop_assert_eq!(engine.winner(), winner);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_games_keep_invariants(seed in any::<u64>(), player_count in 5usize..=10) {
        check_game(player_count, seed)?;
    }

    #[test]
    fn prop_same_seed_same_game(seed in any::<u64>()) {
        let play = |seed: u64| {
            let mut engine = Engine::new(GameConfig::new(7).with_seed(seed)).unwrap();
            let mut agents: Vec<RandomAgent> =
                PlayerId::all(7).map(|p| RandomAgent::new(seed ^ u64::from(p.0))).collect();
            while let Some(decision) = engine.next_decision() {
                let obs = engine.observation(decision.player);
                let legal = engine.legal_actions(decision.player);
                let action = agents[decision.player.index()].act(&obs, &decision, &legal);
                engine.apply_action(decision.player, action).unwrap();
            }
            (engine.action_history().clone(), engine.session().clone())
        };
        prop_assert_eq!(play(seed), play(seed));
    }
}

#[test]
fn test_invariants_on_fixed_seeds() {
    for seed in 0..50 {
        check_game(5 + (seed as usize % 6), seed).unwrap();
    }
}
