//! Batch simulation driver.
//!
//! Plays random-agent games and reports the outcome distribution. Per-game
//! summaries can be written to a bincode file for later analysis.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;

use secret_hitler_rl::core::{Team, WinReason};
use secret_hitler_rl::training::{
    random_agents, BincodeSink, MemorySink, RunStats, SelfPlayConfig, SelfPlayRunner, SummarySink,
};

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Play batches of random-agent games and report outcomes", long_about = None)]
struct Cli {
    /// Players per table (5-10)
    #[arg(short, long, default_value_t = 7)]
    players: usize,

    /// Number of games
    #[arg(short, long, default_value_t = 1000)]
    games: usize,

    /// Seed of the first game; game i uses seed + i
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Term limits stop applying once fewer players than this are alive
    #[arg(long, default_value_t = secret_hitler_rl::core::DEFAULT_TERM_LIMIT_RELAXATION)]
    relax_below: usize,

    /// Write per-game summaries here (bincode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every game event at debug level
    #[arg(long)]
    log_events: bool,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    if let Err(err) = simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("logger already initialised: {err}");
    }
}

fn report(stats: &RunStats) {
    println!("games played:    {}", stats.games_played);
    println!("games dropped:   {}", stats.games_failed);
    println!("games truncated: {}", stats.games_truncated);
    println!(
        "liberal wins:    {} ({:.1}%)",
        stats.liberal_wins,
        100.0 * stats.win_rate(Team::Liberals)
    );
    println!(
        "fascist wins:    {} ({:.1}%)",
        stats.fascist_wins,
        100.0 * stats.win_rate(Team::Fascists)
    );
    for reason in [
        WinReason::LiberalPolicies,
        WinReason::HitlerExecuted,
        WinReason::FascistPolicies,
        WinReason::HitlerElected,
    ] {
        let count = stats.reasons.get(&reason).copied().unwrap_or(0);
        println!("  {reason}: {count}");
    }
    if stats.games_played > 0 {
        println!(
            "mean actions per game: {:.1}",
            stats.actions as f64 / stats.games_played as f64
        );
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = SelfPlayConfig::default()
        .with_player_count(cli.players)
        .with_games(cli.games)
        .with_seed_offset(cli.seed)
        .with_term_limit_relaxation(cli.relax_below)
        .with_learner_seats(Vec::new())
        .with_event_logging(cli.log_events);
    let runner = SelfPlayRunner::new(config);

    let mut sink: Box<dyn SummarySink> = match &cli.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BincodeSink::new(BufWriter::new(file))),
            Err(err) => {
                log::error!("cannot create {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => Box::new(MemorySink::new()),
    };

    let run = runner.run(random_agents, sink.as_mut());
    report(&run.stats);

    if let Some(path) = &cli.output {
        log::info!("summaries written to {}", path.display());
    }
}
