//! Simulate a match in virtual time.
//!
//! Plays random hands against the engine until a match ends, printing the
//! session's notifications as they happen.
//!
//! Options: --variant, --seed, --player-seed, --think-ms, --max-rounds, --config

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use rps_engine::directory::{
    Leaderboard, MemoryDirectory, UserId, UserRecord, DEFAULT_LEADERBOARD_SIZE,
};
use rps_engine::{GameConfig, GameRng, GameSession, SessionEvent};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// Fixed rules, simple scoring
    Classic,
    /// Rules flip every period, competitive scoring
    Flipping,
}

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Play a simulated Rock-Paper-Scissors match")]
struct Args {
    /// Game variant (ignored when --config is given)
    #[arg(long, value_enum, default_value_t = Variant::Flipping)]
    variant: Variant,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the computer opponent
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seed for the simulated player's hands
    #[arg(long, default_value_t = 7)]
    player_seed: u64,

    /// Idle time between rounds, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    think_ms: u64,

    /// Give up after this many rounds
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameConfig::from_json(&json)?
        }
        None => match args.variant {
            Variant::Classic => GameConfig::classic(),
            Variant::Flipping => GameConfig::flipping(),
        },
    };
    Ok(config.with_seed(args.seed))
}

fn print_event(now: u64, event: &SessionEvent) {
    match event {
        SessionEvent::CountdownTick(n) => log::debug!("[{now:>7}ms] countdown {n}"),
        SessionEvent::FlipCountdown(n) => log::debug!("[{now:>7}ms] next flip in {n}s"),
        SessionEvent::RuleNoticeExpired(_) => {}
        SessionEvent::RuleChanged(rule) => println!("[{now:>7}ms] {}", rule.banner()),
        SessionEvent::RoundResolved(r) => println!(
            "[{:>7}ms] round {:>3}: {} vs {} ({}) -> {:?}  score {}",
            r.at_ms, r.round, r.player, r.opponent, r.rule, r.outcome, r.scores
        ),
        SessionEvent::RoundAborted => println!("[{now:>7}ms] round aborted"),
        SessionEvent::MatchOver { winner, scores } => {
            println!("[{now:>7}ms] match over: {winner} wins {scores}");
        }
        SessionEvent::MatchReset => println!("[{now:>7}ms] new match"),
        SessionEvent::HighScoreSaved(score) => println!("[{now:>7}ms] new high score {score}"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let player = UserId::new("sim");
    let directory = MemoryDirectory::new()
        .with_user(UserRecord::new(player.clone(), "Simulator", "sim@example.com"))
        .with_user(
            UserRecord::new(UserId::new("rival"), "Rival", "rival@example.com").with_score(3),
        );

    let round_ms = config.countdown.total_ms();
    let reset_ms = config.post_match_delay_ms;
    let mut session = GameSession::new(config, directory)?.with_user(player.clone());
    let mut hands = GameRng::new(args.player_seed);
    session.start();

    let mut finished = false;
    while !finished && session.rounds_played() < args.max_rounds {
        session.advance_by(args.think_ms);
        session.submit_choice(hands.choice());
        session.advance_by(round_ms);

        let mut events = session.drain_events();
        if events.iter().any(|e| matches!(e, SessionEvent::MatchOver { .. })) {
            finished = true;
            session.advance_by(reset_ms);
            events.extend(session.drain_events());
        }
        for event in &events {
            print_event(session.now(), event);
        }
    }
    session.stop();

    if !finished {
        println!("no winner after {} rounds", args.max_rounds);
    }

    let board = Leaderboard::load(session.directory(), DEFAULT_LEADERBOARD_SIZE, Some(&player))?;
    println!("\nLeaderboard");
    for entry in board.entries() {
        let marker = if entry.is_current_user { "*" } else { " " };
        println!("{marker}{:>3} {:<12} {}", entry.badge.to_string(), entry.name, entry.score);
    }
    Ok(())
}
