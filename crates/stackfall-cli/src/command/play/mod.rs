use std::time::Duration;

use rand::Rng as _;
use stackfall_engine::{GameEngine, ShapeSeed};
use stackfall_runtime::Runtime;
use tracing::info;

use crate::{command::play::app::PlayApp, ui::widgets::format_score};

mod app;

const DEFAULT_TICK_MS: u64 = 500;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Gravity interval in milliseconds
    #[clap(
        long,
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    tick_ms: u64,
    /// Seed for the shape sequence, as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<ShapeSeed>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            seed: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { tick_ms, seed } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let tick = Duration::from_millis(*tick_ms);
    info!(%seed, ?tick, "starting game");

    let mut app = PlayApp::new(GameEngine::with_seed(seed), tick);
    Runtime::new().run(&mut app)?;

    let stats = app.engine().stats();
    info!(
        score = stats.score(),
        cleared_rows = stats.cleared_rows(),
        locked_shapes = stats.locked_shapes(),
        "game ended"
    );
    println!("Score: {}", format_score(stats.score()));
    println!("Seed:  {seed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        play: PlayArg,
    }

    #[test]
    fn test_defaults() {
        let Cli { play } = Cli::try_parse_from(["play"]).unwrap();
        assert_eq!(play.tick_ms, 500);
        assert_eq!(play.seed, None);
    }

    #[test]
    fn test_seed_and_tick() {
        let Cli { play } = Cli::try_parse_from([
            "play",
            "--tick-ms",
            "250",
            "--seed",
            "0123456789abcdef0123456789abcdef",
        ])
        .unwrap();
        assert_eq!(play.tick_ms, 250);
        assert_eq!(
            play.seed.map(|seed| seed.to_string()).as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Cli::try_parse_from(["play", "--tick-ms", "0"]).is_err());
        assert!(Cli::try_parse_from(["play", "--seed", "xyz"]).is_err());
    }
}
