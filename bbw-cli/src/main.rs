//! BBW CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game and print the box score
//! - series: Play a series with rotation cycling
//! - calibrate: Check league rates against historical ranges
//! - card: Show generated cards for a roster

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod calibrate_cmd;
mod card_cmd;
mod play_cmd;
mod series_cmd;
mod teams;

#[derive(Parser)]
#[command(name = "bbw")]
#[command(about = "Card-driven baseball game simulator")]
struct Cli {
    /// Base random seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a series between two teams
    Series(series_cmd::SeriesArgs),
    /// Run a calibration batch
    Calibrate(calibrate_cmd::CalibrateArgs),
    /// Show generated cards
    Card(card_cmd::CardArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs on stderr, results on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Series(args) => series_cmd::run(args, cli.seed),
        Commands::Calibrate(args) => calibrate_cmd::run(args, cli.seed),
        Commands::Card(args) => card_cmd::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::try_parse_from(["bbw", "--seed", "9", "play", "--json"]).unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(matches!(cli.command, Commands::Play(ref a) if a.json));

        let cli = Cli::try_parse_from(["bbw", "series", "--games", "7", "--parallel"]).unwrap();
        assert!(matches!(cli.command, Commands::Series(ref a) if a.games == 7 && a.parallel));

        let cli = Cli::try_parse_from(["bbw", "calibrate", "--no-dh", "--resolution", "weighted-table"]).unwrap();
        assert!(matches!(cli.command, Commands::Calibrate(_)));

        assert!(Cli::try_parse_from(["bbw", "play", "--resolution", "dice"]).is_err());
    }
}
