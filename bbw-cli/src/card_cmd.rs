//! Card command - generate and show player cards

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use bbw_core::generator::pitcher_batting_player;
use bbw_core::sample::{harbor, mesa};
use bbw_core::{Hand, PlayerCard, TeamSheet};

#[derive(Args, Debug)]
pub struct CardArgs {
    /// Team sheet JSON file (both built-in clubs if omitted)
    #[arg(long, value_name = "FILE")]
    pub team: Option<PathBuf>,

    /// Only this player id
    #[arg(long)]
    pub player: Option<String>,

    /// Show the fixed pitcher batting card instead
    #[arg(long)]
    pub pitcher: bool,

    /// Output cards as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CardArgs) -> Result<()> {
    let cards = if args.pitcher {
        vec![pitcher_batting_player("pitcher", "Pitcher", Hand::Right)]
    } else {
        let teams = match &args.team {
            Some(path) => vec![TeamSheet::load(path)?],
            None => vec![harbor(), mesa()],
        };
        collect_cards(&teams, args.player.as_deref())?
    };

    if cards.is_empty() {
        bail!("no player matched");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        for card in &cards {
            print!("{}", format_card(card));
        }
    }
    Ok(())
}

fn collect_cards(teams: &[TeamSheet], player: Option<&str>) -> Result<Vec<PlayerCard>> {
    let mut cards = Vec::new();
    for team in teams {
        for batter in team.lineup.iter().chain(team.bench.iter()) {
            if player.is_some_and(|id| id != batter.player_id) {
                continue;
            }
            let card = batter
                .to_player_card()
                .with_context(|| format!("Team {}", team.team_id))?;
            cards.push(card);
        }
    }
    Ok(cards)
}

fn format_card(player: &PlayerCard) -> String {
    let mut out = format!(
        "\n{} ({})  {:?}, bats {:?}\npower {}  speed {:.2}  ops {:.3}  contact {:.3}\n",
        player.name,
        player.player_id,
        player.archetype,
        player.bats,
        player.card.power_tier(),
        player.speed,
        player.ops,
        player.contact_rate
    );
    for (r, values) in player.card.slots().chunks(7).enumerate() {
        let cells: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:>2}:{:>2}", r * 7 + i, v.get()))
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out
}
