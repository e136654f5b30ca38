//! Team and game sheets
//!
//! A sheet describes a roster in rate-stat form. Building a game from two
//! sheets runs every batter through the card generator, picks the starter
//! from the rotation, and produces a validated `RunGameConfig`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, Hand};
use crate::card::PlayerCard;
use crate::config::{
    ConfigError, LineupEntry, Position, RunGameConfig, TeamSide, DEFAULT_MAX_INNINGS,
};
use crate::generator::{generate_player_card, BattingRates, RatesError};
use crate::manager::ManagerStyle;
use crate::pitching::{get_next_starter, PitcherCard};
use crate::strategy::OutcomeResolution;

/// One batter in rate-stat form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatterSheet {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub archetype: Archetype,
    #[serde(default)]
    pub bats: Hand,
    pub rates: BattingRates,
}

impl BatterSheet {
    pub fn to_player_card(&self) -> Result<PlayerCard, SheetError> {
        generate_player_card(&self.player_id, &self.name, &self.rates, self.archetype, self.bats).map_err(
            |source| SheetError::Rates {
                player_id: self.player_id.clone(),
                source,
            },
        )
    }
}

/// A team's roster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub team_id: String,
    #[serde(default)]
    pub manager_style: ManagerStyle,
    /// Batting order, DH included
    pub lineup: Vec<BatterSheet>,
    #[serde(default)]
    pub bench: Vec<BatterSheet>,
    pub rotation: Vec<PitcherCard>,
    #[serde(default)]
    pub bullpen: Vec<PitcherCard>,
    #[serde(default)]
    pub closer: Option<PitcherCard>,
}

/// Rules shared by both teams
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    #[serde(default = "default_true")]
    pub designated_hitter: bool,
    #[serde(default)]
    pub resolution: OutcomeResolution,
    #[serde(default = "default_max_innings")]
    pub max_innings: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            designated_hitter: true,
            resolution: OutcomeResolution::default(),
            max_innings: DEFAULT_MAX_INNINGS,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_innings() -> u32 {
    DEFAULT_MAX_INNINGS
}

/// A single game between two sheets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSheet {
    pub game_id: String,
    pub seed: u64,
    pub home: TeamSheet,
    pub away: TeamSheet,
    /// Index into each rotation
    #[serde(default)]
    pub game_number: usize,
    #[serde(flatten)]
    pub options: GameOptions,
}

/// Failure turning sheets into a game configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SheetError {
    #[error("bad rates for {player_id}: {source}")]
    Rates {
        player_id: String,
        #[source]
        source: RatesError,
    },

    #[error("team {0} has an empty rotation")]
    EmptyRotation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

struct BuiltTeam {
    lineup: Vec<LineupEntry>,
    cards: BTreeMap<String, PlayerCard>,
    bench: Vec<PlayerCard>,
    starter: PitcherCard,
}

impl TeamSheet {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading team sheet {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing team sheet {}", path.display()))
    }

    fn build(&self, game_number: usize, designated_hitter: bool) -> Result<BuiltTeam, SheetError> {
        let starter = get_next_starter(&self.rotation, game_number)
            .cloned()
            .ok_or_else(|| SheetError::EmptyRotation(self.team_id.clone()))?;

        let mut lineup = Vec::with_capacity(self.lineup.len());
        let mut cards = BTreeMap::new();
        for batter in &self.lineup {
            if batter.position == Position::DesignatedHitter && !designated_hitter {
                lineup.push(LineupEntry {
                    player_id: starter.pitcher_id.clone(),
                    player_name: starter.name.clone(),
                    position: Position::Pitcher,
                });
                continue;
            }
            lineup.push(LineupEntry {
                player_id: batter.player_id.clone(),
                player_name: batter.name.clone(),
                position: batter.position,
            });
            cards.insert(batter.player_id.clone(), batter.to_player_card()?);
        }

        let bench = self
            .bench
            .iter()
            .map(BatterSheet::to_player_card)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BuiltTeam {
            lineup,
            cards,
            bench,
            starter,
        })
    }
}

/// Build a validated game configuration from two team sheets. Each team
/// starts `get_next_starter(rotation, game_number)`.
pub fn build_config(
    game_id: &str,
    seed: u64,
    home: &TeamSheet,
    away: &TeamSheet,
    game_number: usize,
    options: GameOptions,
) -> Result<RunGameConfig, SheetError> {
    let h = home.build(game_number, options.designated_hitter)?;
    let a = away.build(game_number, options.designated_hitter)?;

    // Rotation arms not starting today stay out of the bullpen
    let config = RunGameConfig {
        game_id: game_id.to_string(),
        seed,
        home_team_id: home.team_id.clone(),
        away_team_id: away.team_id.clone(),
        home_lineup: h.lineup,
        away_lineup: a.lineup,
        home_batter_cards: h.cards,
        away_batter_cards: a.cards,
        home_starting_pitcher: h.starter,
        away_starting_pitcher: a.starter,
        home_bullpen: home.bullpen.clone(),
        away_bullpen: away.bullpen.clone(),
        home_closer: home.closer.clone(),
        away_closer: away.closer.clone(),
        home_manager_style: home.manager_style,
        away_manager_style: away.manager_style,
        designated_hitter: options.designated_hitter,
        home_bench: h.bench,
        away_bench: a.bench,
        resolution: options.resolution,
        max_innings: options.max_innings,
    };
    config.validate()?;
    Ok(config)
}

impl GameSheet {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading game sheet {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing game sheet {}", path.display()))
    }

    pub fn to_config(&self) -> Result<RunGameConfig, SheetError> {
        build_config(
            &self.game_id,
            self.seed,
            &self.home,
            &self.away,
            self.game_number,
            self.options,
        )
    }

    pub fn team(&self, side: TeamSide) -> &TeamSheet {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_game;

    #[test]
    fn test_builds_valid_config() {
        let sheet = sample_game(3);
        let config = sheet.to_config().unwrap();
        assert_eq!(config.home_lineup.len(), 9);
        assert_eq!(config.home_batter_cards.len(), 9);
        assert_eq!(config.home_starting_pitcher, sheet.home.rotation[0]);
    }

    #[test]
    fn test_rotation_follows_game_number() {
        let mut sheet = sample_game(3);
        sheet.game_number = 6;
        let config = sheet.to_config().unwrap();
        let n = sheet.away.rotation.len();
        assert_eq!(config.away_starting_pitcher, sheet.away.rotation[6 % n]);
    }

    #[test]
    fn test_no_dh_puts_starter_in_lineup() {
        let mut sheet = sample_game(3);
        sheet.options.designated_hitter = false;
        let config = sheet.to_config().unwrap();
        let p = config
            .home_lineup
            .iter()
            .find(|e| e.position == Position::Pitcher)
            .unwrap();
        assert_eq!(p.player_id, config.home_starting_pitcher.pitcher_id);
        assert_eq!(config.home_batter_cards.len(), 8);
    }

    #[test]
    fn test_errors() {
        let mut sheet = sample_game(3);
        sheet.home.rotation.clear();
        assert!(matches!(sheet.to_config(), Err(SheetError::EmptyRotation(_))));

        let mut sheet = sample_game(3);
        sheet.away.lineup[0].rates.walk_rate = -1.0;
        assert!(matches!(sheet.to_config(), Err(SheetError::Rates { .. })));

        let mut sheet = sample_game(3);
        sheet.away.lineup.pop();
        assert!(matches!(sheet.to_config(), Err(SheetError::Config(ConfigError::LineupSize { .. }))));
    }

    #[test]
    fn test_json_round_trip_uses_defaults() {
        let sheet = sample_game(5);
        let json = serde_json::to_string(&sheet).unwrap();
        let back: GameSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sheet);

        let minimal = json.replace("\"designated_hitter\":true,", "");
        let back: GameSheet = serde_json::from_str(&minimal).unwrap();
        assert!(back.options.designated_hitter);
    }
}
