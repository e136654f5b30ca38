//! Game configuration: the input boundary of the core
//!
//! A `RunGameConfig` is checked once by `validate()` before any simulation
//! starts; a game never runs on a roster that fails these checks.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{CardError, PlayerCard, PlayerId};
use crate::manager::ManagerStyle;
use crate::pitching::PitcherCard;
use crate::strategy::OutcomeResolution;

/// Batters in a lineup
pub const LINEUP_SIZE: usize = 9;

/// Extra-inning cap when none is configured
pub const DEFAULT_MAX_INNINGS: u32 = 25;

/// Regulation length of a game
pub const REGULATION_INNINGS: u32 = 9;

/// Defensive position (or DH)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    Shortstop,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "DH")]
    DesignatedHitter,
    #[serde(rename = "P")]
    Pitcher,
}

/// The eight positions every lineup fields
pub const FIELD_POSITIONS: [Position; 8] = [
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::Shortstop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
];

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::Shortstop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::Pitcher => "P",
        };
        write!(f, "{}", s)
    }
}

/// Home or away
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Away,
    Home,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Away => TeamSide::Home,
            TeamSide::Home => TeamSide::Away,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Away => write!(f, "away"),
            TeamSide::Home => write!(f, "home"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub position: Position,
}

/// Configuration rejected before the game starts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{team} lineup has {found} entries, expected 9")]
    LineupSize { team: TeamSide, found: usize },

    #[error("{team} lineup positions are wrong: {detail}")]
    LineupPositions { team: TeamSide, detail: String },

    #[error("{team} lineup lists player {player_id} more than once")]
    DuplicatePlayer { team: TeamSide, player_id: PlayerId },

    #[error("{team} has no batter card for {player_id}")]
    MissingBatterCard { team: TeamSide, player_id: PlayerId },

    #[error("invalid card for {player_id}: {source}")]
    InvalidCard {
        player_id: PlayerId,
        #[source]
        source: CardError,
    },

    #[error("{team} pitcher spot names {player_id}, but {pitcher_id} is starting")]
    PitcherSpot {
        team: TeamSide,
        player_id: PlayerId,
        pitcher_id: PlayerId,
    },

    #[error("player id {player_id} is used by more than one roster spot")]
    SharedPlayerId { player_id: PlayerId },

    #[error("{team} staff lists pitcher {pitcher_id} more than once")]
    DuplicatePitcher { team: TeamSide, pitcher_id: PlayerId },

    #[error("pitcher {pitcher_id} has grade 0")]
    ZeroGrade { pitcher_id: PlayerId },

    #[error("max_innings must be at least 9, got {0}")]
    MaxInnings(u32),
}

fn default_true() -> bool {
    true
}

fn default_max_innings() -> u32 {
    DEFAULT_MAX_INNINGS
}

/// Everything one game needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunGameConfig {
    pub game_id: String,
    pub seed: u64,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_lineup: Vec<LineupEntry>,
    pub away_lineup: Vec<LineupEntry>,
    pub home_batter_cards: BTreeMap<PlayerId, PlayerCard>,
    pub away_batter_cards: BTreeMap<PlayerId, PlayerCard>,
    pub home_starting_pitcher: PitcherCard,
    pub away_starting_pitcher: PitcherCard,
    #[serde(default)]
    pub home_bullpen: Vec<PitcherCard>,
    #[serde(default)]
    pub away_bullpen: Vec<PitcherCard>,
    #[serde(default)]
    pub home_closer: Option<PitcherCard>,
    #[serde(default)]
    pub away_closer: Option<PitcherCard>,
    #[serde(default)]
    pub home_manager_style: ManagerStyle,
    #[serde(default)]
    pub away_manager_style: ManagerStyle,
    /// When false the lineup carries P instead of DH and the pitcher bats
    #[serde(default = "default_true")]
    pub designated_hitter: bool,
    #[serde(default)]
    pub home_bench: Vec<PlayerCard>,
    #[serde(default)]
    pub away_bench: Vec<PlayerCard>,
    #[serde(default)]
    pub resolution: OutcomeResolution,
    #[serde(default = "default_max_innings")]
    pub max_innings: u32,
}

/// Borrowed view of one side of a config
#[derive(Clone, Copy, Debug)]
pub struct TeamConfig<'a> {
    pub side: TeamSide,
    pub team_id: &'a str,
    pub lineup: &'a [LineupEntry],
    pub batter_cards: &'a BTreeMap<PlayerId, PlayerCard>,
    pub starting_pitcher: &'a PitcherCard,
    pub bullpen: &'a [PitcherCard],
    pub closer: Option<&'a PitcherCard>,
    pub manager_style: ManagerStyle,
    pub bench: &'a [PlayerCard],
}

impl RunGameConfig {
    pub fn team(&self, side: TeamSide) -> TeamConfig<'_> {
        match side {
            TeamSide::Home => TeamConfig {
                side,
                team_id: &self.home_team_id,
                lineup: &self.home_lineup,
                batter_cards: &self.home_batter_cards,
                starting_pitcher: &self.home_starting_pitcher,
                bullpen: &self.home_bullpen,
                closer: self.home_closer.as_ref(),
                manager_style: self.home_manager_style,
                bench: &self.home_bench,
            },
            TeamSide::Away => TeamConfig {
                side,
                team_id: &self.away_team_id,
                lineup: &self.away_lineup,
                batter_cards: &self.away_batter_cards,
                starting_pitcher: &self.away_starting_pitcher,
                bullpen: &self.away_bullpen,
                closer: self.away_closer.as_ref(),
                manager_style: self.away_manager_style,
                bench: &self.away_bench,
            },
        }
    }

    /// All construction-time checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_innings < REGULATION_INNINGS {
            return Err(ConfigError::MaxInnings(self.max_innings));
        }
        for side in [TeamSide::Away, TeamSide::Home] {
            self.team(side).validate(self.designated_hitter)?;
        }

        // Box-score lines are keyed by player id alone
        let mut ids = BTreeSet::new();
        for side in [TeamSide::Away, TeamSide::Home] {
            for id in self.team(side).player_ids() {
                if !ids.insert(id) {
                    return Err(ConfigError::SharedPlayerId {
                        player_id: id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<'a> TeamConfig<'a> {
    /// Every id this side can put on a box-score line. The no-DH pitcher
    /// spot bats under the starter's id, so it is not listed twice.
    pub fn player_ids(self) -> impl Iterator<Item = &'a str> + 'a {
        let batters = self
            .lineup
            .iter()
            .filter(|e| e.position != Position::Pitcher)
            .map(|e| e.player_id.as_str());
        let bench = self.bench.iter().map(|p| p.player_id.as_str());
        let staff = std::iter::once(self.starting_pitcher)
            .chain(self.bullpen.iter())
            .chain(self.closer)
            .map(|p| p.pitcher_id.as_str());
        batters.chain(bench).chain(staff)
    }

    fn validate(&self, designated_hitter: bool) -> Result<(), ConfigError> {
        let team = self.side;
        if self.lineup.len() != LINEUP_SIZE {
            return Err(ConfigError::LineupSize {
                team,
                found: self.lineup.len(),
            });
        }

        let ninth = if designated_hitter {
            Position::DesignatedHitter
        } else {
            Position::Pitcher
        };
        let expected: BTreeSet<Position> = FIELD_POSITIONS.iter().copied().chain([ninth]).collect();
        let found: BTreeSet<Position> = self.lineup.iter().map(|e| e.position).collect();
        if found != expected {
            let missing: Vec<String> = expected.difference(&found).map(|p| p.to_string()).collect();
            let extra: Vec<String> = found.difference(&expected).map(|p| p.to_string()).collect();
            let detail = if missing.is_empty() && extra.is_empty() {
                "a position is listed twice".to_string()
            } else {
                format!("missing [{}], unexpected [{}]", missing.join(", "), extra.join(", "))
            };
            return Err(ConfigError::LineupPositions { team, detail });
        }

        let mut seen = BTreeSet::new();
        for entry in self.lineup {
            if !seen.insert(entry.player_id.as_str()) {
                return Err(ConfigError::DuplicatePlayer {
                    team,
                    player_id: entry.player_id.clone(),
                });
            }
            if entry.position == Position::Pitcher {
                if entry.player_id != self.starting_pitcher.pitcher_id {
                    return Err(ConfigError::PitcherSpot {
                        team,
                        player_id: entry.player_id.clone(),
                        pitcher_id: self.starting_pitcher.pitcher_id.clone(),
                    });
                }
                continue;
            }
            let card = self
                .batter_cards
                .get(&entry.player_id)
                .ok_or_else(|| ConfigError::MissingBatterCard {
                    team,
                    player_id: entry.player_id.clone(),
                })?;
            card.validate().map_err(|source| ConfigError::InvalidCard {
                player_id: entry.player_id.clone(),
                source,
            })?;
        }

        for bench in self.bench {
            bench.validate().map_err(|source| ConfigError::InvalidCard {
                player_id: bench.player_id.clone(),
                source,
            })?;
        }

        let mut staff = BTreeSet::new();
        let pitchers = std::iter::once(self.starting_pitcher)
            .chain(self.bullpen.iter())
            .chain(self.closer);
        for p in pitchers {
            if p.grade == 0 {
                return Err(ConfigError::ZeroGrade {
                    pitcher_id: p.pitcher_id.clone(),
                });
            }
            if !staff.insert(p.pitcher_id.as_str()) {
                return Err(ConfigError::DuplicatePitcher {
                    team,
                    pitcher_id: p.pitcher_id.clone(),
                });
            }
        }
        Ok(())
    }
}
