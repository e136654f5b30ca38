//! Box score: the output boundary of the core

use serde::{Deserialize, Serialize};

use crate::card::PlayerId;
use crate::config::TeamSide;

/// One batter's line
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingLine {
    pub player_id: PlayerId,
    pub name: String,
    pub team: Option<TeamSide>,
    pub pa: u32,
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub rbi: u32,
    pub bb: u32,
    pub so: u32,
    pub hbp: u32,
    pub sb: u32,
    pub cs: u32,
    pub sf: u32,
    pub sh: u32,
}

impl BattingLine {
    pub fn new(player_id: &str, name: &str, team: TeamSide) -> Self {
        Self {
            player_id: player_id.to_string(),
            name: name.to_string(),
            team: Some(team),
            ..Default::default()
        }
    }

    pub fn total_bases(&self) -> u32 {
        self.h + self.doubles + 2 * self.triples + 3 * self.hr
    }

    /// Field-wise sum, used for team and league totals
    pub fn accumulate(&mut self, other: &BattingLine) {
        self.pa += other.pa;
        self.ab += other.ab;
        self.r += other.r;
        self.h += other.h;
        self.doubles += other.doubles;
        self.triples += other.triples;
        self.hr += other.hr;
        self.rbi += other.rbi;
        self.bb += other.bb;
        self.so += other.so;
        self.hbp += other.hbp;
        self.sb += other.sb;
        self.cs += other.cs;
        self.sf += other.sf;
        self.sh += other.sh;
    }

    pub fn avg(&self) -> f64 {
        ratio(self.h, self.ab)
    }

    pub fn obp(&self) -> f64 {
        ratio(self.h + self.bb + self.hbp, self.ab + self.bb + self.hbp + self.sf)
    }

    pub fn slg(&self) -> f64 {
        ratio(self.total_bases(), self.ab)
    }
}

fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Win, loss or save credited to a pitcher
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchingDecision {
    Win,
    Loss,
    Save,
}

/// One pitcher's line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingLine {
    pub pitcher_id: PlayerId,
    pub name: String,
    pub team: TeamSide,
    pub outs: u32,
    pub h: u32,
    pub r: u32,
    pub er: u32,
    pub bb: u32,
    pub so: u32,
    pub hr: u32,
    pub bf: u32,
    pub gs: bool,
    pub cg: bool,
    pub sho: bool,
    pub decision: Option<PitchingDecision>,
}

impl PitchingLine {
    pub fn new(pitcher_id: &str, name: &str, team: TeamSide, starter: bool) -> Self {
        Self {
            pitcher_id: pitcher_id.to_string(),
            name: name.to_string(),
            team,
            outs: 0,
            h: 0,
            r: 0,
            er: 0,
            bb: 0,
            so: 0,
            hr: 0,
            bf: 0,
            gs: starter,
            cg: false,
            sho: false,
            decision: None,
        }
    }

    /// Innings pitched in box-score notation ("6.2" = 6 and 2/3)
    pub fn ip_display(&self) -> String {
        format!("{}.{}", self.outs / 3, self.outs % 3)
    }

    pub fn innings_pitched(&self) -> f64 {
        self.outs as f64 / 3.0
    }
}

/// Runs per inning plus hit and error totals
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScore {
    pub away: Vec<u32>,
    /// `None` for an unplayed bottom half
    pub home: Vec<Option<u32>>,
    pub away_hits: u32,
    pub home_hits: u32,
    pub away_errors: u32,
    pub home_errors: u32,
}

/// Complete result of one game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    pub seed: u64,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_score: u32,
    pub away_score: u32,
    pub innings: u32,
    pub line_score: LineScore,
    /// Starting lineups (away, then home), then substitutes as they enter
    pub player_batting_lines: Vec<BattingLine>,
    /// Starters (away, then home), then relievers as they enter
    pub player_pitching_lines: Vec<PitchingLine>,
}

impl GameResult {
    pub fn winner(&self) -> Option<TeamSide> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.winner().is_none()
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_score,
            TeamSide::Away => self.away_score,
        }
    }

    pub fn batting_line(&self, player_id: &str) -> Option<&BattingLine> {
        self.player_batting_lines.iter().find(|l| l.player_id == player_id)
    }

    pub fn pitching_line(&self, pitcher_id: &str) -> Option<&PitchingLine> {
        self.player_pitching_lines.iter().find(|l| l.pitcher_id == pitcher_id)
    }

    pub fn batting_for(&self, side: TeamSide) -> impl Iterator<Item = &BattingLine> {
        self.player_batting_lines
            .iter()
            .filter(move |l| l.team == Some(side))
    }

    pub fn pitching_for(&self, side: TeamSide) -> impl Iterator<Item = &PitchingLine> {
        self.player_pitching_lines.iter().filter(move |l| l.team == side)
    }

    /// Team totals summed from the individual lines
    pub fn team_batting(&self, side: TeamSide) -> BattingLine {
        let mut total = BattingLine::default();
        for line in self.batting_for(side) {
            total.accumulate(line);
        }
        total
    }
}
