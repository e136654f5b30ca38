//! Pitching model: fatigue, removal triggers, bullpen and rotation
//!
//! A pitcher throws at full grade until stamina runs out, then loses grade
//! every inning past it. The game runner keeps one `PitcherGameState` per
//! outing and asks this module when to make a change and who comes in.

use serde::{Deserialize, Serialize};

use crate::archetype::Hand;
use crate::card::PlayerId;

/// Grade never falls below this
pub const MIN_EFFECTIVE_GRADE: u8 = 1;

/// Grade lost per inning past stamina
pub const STARTER_FATIGUE_PER_INNING: u8 = 2;
pub const RELIEVER_FATIGUE_PER_INNING: u8 = 3;

/// Bullpen role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitcherRole {
    Starter,
    Reliever,
    Closer,
}

/// Pitcher ratings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherCard {
    pub pitcher_id: PlayerId,
    pub name: String,
    /// Nominal grade; higher is better
    pub grade: u8,
    /// Innings before fatigue sets in
    pub stamina: u8,
    pub role: PitcherRole,
    #[serde(default)]
    pub throws: Hand,
}

/// Innings pitched as a fraction (7 outs = 2.333..)
pub fn innings_from_outs(outs: u32) -> f64 {
    outs as f64 / 3.0
}

/// Fatigue-adjusted grade after `innings_pitched` innings.
///
/// Every started inning past stamina costs 2 grade points for a starter
/// and 3 for anyone else.
pub fn compute_effective_grade(pitcher: &PitcherCard, innings_pitched: f64) -> u8 {
    let stamina = pitcher.stamina as f64;
    if innings_pitched <= stamina {
        return pitcher.grade.max(MIN_EFFECTIVE_GRADE);
    }

    let over = (innings_pitched - stamina - 1e-9).ceil().max(1.0) as u32;
    let per_inning = match pitcher.role {
        PitcherRole::Starter => STARTER_FATIGUE_PER_INNING,
        PitcherRole::Reliever | PitcherRole::Closer => RELIEVER_FATIGUE_PER_INNING,
    } as u32;
    let lost = over.saturating_mul(per_inning);
    (pitcher.grade as u32)
        .saturating_sub(lost)
        .max(MIN_EFFECTIVE_GRADE as u32) as u8
}

/// Per-outing state for the pitcher on the mound
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherGameState {
    pub pitcher_id: PlayerId,
    pub outs_recorded: u32,
    pub earned_runs: u32,
    pub runs_allowed: u32,
    pub hits_allowed: u32,
    /// Hits and walks allowed in a row, reset by any out
    pub consecutive_baserunners: u32,
    pub current_inning: u32,
    pub is_shutout: bool,
    pub is_no_hitter: bool,
    /// Runs the pitcher's team trails by
    pub run_deficit: i32,
}

impl PitcherGameState {
    pub fn new(pitcher_id: &str, inning: u32) -> Self {
        Self {
            pitcher_id: pitcher_id.to_string(),
            outs_recorded: 0,
            earned_runs: 0,
            runs_allowed: 0,
            hits_allowed: 0,
            consecutive_baserunners: 0,
            current_inning: inning,
            is_shutout: true,
            is_no_hitter: true,
            run_deficit: 0,
        }
    }

    pub fn innings_pitched(&self) -> f64 {
        innings_from_outs(self.outs_recorded)
    }

    pub fn record_outs(&mut self, outs: u32) {
        if outs > 0 {
            self.outs_recorded += outs;
            self.consecutive_baserunners = 0;
        }
    }

    /// Batter reached on a hit, walk or hit-by-pitch
    pub fn record_baserunner(&mut self, hit: bool) {
        self.consecutive_baserunners += 1;
        if hit {
            self.hits_allowed += 1;
            self.is_no_hitter = false;
        }
    }

    pub fn record_runs(&mut self, runs: u32, earned: u32) {
        if runs > 0 {
            self.runs_allowed += runs;
            self.earned_runs += earned;
            self.is_shutout = false;
        }
    }
}

/// Why a pitcher should come out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    Fatigue,
    Shelled,
    Rally,
    Blowout,
}

impl RemovalReason {
    pub fn label(self) -> &'static str {
        match self {
            RemovalReason::Fatigue => "fatigue",
            RemovalReason::Shelled => "shelled",
            RemovalReason::Rally => "rally",
            RemovalReason::Blowout => "blowout",
        }
    }
}

/// First removal trigger that fires, if any. A shutout or no-hitter in
/// progress suppresses all of them.
pub fn removal_reason(pitcher: &PitcherCard, state: &PitcherGameState) -> Option<RemovalReason> {
    if state.is_shutout || state.is_no_hitter {
        return None;
    }

    let ip = state.innings_pitched();
    let effective = compute_effective_grade(pitcher, ip) as u32;
    if effective * 2 <= pitcher.grade as u32 {
        Some(RemovalReason::Fatigue)
    } else if state.earned_runs >= 4 && ip >= 4.0 {
        Some(RemovalReason::Shelled)
    } else if state.consecutive_baserunners >= 3 && state.current_inning > 5 {
        Some(RemovalReason::Rally)
    } else if state.run_deficit >= 5 && state.current_inning > 6 {
        Some(RemovalReason::Blowout)
    } else {
        None
    }
}

pub fn should_remove_starter(pitcher: &PitcherCard, state: &PitcherGameState) -> bool {
    removal_reason(pitcher, state).is_some()
}

/// Highest-grade arm that is not a closer; earliest listed wins ties
pub fn select_reliever(bullpen: &[PitcherCard]) -> Option<&PitcherCard> {
    bullpen
        .iter()
        .filter(|p| p.role != PitcherRole::Closer)
        .fold(None, |best: Option<&PitcherCard>, p| match best {
            Some(b) if b.grade >= p.grade => Some(b),
            _ => Some(p),
        })
}

/// Save situation: lead of 1-3 runs in the ninth or later with at most two on
pub fn should_bring_in_closer(lead_runs: i32, inning: u32, runners_on_base: u8) -> bool {
    inning >= 9 && lead_runs > 0 && lead_runs <= 3 && runners_on_base <= 2
}

/// Starter for game `game_number` of a rotation
pub fn get_next_starter(rotation: &[PitcherCard], game_number: usize) -> Option<&PitcherCard> {
    if rotation.is_empty() {
        return None;
    }
    rotation.get(game_number % rotation.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitcher(id: &str, grade: u8, stamina: u8, role: PitcherRole) -> PitcherCard {
        PitcherCard {
            pitcher_id: id.to_string(),
            name: id.to_uppercase(),
            grade,
            stamina,
            role,
            throws: Hand::Right,
        }
    }

    fn state_after(outs: u32, inning: u32) -> PitcherGameState {
        let mut s = PitcherGameState::new("sp", inning);
        s.outs_recorded = outs;
        s.is_shutout = false;
        s.is_no_hitter = false;
        s
    }

    #[test]
    fn test_effective_grade_scenario() {
        let sp = pitcher("sp", 14, 7, PitcherRole::Starter);
        assert_eq!(compute_effective_grade(&sp, 9.0), 10);
        assert_eq!(compute_effective_grade(&sp, 7.0), 14);
        assert_eq!(compute_effective_grade(&sp, 7.0 + 1.0 / 3.0), 12);
    }

    #[test]
    fn test_effective_grade_reliever_and_floor() {
        let rp = pitcher("rp", 10, 1, PitcherRole::Reliever);
        assert_eq!(compute_effective_grade(&rp, 2.0), 7);
        assert_eq!(compute_effective_grade(&rp, 30.0), MIN_EFFECTIVE_GRADE);

        let sp = pitcher("sp", 14, 7, PitcherRole::Starter);
        let mut last = u8::MAX;
        for outs in 0..60 {
            let g = compute_effective_grade(&sp, innings_from_outs(outs));
            assert!(g <= last);
            assert!(g >= MIN_EFFECTIVE_GRADE);
            last = g;
        }
    }

    #[test]
    fn test_removal_triggers() {
        let sp = pitcher("sp", 14, 7, PitcherRole::Starter);

        // 10 IP: grade 14 - 6 = 8, above half
        assert!(!should_remove_starter(&sp, &state_after(30, 10)));
        // 11 IP: 14 - 8 = 6 <= 7
        assert_eq!(removal_reason(&sp, &state_after(33, 11)), Some(RemovalReason::Fatigue));

        let mut shelled = state_after(12, 5);
        shelled.earned_runs = 4;
        assert_eq!(removal_reason(&sp, &shelled), Some(RemovalReason::Shelled));
        shelled.outs_recorded = 11;
        assert!(!should_remove_starter(&sp, &shelled));

        let mut rally = state_after(15, 6);
        rally.consecutive_baserunners = 3;
        assert_eq!(removal_reason(&sp, &rally), Some(RemovalReason::Rally));
        rally.current_inning = 5;
        assert!(!should_remove_starter(&sp, &rally));

        let mut blowout = state_after(18, 7);
        blowout.run_deficit = 5;
        assert_eq!(removal_reason(&sp, &blowout), Some(RemovalReason::Blowout));
        blowout.current_inning = 6;
        assert!(!should_remove_starter(&sp, &blowout));
    }

    #[test]
    fn test_shutout_or_no_hitter_suppresses_everything() {
        let sp = pitcher("sp", 14, 7, PitcherRole::Starter);
        let mut s = state_after(40, 9);
        s.earned_runs = 6;
        s.consecutive_baserunners = 4;
        s.run_deficit = 8;
        assert!(should_remove_starter(&sp, &s));

        s.is_shutout = true;
        assert!(!should_remove_starter(&sp, &s));
        s.is_shutout = false;
        s.is_no_hitter = true;
        assert!(!should_remove_starter(&sp, &s));
    }

    #[test]
    fn test_state_recording() {
        let mut s = PitcherGameState::new("sp", 1);
        s.record_baserunner(false);
        assert!(s.is_no_hitter);
        s.record_baserunner(true);
        assert_eq!(s.consecutive_baserunners, 2);
        assert!(!s.is_no_hitter);
        s.record_outs(1);
        assert_eq!(s.consecutive_baserunners, 0);
        s.record_runs(2, 1);
        assert!(!s.is_shutout);
        assert_eq!((s.runs_allowed, s.earned_runs), (2, 1));
    }

    #[test]
    fn test_select_reliever() {
        let pen = vec![
            pitcher("a", 9, 2, PitcherRole::Reliever),
            pitcher("cl", 15, 1, PitcherRole::Closer),
            pitcher("b", 11, 2, PitcherRole::Reliever),
            pitcher("c", 11, 2, PitcherRole::Reliever),
        ];
        assert_eq!(select_reliever(&pen).map(|p| p.pitcher_id.as_str()), Some("b"));
        assert!(select_reliever(&pen[1..2]).is_none());
        assert!(select_reliever(&[]).is_none());
    }

    #[test]
    fn test_closer_rule() {
        for inning in 1..=12u32 {
            for lead in -5..=6i32 {
                for runners in 0..=3u8 {
                    let expected = inning >= 9 && lead > 0 && lead <= 3 && runners <= 2;
                    assert_eq!(should_bring_in_closer(lead, inning, runners), expected);
                }
            }
        }
    }

    #[test]
    fn test_rotation_cycles() {
        let rotation: Vec<PitcherCard> = (0..5)
            .map(|i| pitcher(&format!("sp{}", i), 12, 7, PitcherRole::Starter))
            .collect();
        assert_eq!(get_next_starter(&rotation, 0).unwrap().pitcher_id, "sp0");
        assert_eq!(get_next_starter(&rotation, 7).unwrap().pitcher_id, "sp2");
        assert!(get_next_starter(&[], 3).is_none());
    }
}
