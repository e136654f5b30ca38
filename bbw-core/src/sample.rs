//! Two built-in clubs with league-average-ish rosters, used by the CLI
//! when no sheet is given and by tests.

use crate::archetype::{Archetype, Hand};
use crate::config::{Position, RunGameConfig};
use crate::generator::BattingRates;
use crate::manager::ManagerStyle;
use crate::pitching::{PitcherCard, PitcherRole};
use crate::sheet::{BatterSheet, GameOptions, GameSheet, SheetError, TeamSheet};

/// (name, position, archetype, bats, BB, K, HR, 1B, 2B, 3B, SB, ISO)
type BatterRow = (&'static str, Position, Archetype, Hand, [f64; 8]);

const HARBOR_LINEUP: [BatterRow; 9] = [
    ("Ortega", Position::CenterField, Archetype::ContactSpeed, Hand::Left, [0.070, 0.150, 0.000, 0.222, 0.040, 0.010, 0.045, 0.110]),
    ("Bell", Position::Shortstop, Archetype::Speed, Hand::Right, [0.060, 0.190, 0.018, 0.190, 0.045, 0.008, 0.030, 0.130]),
    ("Rourke", Position::FirstBase, Archetype::PowerLeft, Hand::Left, [0.110, 0.250, 0.055, 0.157, 0.050, 0.000, 0.002, 0.260]),
    ("Vance", Position::DesignatedHitter, Archetype::PowerRight, Hand::Right, [0.085, 0.270, 0.050, 0.152, 0.045, 0.000, 0.004, 0.240]),
    ("Kimura", Position::ThirdBase, Archetype::StandardRight, Hand::Right, [0.075, 0.210, 0.030, 0.179, 0.048, 0.000, 0.008, 0.170]),
    ("Dallas", Position::RightField, Archetype::StandardLeft, Hand::Left, [0.080, 0.220, 0.028, 0.179, 0.044, 0.000, 0.010, 0.160]),
    ("Fenn", Position::LeftField, Archetype::Utility, Hand::Right, [0.065, 0.230, 0.022, 0.175, 0.040, 0.000, 0.012, 0.140]),
    ("Pruitt", Position::Catcher, Archetype::EliteDefense, Hand::Right, [0.055, 0.240, 0.018, 0.162, 0.038, 0.000, 0.002, 0.120]),
    ("Lowe", Position::SecondBase, Archetype::EliteDefense, Hand::Left, [0.060, 0.180, 0.000, 0.201, 0.038, 0.000, 0.015, 0.095]),
];

const MESA_LINEUP: [BatterRow; 9] = [
    ("Acuna", Position::SecondBase, Archetype::Speed, Hand::Right, [0.075, 0.170, 0.015, 0.200, 0.042, 0.009, 0.040, 0.120]),
    ("Strand", Position::CenterField, Archetype::ContactSpeed, Hand::Left, [0.065, 0.140, 0.000, 0.225, 0.038, 0.012, 0.035, 0.100]),
    ("Mbeki", Position::RightField, Archetype::PowerRight, Hand::Right, [0.095, 0.260, 0.052, 0.156, 0.047, 0.000, 0.006, 0.250]),
    ("Halvorsen", Position::FirstBase, Archetype::PowerLeft, Hand::Left, [0.100, 0.245, 0.045, 0.159, 0.050, 0.000, 0.001, 0.230]),
    ("Quinn", Position::DesignatedHitter, Archetype::StandardLeft, Hand::Left, [0.090, 0.215, 0.034, 0.173, 0.046, 0.000, 0.003, 0.190]),
    ("Ibarra", Position::ThirdBase, Archetype::StandardRight, Hand::Right, [0.070, 0.205, 0.027, 0.181, 0.047, 0.000, 0.007, 0.160]),
    ("Cole", Position::LeftField, Archetype::Utility, Hand::Right, [0.060, 0.225, 0.020, 0.181, 0.041, 0.000, 0.014, 0.135]),
    ("Nakamura", Position::Shortstop, Archetype::EliteDefense, Hand::Right, [0.058, 0.195, 0.000, 0.204, 0.040, 0.000, 0.020, 0.110]),
    ("Reyes", Position::Catcher, Archetype::StandardRight, Hand::Right, [0.062, 0.235, 0.020, 0.165, 0.039, 0.000, 0.001, 0.130]),
];

/// (name, grade, stamina)
const HARBOR_ROTATION: [(&str, u8, u8); 5] =
    [("Wexler", 15, 7), ("Morrow", 13, 6), ("Tate", 12, 6), ("Ocampo", 11, 6), ("Brandt", 10, 5)];
const MESA_ROTATION: [(&str, u8, u8); 5] =
    [("Salas", 14, 7), ("Devlin", 13, 7), ("Archer", 12, 6), ("Pike", 11, 5), ("Yoon", 10, 5)];

const HARBOR_BULLPEN: [(&str, u8, u8); 4] = [("Gault", 12, 2), ("Hines", 11, 2), ("Soto", 10, 3), ("Marsh", 9, 3)];
const MESA_BULLPEN: [(&str, u8, u8); 4] = [("Ruiz", 12, 2), ("Tanner", 11, 2), ("Lind", 10, 2), ("Okafor", 9, 3)];

fn slug(team: &str, name: &str) -> String {
    format!("{}-{}", team, name.to_lowercase())
}

fn batter(team: &str, row: &BatterRow) -> BatterSheet {
    let (name, position, archetype, bats, r) = *row;
    BatterSheet {
        player_id: slug(team, name),
        name: name.to_string(),
        position,
        archetype,
        bats,
        rates: BattingRates {
            walk_rate: r[0],
            strikeout_rate: r[1],
            home_run_rate: r[2],
            single_rate: r[3],
            double_rate: r[4],
            triple_rate: r[5],
            stolen_base_rate: r[6],
            iso: r[7],
            babip: 0.300,
        },
    }
}

fn pitcher(team: &str, (name, grade, stamina): (&str, u8, u8), role: PitcherRole) -> PitcherCard {
    PitcherCard {
        pitcher_id: slug(team, name),
        name: name.to_string(),
        grade,
        stamina,
        role,
        throws: Hand::Right,
    }
}

fn team(
    team_id: &str,
    style: ManagerStyle,
    lineup: &[BatterRow],
    rotation: &[(&str, u8, u8)],
    bullpen: &[(&str, u8, u8)],
    closer: (&str, u8, u8),
) -> TeamSheet {
    // A spare bat so pinch hitting has someone to call on
    let bench = vec![BatterSheet {
        player_id: slug(team_id, "bench"),
        name: format!("{} Bench", team_id),
        position: Position::LeftField,
        archetype: Archetype::StandardRight,
        bats: Hand::Right,
        rates: BattingRates {
            walk_rate: 0.100,
            strikeout_rate: 0.190,
            home_run_rate: 0.040,
            single_rate: 0.153,
            double_rate: 0.050,
            triple_rate: 0.0,
            stolen_base_rate: 0.005,
            iso: 0.210,
            babip: 0.310,
        },
    }];

    TeamSheet {
        team_id: team_id.to_string(),
        manager_style: style,
        lineup: lineup.iter().map(|row| batter(team_id, row)).collect(),
        bench,
        rotation: rotation
            .iter()
            .map(|&p| pitcher(team_id, p, PitcherRole::Starter))
            .collect(),
        bullpen: bullpen
            .iter()
            .map(|&p| pitcher(team_id, p, PitcherRole::Reliever))
            .collect(),
        closer: Some(pitcher(team_id, closer, PitcherRole::Closer)),
    }
}

pub fn harbor() -> TeamSheet {
    team(
        "HAR",
        ManagerStyle::Balanced,
        &HARBOR_LINEUP,
        &HARBOR_ROTATION,
        &HARBOR_BULLPEN,
        ("Castellano", 14, 1),
    )
}

pub fn mesa() -> TeamSheet {
    team(
        "MES",
        ManagerStyle::Aggressive,
        &MESA_LINEUP,
        &MESA_ROTATION,
        &MESA_BULLPEN,
        ("Whitlock", 13, 1),
    )
}

/// Harbor at Mesa
pub fn sample_game(seed: u64) -> GameSheet {
    GameSheet {
        game_id: format!("sample-{}", seed),
        seed,
        home: mesa(),
        away: harbor(),
        game_number: 0,
        options: GameOptions::default(),
    }
}

pub fn sample_config(seed: u64) -> Result<RunGameConfig, SheetError> {
    sample_game(seed).to_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rosters_generate() {
        for sheet in [harbor(), mesa()] {
            assert_eq!(sheet.lineup.len(), 9);
            for b in sheet.lineup.iter().chain(sheet.bench.iter()) {
                assert!(b.rates.validate().is_ok(), "{}", b.player_id);
                b.to_player_card().unwrap();
            }
        }
        assert!(sample_config(0).is_ok());
    }
}
