//! Manager AI: situational decisions
//!
//! Each decision is split in two. A pure function maps a profile and a
//! `GameSituation` to a probability, returning 0.0 when a hard precondition
//! fails. `Manager::decide` is the one place that draws from the RNG.

use serde::{Deserialize, Serialize};

use crate::rng::SeededRng;

/// Manager temperament
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerStyle {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
    Analytical,
}

/// Per-style weights, one per decision, plus the late and extra inning
/// multipliers
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ManagerProfile {
    pub style: ManagerStyle,
    pub steal: f64,
    pub bunt: f64,
    pub intentional_walk: f64,
    pub pitcher_pull: f64,
    pub hit_and_run: f64,
    pub pinch_hit: f64,
    pub baserunning: f64,
    pub late_inning_multiplier: f64,
    pub extra_inning_multiplier: f64,
}

static PROFILES: [ManagerProfile; 4] = [
    ManagerProfile {
        style: ManagerStyle::Conservative,
        steal: 0.6,
        bunt: 1.6,
        intentional_walk: 1.2,
        pitcher_pull: 0.8,
        hit_and_run: 0.5,
        pinch_hit: 0.7,
        baserunning: 0.6,
        late_inning_multiplier: 1.2,
        extra_inning_multiplier: 1.4,
    },
    ManagerProfile {
        style: ManagerStyle::Balanced,
        steal: 1.0,
        bunt: 1.0,
        intentional_walk: 1.0,
        pitcher_pull: 1.0,
        hit_and_run: 1.0,
        pinch_hit: 1.0,
        baserunning: 1.0,
        late_inning_multiplier: 1.25,
        extra_inning_multiplier: 1.5,
    },
    ManagerProfile {
        style: ManagerStyle::Aggressive,
        steal: 1.6,
        bunt: 0.5,
        intentional_walk: 0.8,
        pitcher_pull: 1.4,
        hit_and_run: 1.5,
        pinch_hit: 1.1,
        baserunning: 1.5,
        late_inning_multiplier: 1.3,
        extra_inning_multiplier: 1.6,
    },
    ManagerProfile {
        style: ManagerStyle::Analytical,
        steal: 0.7,
        bunt: 0.3,
        intentional_walk: 0.6,
        pitcher_pull: 1.2,
        hit_and_run: 0.6,
        pinch_hit: 1.5,
        baserunning: 0.9,
        late_inning_multiplier: 1.2,
        extra_inning_multiplier: 1.3,
    },
];

impl ManagerStyle {
    pub fn profile(self) -> &'static ManagerProfile {
        let idx = match self {
            ManagerStyle::Conservative => 0,
            ManagerStyle::Balanced => 1,
            ManagerStyle::Aggressive => 2,
            ManagerStyle::Analytical => 3,
        };
        &PROFILES[idx]
    }
}

// Base rates before profile weights
const STEAL_BASE: f64 = 0.08;
const BUNT_BASE: f64 = 0.06;
const IBB_BASE: f64 = 0.04;
const PULL_SCALE: f64 = 0.5;
const HIT_AND_RUN_BASE: f64 = 0.05;
const PINCH_HIT_SCALE: f64 = 2.0;
const PLATOON_FACTOR: f64 = 1.25;
const BASERUNNING_BASE: f64 = 0.25;

/// Pitchers above this share of nominal grade are never pulled by the manager
const PULL_GRADE_CEILING: f64 = 0.75;

/// Earliest inning a pinch hitter is considered
pub const PINCH_HIT_MIN_INNING: u32 = 7;

/// OPS range mapped onto percentile 0-1
const OPS_FLOOR: f64 = 0.550;
const OPS_CEILING: f64 = 1.000;

/// Snapshot of the game at a decision point, from the deciding team's side
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GameSituation {
    pub inning: u32,
    pub outs: u8,
    /// Deciding team's runs minus the opponent's
    pub score_margin: i32,
    pub runner_on_first: bool,
    pub runner_on_second: bool,
    pub runner_on_third: bool,
    /// Speed of the runner the decision concerns
    pub runner_speed: f64,
    pub batter_ops: f64,
    pub batter_contact: f64,
    /// Best available bench bat, if any
    pub bench_ops: Option<f64>,
    pub platoon_advantage: bool,
    /// Effective grade over nominal grade for the pitcher on the mound
    pub pitcher_grade_pct: f64,
}

impl GameSituation {
    fn any_runner(&self) -> bool {
        self.runner_on_first || self.runner_on_second || self.runner_on_third
    }
}

/// The discretionary calls a manager makes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Steal,
    Bunt,
    IntentionalWalk,
    PitcherPull,
    HitAndRun,
    PinchHit,
    AggressiveBaserunning,
}

pub fn compute_decision_score(base_factor: f64, threshold: f64, multiplier: f64) -> f64 {
    base_factor * threshold * multiplier
}

pub fn get_inning_multiplier(profile: &ManagerProfile, inning: u32) -> f64 {
    match inning {
        0..=6 => 1.0,
        7..=9 => profile.late_inning_multiplier,
        _ => profile.extra_inning_multiplier,
    }
}

/// Linear percentile of an OPS between .550 and 1.000
pub fn ops_percentile(ops: f64) -> f64 {
    ((ops - OPS_FLOOR) / (OPS_CEILING - OPS_FLOOR)).clamp(0.0, 1.0)
}

fn clamp_prob(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn steal_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    if !(s.runner_on_first || s.runner_on_second) || s.outs >= 2 || s.score_margin.abs() > 3 {
        return 0.0;
    }
    clamp_prob(compute_decision_score(STEAL_BASE * s.runner_speed, profile.steal, 1.0))
}

/// Conservative managers carry the largest bunt weight
pub fn bunt_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    if !s.any_runner() || s.outs >= 2 || s.score_margin.abs() > 2 {
        return 0.0;
    }
    let weak_bat = 1.0 - 0.5 * ops_percentile(s.batter_ops);
    clamp_prob(compute_decision_score(
        BUNT_BASE * weak_bat,
        profile.bunt,
        get_inning_multiplier(profile, s.inning),
    ))
}

/// Walk the batter on purpose; only with first base open
pub fn intentional_walk_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    if s.runner_on_first {
        return 0.0;
    }
    let pct = ops_percentile(s.batter_ops);
    clamp_prob(compute_decision_score(
        IBB_BASE * pct.powi(4),
        profile.intentional_walk,
        get_inning_multiplier(profile, s.inning),
    ))
}

pub fn pitcher_pull_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    if s.pitcher_grade_pct >= PULL_GRADE_CEILING {
        return 0.0;
    }
    let tired = 1.0 - s.pitcher_grade_pct.max(0.0);
    clamp_prob(compute_decision_score(tired, profile.pitcher_pull, PULL_SCALE))
}

/// Runner on first only
pub fn hit_and_run_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    if !s.runner_on_first || s.runner_on_second || s.runner_on_third || s.outs >= 2 {
        return 0.0;
    }
    clamp_prob(compute_decision_score(
        HIT_AND_RUN_BASE * s.batter_contact,
        profile.hit_and_run,
        1.0,
    ))
}

pub fn pinch_hit_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    let bench = match s.bench_ops {
        Some(ops) if ops > s.batter_ops && s.inning >= PINCH_HIT_MIN_INNING => ops,
        _ => return 0.0,
    };
    let platoon = if s.platoon_advantage { PLATOON_FACTOR } else { 1.0 };
    clamp_prob(compute_decision_score(
        (bench - s.batter_ops) * PINCH_HIT_SCALE * platoon,
        profile.pinch_hit,
        get_inning_multiplier(profile, s.inning),
    ))
}

pub fn aggressive_baserunning_probability(profile: &ManagerProfile, s: &GameSituation) -> f64 {
    if !(s.runner_on_first || s.runner_on_second) || s.outs >= 2 {
        return 0.0;
    }
    clamp_prob(compute_decision_score(
        BASERUNNING_BASE * s.runner_speed,
        profile.baserunning,
        get_inning_multiplier(profile, s.inning),
    ))
}

/// A profile bound to one team for a game
#[derive(Clone, Copy, Debug)]
pub struct Manager {
    profile: &'static ManagerProfile,
}

impl Manager {
    pub fn new(style: ManagerStyle) -> Self {
        Self {
            profile: style.profile(),
        }
    }

    pub fn profile(&self) -> &'static ManagerProfile {
        self.profile
    }

    pub fn probability(&self, decision: Decision, situation: &GameSituation) -> f64 {
        let p = self.profile;
        match decision {
            Decision::Steal => steal_probability(p, situation),
            Decision::Bunt => bunt_probability(p, situation),
            Decision::IntentionalWalk => intentional_walk_probability(p, situation),
            Decision::PitcherPull => pitcher_pull_probability(p, situation),
            Decision::HitAndRun => hit_and_run_probability(p, situation),
            Decision::PinchHit => pinch_hit_probability(p, situation),
            Decision::AggressiveBaserunning => aggressive_baserunning_probability(p, situation),
        }
    }

    /// Bernoulli draw on the decision's probability. No draw is taken when
    /// a precondition rules the decision out.
    pub fn decide(&self, decision: Decision, situation: GameSituation, rng: &mut SeededRng) -> bool {
        let p = self.probability(decision, &situation);
        if p <= 0.0 {
            return false;
        }
        let yes = rng.chance(p);
        if yes {
            tracing::debug!(
                style = ?self.profile.style,
                ?decision,
                inning = situation.inning,
                outs = situation.outs,
                "manager decision (p = {:.3})",
                p
            );
        }
        yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced() -> &'static ManagerProfile {
        ManagerStyle::Balanced.profile()
    }

    fn situation() -> GameSituation {
        GameSituation {
            inning: 3,
            outs: 0,
            score_margin: 0,
            runner_on_first: true,
            runner_speed: 0.8,
            batter_ops: 0.750,
            batter_contact: 0.8,
            pitcher_grade_pct: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_profiles_indexed_by_style() {
        for style in [
            ManagerStyle::Conservative,
            ManagerStyle::Balanced,
            ManagerStyle::Aggressive,
            ManagerStyle::Analytical,
        ] {
            assert_eq!(style.profile().style, style);
        }
    }

    #[test]
    fn test_decision_score_and_inning_multiplier() {
        assert!((compute_decision_score(0.5, 0.4, 2.0) - 0.4).abs() < 1e-12);
        let p = balanced();
        assert_eq!(get_inning_multiplier(p, 1), 1.0);
        assert_eq!(get_inning_multiplier(p, 6), 1.0);
        assert_eq!(get_inning_multiplier(p, 7), p.late_inning_multiplier);
        assert_eq!(get_inning_multiplier(p, 9), p.late_inning_multiplier);
        assert_eq!(get_inning_multiplier(p, 10), p.extra_inning_multiplier);
    }

    #[test]
    fn test_steal_preconditions() {
        let p = balanced();
        assert!(steal_probability(p, &situation()) > 0.0);
        assert_eq!(steal_probability(p, &GameSituation { outs: 2, ..situation() }), 0.0);
        assert_eq!(steal_probability(p, &GameSituation { score_margin: 4, ..situation() }), 0.0);
        assert_eq!(
            steal_probability(p, &GameSituation { runner_on_first: false, runner_on_third: true, ..situation() }),
            0.0
        );
        let fast = steal_probability(p, &situation());
        let slow = steal_probability(p, &GameSituation { runner_speed: 0.2, ..situation() });
        assert!(fast > slow);
        assert!(steal_probability(ManagerStyle::Aggressive.profile(), &situation()) > fast);
    }

    #[test]
    fn test_conservative_bunts_more() {
        let s = situation();
        let cons = bunt_probability(ManagerStyle::Conservative.profile(), &s);
        let aggr = bunt_probability(ManagerStyle::Aggressive.profile(), &s);
        assert!(cons > aggr);
        assert_eq!(bunt_probability(balanced(), &GameSituation { score_margin: 3, ..s }), 0.0);
        assert_eq!(bunt_probability(balanced(), &GameSituation { runner_on_first: false, ..s }), 0.0);
    }

    #[test]
    fn test_intentional_walk_needs_open_base() {
        let s = GameSituation { runner_on_first: false, runner_on_second: true, batter_ops: 0.950, ..situation() };
        assert!(intentional_walk_probability(balanced(), &s) > 0.0);
        assert_eq!(intentional_walk_probability(balanced(), &situation()), 0.0);
        let weak = GameSituation { batter_ops: 0.500, ..s };
        assert_eq!(intentional_walk_probability(balanced(), &weak), 0.0);
    }

    #[test]
    fn test_pitcher_pull_scales_with_fatigue() {
        let fresh = GameSituation { pitcher_grade_pct: 0.9, ..situation() };
        let tired = GameSituation { pitcher_grade_pct: 0.4, ..situation() };
        let worn = GameSituation { pitcher_grade_pct: 0.6, ..situation() };
        assert_eq!(pitcher_pull_probability(balanced(), &fresh), 0.0);
        assert!(pitcher_pull_probability(balanced(), &tired) > pitcher_pull_probability(balanced(), &worn));
        assert!(
            pitcher_pull_probability(ManagerStyle::Aggressive.profile(), &worn)
                > pitcher_pull_probability(ManagerStyle::Conservative.profile(), &worn)
        );
    }

    #[test]
    fn test_hit_and_run_first_only() {
        assert!(hit_and_run_probability(balanced(), &situation()) > 0.0);
        let first_and_second = GameSituation { runner_on_second: true, ..situation() };
        assert_eq!(hit_and_run_probability(balanced(), &first_and_second), 0.0);
        let second_only = GameSituation { runner_on_first: false, runner_on_second: true, ..situation() };
        assert_eq!(hit_and_run_probability(balanced(), &second_only), 0.0);
    }

    #[test]
    fn test_pinch_hit_requires_better_bench() {
        let late = GameSituation { inning: 8, bench_ops: Some(0.850), batter_ops: 0.600, ..situation() };
        let p = pinch_hit_probability(balanced(), &late);
        assert!(p > 0.0);
        let platoon = pinch_hit_probability(balanced(), &GameSituation { platoon_advantage: true, ..late });
        assert!(platoon > p);
        assert_eq!(pinch_hit_probability(balanced(), &GameSituation { bench_ops: Some(0.600), ..late }), 0.0);
        assert_eq!(pinch_hit_probability(balanced(), &GameSituation { bench_ops: None, ..late }), 0.0);
        assert!(
            pinch_hit_probability(ManagerStyle::Analytical.profile(), &late)
                > pinch_hit_probability(ManagerStyle::Conservative.profile(), &late)
        );
    }

    #[test]
    fn test_baserunning_amplified_late() {
        let early = aggressive_baserunning_probability(balanced(), &situation());
        let late = aggressive_baserunning_probability(balanced(), &GameSituation { inning: 8, ..situation() });
        assert!(late > early);
        assert_eq!(
            aggressive_baserunning_probability(balanced(), &GameSituation { outs: 2, ..situation() }),
            0.0
        );
    }

    #[test]
    fn test_decide_skips_rng_when_ruled_out() {
        let manager = Manager::new(ManagerStyle::Balanced);
        let mut rng = SeededRng::new(3);
        let mut reference = SeededRng::new(3);
        let ruled_out = GameSituation { outs: 2, ..situation() };
        assert!(!manager.decide(Decision::Steal, ruled_out, &mut rng));
        assert_eq!(rng.next_float(), reference.next_float());
    }
}
