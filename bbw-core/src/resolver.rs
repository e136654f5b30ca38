//! Outcome resolver: (outcome, bases, outs) -> new bases, outs, runs
//!
//! Pure functions. Nothing here draws randomness; the game runner decides
//! what happened and this module works out where everyone ends up.

use serde::{Deserialize, Serialize};

use crate::bases::{advance_all_runners, force_advance, remove_lead_runner, Advance, Base, BaseState};
use crate::card::PlayerId;
use crate::outcome::OutcomeCategory;

/// Where the batter finished the play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatterDestination {
    Out,
    First,
    Second,
    Third,
    Scored,
    /// No-PA event: the batter is still hitting
    AtBat,
}

/// Everything that changed on one play
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOutcome {
    pub outcome: OutcomeCategory,
    pub bases_after: BaseState,
    pub outs_added: u8,
    pub runs_scored: u8,
    pub rbi_credits: u8,
    pub batter_destination: BatterDestination,
    pub batter_reached_base: bool,
    pub sacrifice_fly: bool,
    pub is_no_pa: bool,
    /// Runners (and possibly the batter) who crossed the plate
    pub scorers: Vec<PlayerId>,
    /// Runner retired on the bases during the play
    pub runner_out: Option<PlayerId>,
}

impl ResolvedOutcome {
    fn base(outcome: OutcomeCategory, bases: &BaseState) -> Self {
        Self {
            outcome,
            bases_after: bases.clone(),
            outs_added: 0,
            runs_scored: 0,
            rbi_credits: 0,
            batter_destination: BatterDestination::Out,
            batter_reached_base: false,
            sacrifice_fly: false,
            is_no_pa: false,
            scorers: Vec::new(),
            runner_out: None,
        }
    }

    fn with_advance(mut self, adv: Advance, rbi: bool) -> Self {
        self.runs_scored = adv.scored.len() as u8;
        self.rbi_credits = if rbi { self.runs_scored } else { 0 };
        self.scorers = adv.scored;
        self.bases_after = adv.bases;
        self
    }
}

/// Resolve one outcome against the current base state
pub fn resolve_outcome(
    outcome: OutcomeCategory,
    bases: &BaseState,
    outs: u8,
    batter_id: &str,
) -> ResolvedOutcome {
    use OutcomeCategory::*;

    let start = ResolvedOutcome::base(outcome, bases);

    match outcome {
        SingleClean => hit(start, advance_all_runners(bases, 1), batter_id, Base::First),
        SingleAdvance => hit(start, advance_all_runners(bases, 2), batter_id, Base::First),
        Double => hit(start, advance_all_runners(bases, 2), batter_id, Base::Second),
        Triple => hit(start, advance_all_runners(bases, 3), batter_id, Base::Third),

        HomeRun | HomeRunInsidePark => {
            let mut adv = advance_all_runners(bases, 3);
            adv.scored.push(batter_id.to_string());
            ResolvedOutcome {
                batter_destination: BatterDestination::Scored,
                batter_reached_base: true,
                ..start.with_advance(adv, true)
            }
        }

        Walk | IntentionalWalk | HitByPitch => ResolvedOutcome {
            batter_destination: BatterDestination::First,
            batter_reached_base: true,
            ..start.with_advance(force_advance(bases, batter_id), true)
        },

        GroundOut => {
            if outs < 2 {
                ResolvedOutcome {
                    outs_added: 1,
                    ..start.with_advance(advance_all_runners(bases, 1), true)
                }
            } else {
                ResolvedOutcome { outs_added: 1, ..start }
            }
        }

        FlyOut => match bases.third() {
            Some(runner) if outs < 2 => {
                let adv = Advance {
                    bases: bases.clone().with_runner(Base::Third, None),
                    scored: vec![runner.clone()],
                };
                ResolvedOutcome {
                    outs_added: 1,
                    sacrifice_fly: true,
                    ..start.with_advance(adv, true)
                }
            }
            _ => ResolvedOutcome { outs_added: 1, ..start },
        },

        LineOut | PopOut | StrikeoutSwinging | StrikeoutLooking => {
            ResolvedOutcome { outs_added: 1, ..start }
        }

        GroundIntoDoublePlay | LineIntoDoublePlay => {
            if bases.is_empty() || outs >= 2 {
                let single_out = if outcome == GroundIntoDoublePlay { GroundOut } else { LineOut };
                let degraded = resolve_outcome(single_out, bases, outs, batter_id);
                return ResolvedOutcome { outcome, ..degraded };
            }
            let (after, removed) = remove_lead_runner(bases);
            ResolvedOutcome {
                bases_after: after,
                outs_added: 2,
                runner_out: removed,
                ..start
            }
        }

        Sacrifice => {
            if outs < 2 {
                ResolvedOutcome {
                    outs_added: 1,
                    ..start.with_advance(advance_all_runners(bases, 1), true)
                }
            } else {
                ResolvedOutcome { outs_added: 1, ..start }
            }
        }

        ReachedOnError => ResolvedOutcome {
            batter_destination: BatterDestination::First,
            batter_reached_base: true,
            ..start.with_advance(place_batter(advance_all_runners(bases, 1), batter_id, Base::First), false)
        },

        FieldersChoice => {
            if bases.is_empty() {
                let degraded = resolve_outcome(GroundOut, bases, outs, batter_id);
                return ResolvedOutcome { outcome, ..degraded };
            }
            let (remaining, removed) = remove_lead_runner(bases);
            let adv = place_batter(advance_all_runners(&remaining, 1), batter_id, Base::First);
            ResolvedOutcome {
                outs_added: 1,
                batter_destination: BatterDestination::First,
                batter_reached_base: true,
                runner_out: removed,
                ..start.with_advance(adv, true)
            }
        }

        WildPitch | PassedBall | Balk => ResolvedOutcome {
            batter_destination: BatterDestination::AtBat,
            is_no_pa: true,
            ..start.with_advance(advance_all_runners(bases, 1), false)
        },

        StolenBaseOpportunity | SpecialEvent => ResolvedOutcome {
            batter_destination: BatterDestination::AtBat,
            is_no_pa: true,
            ..start
        },
    }
}

fn hit(start: ResolvedOutcome, adv: Advance, batter_id: &str, base: Base) -> ResolvedOutcome {
    let destination = match base {
        Base::First => BatterDestination::First,
        Base::Second => BatterDestination::Second,
        Base::Third => BatterDestination::Third,
    };
    ResolvedOutcome {
        batter_destination: destination,
        batter_reached_base: true,
        ..start.with_advance(place_batter(adv, batter_id, base), true)
    }
}

fn place_batter(adv: Advance, batter_id: &str, base: Base) -> Advance {
    Advance {
        bases: adv.bases.with_runner(base, Some(batter_id.to_string())),
        scored: adv.scored,
    }
}

/// A runner already placed by `resolved` is thrown out trying for one more
/// base. If they had scored on the play the run comes off the board.
pub fn runner_thrown_out(mut resolved: ResolvedOutcome, runner_id: &str) -> ResolvedOutcome {
    if let Some(pos) = resolved.scorers.iter().position(|r| r == runner_id) {
        resolved.scorers.remove(pos);
        resolved.runs_scored = resolved.runs_scored.saturating_sub(1);
        resolved.rbi_credits = resolved.rbi_credits.min(resolved.runs_scored);
    } else if resolved.bases_after.base_of(runner_id).is_some() {
        resolved.bases_after = resolved.bases_after.without(runner_id);
    } else {
        return resolved;
    }
    resolved.outs_added += 1;
    resolved.runner_out = Some(runner_id.to_string());
    resolved
}

/// Outcome of a stolen-base attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StealResult {
    pub bases_after: BaseState,
    pub runner: PlayerId,
    pub success: bool,
    pub outs_added: u8,
}

/// Runner on `from` tries for the next base. Steals of home are not modeled,
/// and the target base must be open.
pub fn resolve_steal(bases: &BaseState, from: Base, success: bool) -> Option<StealResult> {
    let target = from.next()?;
    let runner = bases.runner(from)?.clone();
    if bases.is_occupied(target) {
        return None;
    }

    let cleared = bases.clone().with_runner(from, None);
    let (bases_after, outs_added) = if success {
        (cleared.with_runner(target, Some(runner.clone())), 0)
    } else {
        (cleared, 1)
    };

    Some(StealResult {
        bases_after,
        runner,
        success,
        outs_added,
    })
}
