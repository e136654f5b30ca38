//! Base occupancy and the runner-movement primitives

use serde::{Deserialize, Serialize};

use crate::card::PlayerId;

/// A base a runner can occupy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    First = 0,
    Second = 1,
    Third = 2,
}

impl Base {
    pub fn next(self) -> Option<Base> {
        match self {
            Base::First => Some(Base::Second),
            Base::Second => Some(Base::Third),
            Base::Third => None,
        }
    }
}

/// Who is on first, second and third
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseState {
    runners: [Option<PlayerId>; 3],
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(first: Option<&str>, second: Option<&str>, third: Option<&str>) -> Self {
        Self {
            runners: [
                first.map(str::to_string),
                second.map(str::to_string),
                third.map(str::to_string),
            ],
        }
    }

    pub fn runner(&self, base: Base) -> Option<&PlayerId> {
        self.runners[base as usize].as_ref()
    }

    pub fn first(&self) -> Option<&PlayerId> {
        self.runner(Base::First)
    }

    pub fn second(&self) -> Option<&PlayerId> {
        self.runner(Base::Second)
    }

    pub fn third(&self) -> Option<&PlayerId> {
        self.runner(Base::Third)
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        self.runners[base as usize].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.iter().all(Option::is_none)
    }

    pub fn runner_count(&self) -> u8 {
        self.runners.iter().filter(|r| r.is_some()).count() as u8
    }

    /// Base currently held by `runner_id`
    pub fn base_of(&self, runner_id: &str) -> Option<Base> {
        [Base::First, Base::Second, Base::Third]
            .into_iter()
            .find(|b| self.runners[*b as usize].as_deref() == Some(runner_id))
    }

    /// Compact occupancy code (bit 0 = first, bit 1 = second, bit 2 = third)
    pub fn occupancy(&self) -> u8 {
        self.runners
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(i, _)| 1u8 << i)
            .sum()
    }

    pub(crate) fn with_runner(mut self, base: Base, runner: Option<PlayerId>) -> Self {
        self.runners[base as usize] = runner;
        self
    }

    pub(crate) fn without(mut self, runner_id: &str) -> Self {
        for slot in self.runners.iter_mut() {
            if slot.as_deref() == Some(runner_id) {
                *slot = None;
            }
        }
        self
    }
}

/// New base state plus the runners who crossed the plate
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    pub bases: BaseState,
    pub scored: Vec<PlayerId>,
}

/// Move every runner `n` bases; anyone pushed past third scores
pub fn advance_all_runners(bases: &BaseState, n: u8) -> Advance {
    let mut out = Advance::default();
    for idx in (0..3usize).rev() {
        if let Some(runner) = &bases.runners[idx] {
            let target = idx + n as usize;
            if target >= 3 {
                out.scored.push(runner.clone());
            } else {
                out.bases.runners[target] = Some(runner.clone());
            }
        }
    }
    out
}

/// Put the batter on first, pushing only the contiguous chain of runners
/// that starts at first. A runner on second with first open is not forced.
pub fn force_advance(bases: &BaseState, batter_id: &str) -> Advance {
    let chain = bases.runners.iter().take_while(|r| r.is_some()).count();
    let mut out = Advance {
        bases: bases.clone(),
        scored: Vec::new(),
    };

    for idx in (0..chain).rev() {
        let runner = out.bases.runners[idx].take();
        if idx + 1 >= 3 {
            if let Some(r) = runner {
                out.scored.push(r);
            }
        } else {
            out.bases.runners[idx + 1] = runner;
        }
    }
    out.bases.runners[0] = Some(batter_id.to_string());
    out
}

/// Remove the runner closest to home (third, else second, else first)
pub fn remove_lead_runner(bases: &BaseState) -> (BaseState, Option<PlayerId>) {
    let mut next = bases.clone();
    for idx in (0..3usize).rev() {
        if let Some(r) = next.runners[idx].take() {
            return (next, Some(r));
        }
    }
    (next, None)
}
