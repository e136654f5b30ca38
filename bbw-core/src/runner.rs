//! Game runner - plays one complete game
//!
//! Level 3 - drives innings, half-innings and plate appearances.
//!
//! A plate appearance goes: pitching-change check, pinch hit, intentional
//! walk, steal, bunt, hit-and-run call, then card rolls until a
//! plate-appearance outcome comes up (no-PA events are played as they
//! appear), archetype modifier, hit-and-run and baserunning adjustments,
//! resolver, bookkeeping.

use rustc_hash::FxHashMap;

use crate::archetype::apply_archetype_modifier;
use crate::bases::{Base, BaseState};
use crate::boxscore::{BattingLine, GameResult, LineScore, PitchingDecision, PitchingLine};
use crate::card::{PlayerCard, PlayerId, PLAYABLE_POSITIONS};
use crate::config::{ConfigError, Position, RunGameConfig, TeamConfig, TeamSide, REGULATION_INNINGS};
use crate::generator::pitcher_batting_player;
use crate::manager::{Decision, GameSituation, Manager};
use crate::outcome::OutcomeCategory;
use crate::pitching::{
    compute_effective_grade, removal_reason, select_reliever, should_bring_in_closer, PitcherCard,
    PitcherGameState, PitcherRole, RemovalReason,
};
use crate::resolver::{resolve_outcome, resolve_steal, runner_thrown_out, ResolvedOutcome};
use crate::rng::SeededRng;
use crate::strategy::OutcomeResolutionStrategy;

/// Card rolls per plate appearance before no-PA results stop being replayed
const MAX_ROLLS_PER_PA: u32 = 16;

/// Steal success = base + speed * per_speed
const STEAL_SUCCESS_BASE: f64 = 0.55;
const STEAL_SUCCESS_PER_SPEED: f64 = 0.30;

/// Extra base on a single = base + speed * per_speed
const EXTRA_BASE_SUCCESS_BASE: f64 = 0.50;
const EXTRA_BASE_SUCCESS_PER_SPEED: f64 = 0.40;

/// Speed assumed for a runner with no rating on record
const DEFAULT_SPEED: f64 = 0.3;

// ============================================================================
// Team state
// ============================================================================

#[derive(Clone, Debug)]
enum LineupSlot {
    Batter(PlayerCard),
    /// Bats with whoever is pitching (no DH)
    PitcherSpot,
}

#[derive(Clone, Debug)]
struct ActivePitcher {
    card: PitcherCard,
    state: PitcherGameState,
    /// Team lead when this pitcher came in
    entry_lead: i32,
}

#[derive(Clone, Debug)]
struct TeamState {
    team_id: String,
    manager: Manager,
    slots: Vec<LineupSlot>,
    next_slot: usize,
    pitcher: ActivePitcher,
    bullpen: Vec<PitcherCard>,
    closer: Option<PitcherCard>,
    bench: Vec<PlayerCard>,
    pitchers_used: u32,
    /// Pitcher's lineup spot was pinch-hit for; change at the next chance
    pitcher_lifted: bool,
    pitcher_of_record: Option<PlayerId>,
    runs: u32,
    hits: u32,
    errors: u32,
    innings: Vec<Option<u32>>,
}

impl TeamState {
    fn new(team: TeamConfig<'_>) -> Result<Self, ConfigError> {
        let mut slots = Vec::with_capacity(team.lineup.len());
        for entry in team.lineup {
            if entry.position == Position::Pitcher {
                slots.push(LineupSlot::PitcherSpot);
                continue;
            }
            let card = team
                .batter_cards
                .get(&entry.player_id)
                .ok_or_else(|| ConfigError::MissingBatterCard {
                    team: team.side,
                    player_id: entry.player_id.clone(),
                })?;
            slots.push(LineupSlot::Batter(card.clone()));
        }

        let starter = team.starting_pitcher.clone();
        Ok(Self {
            team_id: team.team_id.to_string(),
            manager: Manager::new(team.manager_style),
            slots,
            next_slot: 0,
            pitcher: ActivePitcher {
                state: PitcherGameState::new(&starter.pitcher_id, 1),
                card: starter,
                entry_lead: 0,
            },
            bullpen: team.bullpen.to_vec(),
            closer: team.closer.cloned(),
            bench: team.bench.to_vec(),
            pitchers_used: 1,
            pitcher_lifted: false,
            pitcher_of_record: None,
            runs: 0,
            hits: 0,
            errors: 0,
            innings: Vec::new(),
        })
    }

    fn pitcher_id(&self) -> &str {
        &self.pitcher.card.pitcher_id
    }

    fn batter_in_slot(&self, slot: usize) -> PlayerCard {
        match self.slots.get(slot) {
            Some(LineupSlot::Batter(card)) => card.clone(),
            _ => {
                let p = &self.pitcher.card;
                pitcher_batting_player(&p.pitcher_id, &p.name, p.throws)
            }
        }
    }

    /// Next arm out of the pen; the closer only once the pen is empty
    fn take_reliever(&mut self) -> Option<PitcherCard> {
        let pick = select_reliever(&self.bullpen).map(|p| p.pitcher_id.clone());
        match pick {
            Some(id) => {
                let idx = self.bullpen.iter().position(|p| p.pitcher_id == id)?;
                Some(self.bullpen.remove(idx))
            }
            None => self.closer.take(),
        }
    }
}

/// What a called hit-and-run does to the rolled outcome. The runner from
/// first is moving on the pitch: a clean single takes the extra base, a
/// double-play ball only retires the batter, and on a strikeout the runner
/// is left trying to steal (the returned flag).
pub(crate) fn hit_and_run_outcome(outcome: OutcomeCategory) -> (OutcomeCategory, bool) {
    match outcome {
        OutcomeCategory::SingleClean => (OutcomeCategory::SingleAdvance, false),
        OutcomeCategory::GroundIntoDoublePlay => (OutcomeCategory::GroundOut, false),
        other => (other, other.is_strikeout()),
    }
}

fn side_index(side: TeamSide) -> usize {
    match side {
        TeamSide::Away => 0,
        TeamSide::Home => 1,
    }
}

/// Pitcher a runner's run is charged to
#[derive(Clone, Debug)]
struct Charge {
    pitcher_id: PlayerId,
    earned: bool,
}

#[derive(Clone, Debug)]
struct HalfInning {
    inning: u32,
    batting: TeamSide,
    outs: u8,
    bases: BaseState,
    runs: u32,
}

impl HalfInning {
    fn fielding(&self) -> TeamSide {
        self.batting.opponent()
    }
}

// ============================================================================
// Game runner
// ============================================================================

/// Plays one game from a validated configuration
pub struct GameRunner {
    game_id: String,
    seed: u64,
    max_innings: u32,
    rng: SeededRng,
    strategy: &'static dyn OutcomeResolutionStrategy,
    teams: [TeamState; 2],
    batting: Vec<BattingLine>,
    batting_index: FxHashMap<PlayerId, usize>,
    pitching: Vec<PitchingLine>,
    pitching_index: FxHashMap<PlayerId, usize>,
    charges: FxHashMap<PlayerId, Charge>,
    speeds: FxHashMap<PlayerId, f64>,
    leader: Option<TeamSide>,
}

/// Validate `config` and play the game
pub fn run_game(config: &RunGameConfig) -> Result<GameResult, ConfigError> {
    Ok(GameRunner::new(config)?.run())
}

impl GameRunner {
    pub fn new(config: &RunGameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let teams = [
            TeamState::new(config.team(TeamSide::Away))?,
            TeamState::new(config.team(TeamSide::Home))?,
        ];

        let mut runner = Self {
            game_id: config.game_id.clone(),
            seed: config.seed,
            max_innings: config.max_innings,
            rng: SeededRng::new(config.seed),
            strategy: config.resolution.strategy(),
            teams,
            batting: Vec::new(),
            batting_index: FxHashMap::default(),
            pitching: Vec::new(),
            pitching_index: FxHashMap::default(),
            charges: FxHashMap::default(),
            speeds: FxHashMap::default(),
            leader: None,
        };

        for side in [TeamSide::Away, TeamSide::Home] {
            let idx = side_index(side);
            for slot in 0..runner.teams[idx].slots.len() {
                let batter = runner.teams[idx].batter_in_slot(slot);
                runner.register_batter(&batter, side);
            }
        }
        for side in [TeamSide::Away, TeamSide::Home] {
            let card = runner.team(side).pitcher.card.clone();
            runner.register_pitcher(&card, side, true);
        }

        tracing::debug!(
            "game {} ready: {} at {}, seed {}, strategy {}",
            runner.game_id,
            runner.team(TeamSide::Away).team_id,
            runner.team(TeamSide::Home).team_id,
            runner.seed,
            runner.strategy.name()
        );
        Ok(runner)
    }

    /// Play to completion
    pub fn run(mut self) -> GameResult {
        let mut inning = 1;
        loop {
            self.play_half(inning, TeamSide::Away);

            if inning >= REGULATION_INNINGS && self.runs(TeamSide::Home) > self.runs(TeamSide::Away) {
                self.team_mut(TeamSide::Home).innings.push(None);
                break;
            }

            self.play_half(inning, TeamSide::Home);

            if inning >= REGULATION_INNINGS && self.runs(TeamSide::Home) != self.runs(TeamSide::Away) {
                break;
            }
            if inning >= self.max_innings {
                tracing::warn!(
                    "game {} still tied after {} innings, recording a tie",
                    self.game_id,
                    inning
                );
                break;
            }
            inning += 1;
        }
        self.finish(inning)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    fn team(&self, side: TeamSide) -> &TeamState {
        &self.teams[side_index(side)]
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut TeamState {
        &mut self.teams[side_index(side)]
    }

    fn runs(&self, side: TeamSide) -> u32 {
        self.team(side).runs
    }

    /// `side`'s runs minus the opponent's
    fn margin(&self, side: TeamSide) -> i32 {
        self.runs(side) as i32 - self.runs(side.opponent()) as i32
    }

    fn speed_of(&self, player_id: &str) -> f64 {
        self.speeds.get(player_id).copied().unwrap_or(DEFAULT_SPEED)
    }

    fn register_batter(&mut self, batter: &PlayerCard, side: TeamSide) {
        self.speeds.insert(batter.player_id.clone(), batter.speed);
        if !self.batting_index.contains_key(&batter.player_id) {
            self.batting_index.insert(batter.player_id.clone(), self.batting.len());
            self.batting.push(BattingLine::new(&batter.player_id, &batter.name, side));
        }
    }

    fn register_pitcher(&mut self, pitcher: &PitcherCard, side: TeamSide, starter: bool) {
        if !self.pitching_index.contains_key(&pitcher.pitcher_id) {
            self.pitching_index.insert(pitcher.pitcher_id.clone(), self.pitching.len());
            self.pitching.push(PitchingLine::new(&pitcher.pitcher_id, &pitcher.name, side, starter));
        }
    }

    fn batting_line(&mut self, player_id: &str) -> Option<&mut BattingLine> {
        let idx = *self.batting_index.get(player_id)?;
        self.batting.get_mut(idx)
    }

    fn pitching_line(&mut self, pitcher_id: &str) -> Option<&mut PitchingLine> {
        let idx = *self.pitching_index.get(pitcher_id)?;
        self.pitching.get_mut(idx)
    }

    fn current_pitching_line(&mut self, side: TeamSide) -> Option<&mut PitchingLine> {
        let id = self.team(side).pitcher_id().to_string();
        self.pitching_line(&id)
    }

    fn effective_grade(&self, side: TeamSide) -> u8 {
        let p = &self.team(side).pitcher;
        compute_effective_grade(&p.card, p.state.innings_pitched())
    }

    fn situation(&self, deciding: TeamSide, half: &HalfInning) -> GameSituation {
        GameSituation {
            inning: half.inning,
            outs: half.outs,
            score_margin: self.margin(deciding),
            runner_on_first: half.bases.is_occupied(Base::First),
            runner_on_second: half.bases.is_occupied(Base::Second),
            runner_on_third: half.bases.is_occupied(Base::Third),
            ..Default::default()
        }
    }

    fn decide(&mut self, deciding: TeamSide, decision: Decision, situation: GameSituation) -> bool {
        let manager = self.team(deciding).manager;
        manager.decide(decision, situation, &mut self.rng)
    }

    fn walk_off(&self, half: &HalfInning) -> bool {
        half.batting == TeamSide::Home
            && half.inning >= REGULATION_INNINGS
            && self.runs(TeamSide::Home) > self.runs(TeamSide::Away)
    }

    // ------------------------------------------------------------------------
    // Half-inning and plate appearance
    // ------------------------------------------------------------------------

    fn play_half(&mut self, inning: u32, batting: TeamSide) {
        let mut half = HalfInning {
            inning,
            batting,
            outs: 0,
            bases: BaseState::empty(),
            runs: 0,
        };

        while half.outs < 3 && !self.walk_off(&half) {
            self.plate_appearance(&mut half);
        }

        self.charges.clear();
        self.team_mut(batting).innings.push(Some(half.runs));
    }

    fn plate_appearance(&mut self, half: &mut HalfInning) {
        let batting = half.batting;
        let fielding = half.fielding();

        self.check_pitching_change(half);

        let slot = self.team(batting).next_slot;
        let mut batter = self.team(batting).batter_in_slot(slot);
        self.register_batter(&batter, batting);
        if let Some(pinch) = self.consider_pinch_hitter(half, slot, &batter) {
            batter = pinch;
        }

        let mut sit = self.situation(fielding, half);
        sit.batter_ops = batter.ops;
        if self.decide(fielding, Decision::IntentionalWalk, sit) {
            let resolved = resolve_outcome(OutcomeCategory::IntentionalWalk, &half.bases, half.outs, &batter.player_id);
            self.apply_play(half, &batter, resolved);
            self.advance_order(batting);
            return;
        }

        if let Some((_, runner)) = self.stealable_runner(&half.bases) {
            let mut sit = self.situation(batting, half);
            sit.runner_speed = self.speed_of(&runner);
            if self.decide(batting, Decision::Steal, sit) {
                self.attempt_steal(half);
                if half.outs >= 3 {
                    return;
                }
            }
        }

        let mut sit = self.situation(batting, half);
        sit.batter_ops = batter.ops;
        sit.batter_contact = batter.contact_rate;
        if self.decide(batting, Decision::Bunt, sit) {
            let resolved = resolve_outcome(OutcomeCategory::Sacrifice, &half.bases, half.outs, &batter.player_id);
            self.apply_play(half, &batter, resolved);
            self.advance_order(batting);
            return;
        }
        let hit_and_run = self.decide(batting, Decision::HitAndRun, sit);

        let Some((outcome, steal_check)) = self.roll_outcome(half, &batter) else {
            return;
        };

        let (outcome, runner_going) = if hit_and_run {
            hit_and_run_outcome(outcome)
        } else {
            (outcome, false)
        };

        let resolved = self.resolve_with_baserunning(half, outcome, &batter.player_id);
        tracing::trace!(
            "{} {}: {} {:?} (outs {}, runs {})",
            half.inning,
            batting,
            batter.player_id,
            resolved.outcome,
            half.outs,
            resolved.runs_scored
        );
        self.apply_play(half, &batter, resolved);
        self.advance_order(batting);

        if half.outs >= 3 || self.walk_off(half) {
            return;
        }

        if runner_going {
            self.attempt_steal(half);
        } else if steal_check && half.bases.first() == Some(&batter.player_id) {
            let mut sit = self.situation(batting, half);
            sit.runner_speed = batter.speed;
            if self.decide(batting, Decision::Steal, sit) {
                self.attempt_steal(half);
            }
        }
    }

    /// Roll the card until a plate-appearance outcome comes up. No-PA
    /// events are played as they appear. `None` if one of them ended the
    /// half-inning or the game.
    fn roll_outcome(&mut self, half: &mut HalfInning, batter: &PlayerCard) -> Option<(OutcomeCategory, bool)> {
        let strategy = self.strategy;
        let grade = self.effective_grade(half.fielding());

        for _ in 0..MAX_ROLLS_PER_PA {
            let idx = self.rng.next_index(PLAYABLE_POSITIONS.len());
            let value = batter.card.playable(idx);
            let raw = strategy.resolve(value, grade, &mut self.rng);
            let modified = apply_archetype_modifier(raw, batter.archetype, &mut self.rng);

            if !modified.outcome.is_no_pa() {
                return Some((modified.outcome, modified.trigger_stolen_base_check));
            }

            self.play_no_pa_event(half, modified.outcome, &batter.player_id);
            if half.outs >= 3 || self.walk_off(half) {
                return None;
            }
        }

        tracing::trace!("{} kept rolling no-PA events, recording a ground out", batter.player_id);
        Some((OutcomeCategory::GroundOut, false))
    }

    fn play_no_pa_event(&mut self, half: &mut HalfInning, outcome: OutcomeCategory, batter_id: &str) {
        match outcome {
            OutcomeCategory::StolenBaseOpportunity => {
                if let Some((_, runner)) = self.stealable_runner(&half.bases) {
                    let mut sit = self.situation(half.batting, half);
                    sit.runner_speed = self.speed_of(&runner);
                    if self.decide(half.batting, Decision::Steal, sit) {
                        self.attempt_steal(half);
                    }
                }
            }
            OutcomeCategory::WildPitch | OutcomeCategory::PassedBall | OutcomeCategory::Balk => {
                let resolved = resolve_outcome(outcome, &half.bases, half.outs, batter_id);
                let unearned = outcome == OutcomeCategory::PassedBall;
                for runner in &resolved.scorers {
                    self.score_run(half, runner, unearned);
                }
                half.bases = resolved.bases_after;
            }
            _ => {}
        }
    }

    /// Resolve the play, letting the lead runner try for an extra base on
    /// a clean single
    fn resolve_with_baserunning(&mut self, half: &HalfInning, outcome: OutcomeCategory, batter_id: &str) -> ResolvedOutcome {
        let lead = half.bases.second().or(half.bases.first()).cloned();
        let lead = match lead {
            Some(runner) if outcome == OutcomeCategory::SingleClean && half.outs < 2 => runner,
            _ => return resolve_outcome(outcome, &half.bases, half.outs, batter_id),
        };

        let speed = self.speed_of(&lead);
        let mut sit = self.situation(half.batting, half);
        sit.runner_speed = speed;
        if !self.decide(half.batting, Decision::AggressiveBaserunning, sit) {
            return resolve_outcome(outcome, &half.bases, half.outs, batter_id);
        }

        let safe = self
            .rng
            .chance(EXTRA_BASE_SUCCESS_BASE + EXTRA_BASE_SUCCESS_PER_SPEED * speed);
        let extra = resolve_outcome(OutcomeCategory::SingleAdvance, &half.bases, half.outs, batter_id);
        let resolved = if safe { extra } else { runner_thrown_out(extra, &lead) };
        // Scored as a single either way
        ResolvedOutcome {
            outcome: OutcomeCategory::SingleClean,
            ..resolved
        }
    }

    fn advance_order(&mut self, side: TeamSide) {
        let team = self.team_mut(side);
        team.next_slot = (team.next_slot + 1) % team.slots.len().max(1);
    }

    // ------------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------------

    fn apply_play(&mut self, half: &mut HalfInning, batter: &PlayerCard, resolved: ResolvedOutcome) {
        let batting = half.batting;
        let fielding = half.fielding();
        let outcome = resolved.outcome;

        if let Some(line) = self.batting_line(&batter.player_id) {
            line.pa += 1;
            if outcome.is_at_bat() && !resolved.sacrifice_fly {
                line.ab += 1;
            }
            if outcome.is_hit() {
                line.h += 1;
            }
            match outcome {
                OutcomeCategory::Double => line.doubles += 1,
                OutcomeCategory::Triple => line.triples += 1,
                OutcomeCategory::HomeRun | OutcomeCategory::HomeRunInsidePark => line.hr += 1,
                OutcomeCategory::Walk | OutcomeCategory::IntentionalWalk => line.bb += 1,
                OutcomeCategory::HitByPitch => line.hbp += 1,
                OutcomeCategory::StrikeoutSwinging | OutcomeCategory::StrikeoutLooking => line.so += 1,
                OutcomeCategory::Sacrifice => line.sh += 1,
                _ => {}
            }
            if resolved.sacrifice_fly {
                line.sf += 1;
            }
            line.rbi += resolved.rbi_credits as u32;
        }

        if let Some(line) = self.current_pitching_line(fielding) {
            line.bf += 1;
            line.outs += resolved.outs_added as u32;
            if outcome.is_hit() {
                line.h += 1;
            }
            if outcome.is_walk() {
                line.bb += 1;
            }
            if outcome.is_strikeout() {
                line.so += 1;
            }
            if outcome.is_home_run() {
                line.hr += 1;
            }
        }

        {
            let state = &mut self.team_mut(fielding).pitcher.state;
            state.record_outs(resolved.outs_added as u32);
            if outcome.is_hit() || outcome.is_walk() || outcome == OutcomeCategory::HitByPitch {
                state.record_baserunner(outcome.is_hit());
            }
        }

        if outcome.is_hit() {
            self.team_mut(batting).hits += 1;
        }
        if outcome == OutcomeCategory::ReachedOnError {
            self.team_mut(fielding).errors += 1;
        }

        if let Some(out) = &resolved.runner_out {
            self.charges.remove(out);
        }
        if resolved.batter_reached_base {
            let charge = Charge {
                pitcher_id: self.team(fielding).pitcher_id().to_string(),
                earned: outcome != OutcomeCategory::ReachedOnError,
            };
            self.charges.insert(batter.player_id.clone(), charge);
        }

        let unearned = outcome == OutcomeCategory::ReachedOnError;
        for runner in &resolved.scorers {
            self.score_run(half, runner, unearned);
        }

        half.bases = resolved.bases_after;
        half.outs = (half.outs + resolved.outs_added).min(3);
    }

    fn score_run(&mut self, half: &mut HalfInning, runner_id: &str, unearned_play: bool) {
        let batting = half.batting;
        let fielding = half.fielding();
        let current = self.team(fielding).pitcher_id().to_string();
        let charge = self.charges.remove(runner_id).unwrap_or(Charge {
            pitcher_id: current.clone(),
            earned: true,
        });
        let earned = charge.earned && !unearned_play;

        if let Some(line) = self.pitching_line(&charge.pitcher_id) {
            line.r += 1;
            if earned {
                line.er += 1;
            }
        }
        if charge.pitcher_id == current {
            self.team_mut(fielding)
                .pitcher
                .state
                .record_runs(1, earned as u32);
        }
        if let Some(line) = self.batting_line(runner_id) {
            line.r += 1;
        }

        half.runs += 1;
        self.team_mut(batting).runs += 1;
        self.update_leader();
    }

    /// Track pitchers of record whenever the lead changes hands
    fn update_leader(&mut self) {
        let leader = match self.margin(TeamSide::Home) {
            m if m > 0 => Some(TeamSide::Home),
            m if m < 0 => Some(TeamSide::Away),
            _ => None,
        };
        if leader != self.leader {
            if let Some(side) = leader {
                for s in [side, side.opponent()] {
                    let id = self.team(s).pitcher_id().to_string();
                    self.team_mut(s).pitcher_of_record = Some(id);
                }
            }
            self.leader = leader;
        }
    }

    // ------------------------------------------------------------------------
    // Baserunning
    // ------------------------------------------------------------------------

    /// Lead runner with an open base in front of him
    fn stealable_runner(&self, bases: &BaseState) -> Option<(Base, PlayerId)> {
        if let Some(r) = bases.second() {
            if !bases.is_occupied(Base::Third) {
                return Some((Base::Second, r.clone()));
            }
        }
        match bases.first() {
            Some(r) if !bases.is_occupied(Base::Second) => Some((Base::First, r.clone())),
            _ => None,
        }
    }

    fn attempt_steal(&mut self, half: &mut HalfInning) {
        let Some((from, runner)) = self.stealable_runner(&half.bases) else {
            return;
        };
        let speed = self.speed_of(&runner);
        let success = self
            .rng
            .chance(STEAL_SUCCESS_BASE + STEAL_SUCCESS_PER_SPEED * speed);
        let Some(result) = resolve_steal(&half.bases, from, success) else {
            return;
        };

        half.bases = result.bases_after;
        if let Some(line) = self.batting_line(&runner) {
            if success {
                line.sb += 1;
            } else {
                line.cs += 1;
            }
        }
        if !success {
            self.charges.remove(&runner);
            let fielding = half.fielding();
            if let Some(line) = self.current_pitching_line(fielding) {
                line.outs += 1;
            }
            self.team_mut(fielding).pitcher.state.record_outs(1);
            half.outs = (half.outs + result.outs_added).min(3);
        }
        tracing::trace!("{} steal from {:?}: {}", runner, from, if success { "safe" } else { "caught" });
    }

    // ------------------------------------------------------------------------
    // Substitutions
    // ------------------------------------------------------------------------

    fn consider_pinch_hitter(&mut self, half: &HalfInning, slot: usize, batter: &PlayerCard) -> Option<PlayerCard> {
        let batting = half.batting;
        let team = self.team(batting);
        let (best_idx, best) = team
            .bench
            .iter()
            .enumerate()
            .fold(None, |acc: Option<(usize, &PlayerCard)>, (i, p)| match acc {
                Some((_, b)) if b.ops >= p.ops => acc,
                _ => Some((i, p)),
            })?;

        let throws = self.team(half.fielding()).pitcher.card.throws;
        let mut sit = self.situation(batting, half);
        sit.batter_ops = batter.ops;
        sit.bench_ops = Some(best.ops);
        sit.platoon_advantage = best.bats != throws && batter.bats == throws;
        if !self.decide(batting, Decision::PinchHit, sit) {
            return None;
        }

        let team = self.team_mut(batting);
        let pinch = team.bench.remove(best_idx);
        match team.slots.get_mut(slot) {
            Some(LineupSlot::Batter(card)) => *card = pinch.clone(),
            _ => team.pitcher_lifted = true,
        }
        tracing::debug!("{} pinch-hits for {} in the {}", pinch.player_id, batter.player_id, half.inning);
        self.register_batter(&pinch, batting);
        Some(pinch)
    }

    fn check_pitching_change(&mut self, half: &HalfInning) {
        let side = half.fielding();
        let inning = half.inning;
        let deficit = -self.margin(side);
        {
            let state = &mut self.team_mut(side).pitcher.state;
            state.current_inning = inning;
            state.run_deficit = deficit;
        }

        let team = self.team(side);
        if team.pitcher.card.role != PitcherRole::Closer
            && team.closer.is_some()
            && should_bring_in_closer(-deficit, inning, half.bases.runner_count())
        {
            if let Some(closer) = self.team_mut(side).closer.take() {
                self.change_pitcher(side, closer, inning, "save situation");
                return;
            }
        }

        let team = self.team(side);
        let reason = if team.pitcher_lifted {
            Some("pinch-hit for")
        } else {
            removal_reason(&team.pitcher.card, &team.pitcher.state).map(RemovalReason::label)
        };
        let no_arms = team.bullpen.is_empty() && team.closer.is_none();

        let reason = match reason {
            Some(r) => Some(r),
            None if !no_arms => {
                let grade = self.effective_grade(side) as f64;
                let nominal = self.team(side).pitcher.card.grade.max(1) as f64;
                let mut sit = self.situation(side, half);
                sit.pitcher_grade_pct = grade / nominal;
                self.decide(side, Decision::PitcherPull, sit).then_some("manager pull")
            }
            None => None,
        };

        if let Some(reason) = reason {
            if let Some(reliever) = self.team_mut(side).take_reliever() {
                self.change_pitcher(side, reliever, inning, reason);
            }
        }
    }

    fn change_pitcher(&mut self, side: TeamSide, incoming: PitcherCard, inning: u32, reason: &str) {
        let lead = self.margin(side);
        tracing::debug!(
            "{} pitching change in the {}: {} replaces {} ({})",
            side,
            inning,
            incoming.pitcher_id,
            self.team(side).pitcher_id(),
            reason
        );
        self.register_pitcher(&incoming, side, false);
        let team = self.team_mut(side);
        team.pitcher = ActivePitcher {
            state: PitcherGameState::new(&incoming.pitcher_id, inning),
            card: incoming,
            entry_lead: lead,
        };
        team.pitchers_used += 1;
        team.pitcher_lifted = false;
    }

    // ------------------------------------------------------------------------
    // Final box score
    // ------------------------------------------------------------------------

    fn finish(mut self, innings: u32) -> GameResult {
        for side in [TeamSide::Away, TeamSide::Home] {
            if self.team(side).pitchers_used == 1 {
                let allowed = self.runs(side.opponent());
                if let Some(line) = self.current_pitching_line(side) {
                    line.cg = true;
                    line.sho = allowed == 0;
                }
            }
        }

        if let Some(winner) = self.leader {
            let loser = winner.opponent();
            let win_id = self.team(winner).pitcher_of_record.clone();
            let loss_id = self.team(loser).pitcher_of_record.clone();
            if let Some(line) = win_id.as_deref().and_then(|id| self.pitching_line(id)) {
                line.decision = Some(PitchingDecision::Win);
            }
            if let Some(line) = loss_id.as_deref().and_then(|id| self.pitching_line(id)) {
                line.decision = Some(PitchingDecision::Loss);
            }

            let finisher = &self.team(winner).pitcher;
            let save_id = finisher.card.pitcher_id.clone();
            let save_spot = (1..=3).contains(&finisher.entry_lead) && Some(&save_id) != win_id.as_ref();
            if save_spot {
                if let Some(line) = self.pitching_line(&save_id) {
                    if line.outs > 0 {
                        line.decision = Some(PitchingDecision::Save);
                    }
                }
            }
        }

        let (away_id, away_runs) = (self.team(TeamSide::Away).team_id.clone(), self.runs(TeamSide::Away));
        let (home_id, home_runs) = (self.team(TeamSide::Home).team_id.clone(), self.runs(TeamSide::Home));
        let [away, home] = self.teams;
        let line_score = LineScore {
            away: away.innings.iter().map(|r| r.unwrap_or(0)).collect(),
            home: home.innings,
            away_hits: away.hits,
            home_hits: home.hits,
            away_errors: away.errors,
            home_errors: home.errors,
        };

        tracing::debug!(
            "game {} final: {} {} - {} {} ({} innings)",
            self.game_id,
            away_id,
            away_runs,
            home_id,
            home_runs,
            innings
        );

        GameResult {
            game_id: self.game_id,
            seed: self.seed,
            home_team_id: home_id,
            away_team_id: away_id,
            home_score: home_runs,
            away_score: away_runs,
            innings,
            line_score,
            player_batting_lines: self.batting,
            player_pitching_lines: self.pitching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_config;

    #[test]
    fn test_game_completes() {
        let result = run_game(&sample_config(7).unwrap()).unwrap();
        assert!(result.innings >= 9);
        assert_eq!(result.line_score.away.len() as u32, result.innings);
        assert_eq!(result.line_score.home.len() as u32, result.innings);
        if result.is_tie() {
            assert_eq!(result.innings, crate::config::DEFAULT_MAX_INNINGS);
        }
    }

    #[test]
    fn test_deterministic() {
        let config = sample_config(99).unwrap();
        let a = run_game(&config).unwrap();
        let b = run_game(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_accounting() {
        for seed in 0..40 {
            let result = run_game(&sample_config(seed).unwrap()).unwrap();
            for side in [TeamSide::Away, TeamSide::Home] {
                let runs: u32 = result.batting_for(side).map(|l| l.r).sum();
                assert_eq!(runs, result.score(side), "seed {} side {}", seed, side);
                let allowed: u32 = result.pitching_for(side.opponent()).map(|l| l.r).sum();
                assert_eq!(allowed, result.score(side), "seed {} side {}", seed, side);
            }
            let inning_runs: u32 = result.line_score.away.iter().sum();
            assert_eq!(inning_runs, result.away_score);
        }
    }

    #[test]
    fn test_shared_ids_never_reach_the_box_score() {
        // Same club on both sides would merge batting lines across teams
        let mut config = sample_config(3).unwrap();
        config.away_lineup = config.home_lineup.clone();
        config.away_batter_cards = config.home_batter_cards.clone();
        assert!(matches!(run_game(&config), Err(ConfigError::SharedPlayerId { .. })));
    }

    #[test]
    fn test_outs_add_up() {
        for seed in 0..20 {
            let result = run_game(&sample_config(seed).unwrap()).unwrap();
            // The away team always gets three outs in each of its innings
            let home_outs: u32 = result.pitching_for(TeamSide::Home).map(|l| l.outs).sum();
            assert_eq!(home_outs, 3 * result.innings, "seed {}", seed);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = sample_config(1).unwrap();
        config.away_lineup.truncate(5);
        assert!(matches!(GameRunner::new(&config), Err(ConfigError::LineupSize { .. })));
    }

    #[test]
    fn test_no_dh_game() {
        let mut sheet = crate::sample::sample_game(12);
        sheet.options.designated_hitter = false;
        let config = sheet.to_config().unwrap();
        let result = run_game(&config).unwrap();
        let starter = &config.home_starting_pitcher.pitcher_id;
        assert!(result.batting_line(starter).is_some());
    }

    #[test]
    fn test_decisions_assigned() {
        for seed in 0..20 {
            let result = run_game(&sample_config(seed).unwrap()).unwrap();
            let Some(winner) = result.winner() else { continue };
            let wins = result
                .pitching_for(winner)
                .filter(|l| l.decision == Some(PitchingDecision::Win))
                .count();
            let losses = result
                .pitching_for(winner.opponent())
                .filter(|l| l.decision == Some(PitchingDecision::Loss))
                .count();
            assert_eq!((wins, losses), (1, 1), "seed {}", seed);
        }
    }

    #[test]
    fn test_hit_and_run_conversions() {
        use OutcomeCategory::*;
        assert_eq!(hit_and_run_outcome(SingleClean), (SingleAdvance, false));
        assert_eq!(hit_and_run_outcome(GroundIntoDoublePlay), (GroundOut, false));
        assert_eq!(hit_and_run_outcome(StrikeoutSwinging), (StrikeoutSwinging, true));
        assert_eq!(hit_and_run_outcome(StrikeoutLooking), (StrikeoutLooking, true));
        for other in [SingleAdvance, Double, HomeRun, Walk, FlyOut, LineIntoDoublePlay, GroundOut] {
            assert_eq!(hit_and_run_outcome(other), (other, false));
        }
    }

    fn ninth_inning_top() -> HalfInning {
        HalfInning {
            inning: 9,
            batting: TeamSide::Away,
            outs: 0,
            bases: BaseState::empty(),
            runs: 0,
        }
    }

    #[test]
    fn test_closer_enters_save_situation() {
        let config = sample_config(5).unwrap();
        let closer_id = config.home_closer.as_ref().map(|c| c.pitcher_id.clone()).unwrap();
        let mut runner = GameRunner::new(&config).unwrap();
        runner.team_mut(TeamSide::Home).runs = 5;
        runner.team_mut(TeamSide::Away).runs = 3;

        runner.check_pitching_change(&ninth_inning_top());

        let home = runner.team(TeamSide::Home);
        assert_eq!(home.pitcher_id(), closer_id);
        assert_eq!(home.pitcher.card.role, PitcherRole::Closer);
        assert_eq!(home.pitcher.entry_lead, 2);
        assert_eq!(home.pitchers_used, 2);
        assert!(home.closer.is_none());
        assert!(runner.pitching_index.contains_key(&closer_id));
    }

    #[test]
    fn test_closer_waits_without_save_situation() {
        let config = sample_config(5).unwrap();
        let mut runner = GameRunner::new(&config).unwrap();
        runner.team_mut(TeamSide::Home).runs = 8;
        runner.team_mut(TeamSide::Away).runs = 3;

        runner.check_pitching_change(&ninth_inning_top());

        let home = runner.team(TeamSide::Home);
        assert_ne!(home.pitcher.card.role, PitcherRole::Closer);
        assert!(home.closer.is_some());
    }
}
