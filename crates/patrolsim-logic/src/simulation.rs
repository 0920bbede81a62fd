//! Simulation driver. Owns the clock and runs the event loop.
//!
//! Each step picks the live individual whose pending event fires first,
//! advances the clock to it, applies the event, and culls the population if
//! it overflowed. The loop ends when the population dies out, the event
//! budget is spent, the target comfort is reached, or the next event lies
//! beyond the horizon (checked in that order). Events exactly at the horizon
//! still fire.
//!
//! There is one random generator per run, seeded from the config, and every
//! draw goes through it in a fixed order. Two runs with the same empire and
//! config produce the same event sequence.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::comfort::{ComfortModel, MakespanComfort};
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::event::{Event, EventKind, EventRecord};
use crate::factory::EventFactory;
use crate::individual::{Individual, IndividualId, Snapshot};
use crate::model::Empire;
use crate::population::Population;

/// Other candidate distributions listed in each observation.
const OTHER_CANDIDATES: usize = 5;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The next pending event lies beyond the horizon.
    Horizon,
    /// No individual is left.
    Extinct,
    /// `max_events` events have been executed.
    EventBudget,
    /// The best comfort found reached `target_comfort`.
    TargetComfort,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Horizon => "horizon reached",
            Termination::Extinct => "population extinct",
            Termination::EventBudget => "event budget spent",
            Termination::TargetComfort => "target comfort reached",
        };
        f.write_str(text)
    }
}

/// Outcome of a single [`Simulation::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Executed(EventRecord),
    Halted(Termination),
}

/// State of the run at one instant, for external reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub number: u32,
    pub time: f64,
    pub events: u64,
    pub population: usize,
    pub epidemics: u64,
    pub best: Option<Snapshot>,
    /// Runner-up distributions, best first, excluding `best`.
    pub candidates: Vec<Snapshot>,
}

/// Everything a finished run exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub termination: Option<Termination>,
    pub clock: f64,
    pub events: u64,
    pub epidemics: u64,
    pub population: usize,
    /// Best live individual; `None` once extinct.
    pub best: Option<Snapshot>,
    /// Best individual ever seen, alive or not.
    pub best_found: Option<Snapshot>,
    pub candidates: Vec<Snapshot>,
    pub observations: Vec<Observation>,
}

/// One simulation run.
#[derive(Debug)]
pub struct Simulation {
    empire: Empire,
    config: SimulationConfig,
    comfort_model: Box<dyn ComfortModel>,
    factory: EventFactory,
    population: Population,
    rng: StdRng,
    clock: f64,
    next_id: u64,
    events: u64,
    epidemics: u64,
    best_found: Option<Snapshot>,
    candidates: Vec<Snapshot>,
    observations: Vec<Observation>,
    next_observation: u32,
    termination: Option<Termination>,
}

impl Simulation {
    /// An empty run scored with [`MakespanComfort`].
    pub fn new(empire: Empire, config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_comfort_model(empire, config, Box::new(MakespanComfort))
    }

    pub fn with_comfort_model(
        empire: Empire,
        config: SimulationConfig,
        comfort_model: Box<dyn ComfortModel>,
    ) -> Result<Self, ConfigError> {
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error);
        }

        Ok(Self {
            factory: EventFactory::new(config.rates),
            population: Population::new(config.max_population),
            rng: StdRng::seed_from_u64(config.seed),
            empire,
            config,
            comfort_model,
            clock: 0.0,
            next_id: 0,
            events: 0,
            epidemics: 0,
            best_found: None,
            candidates: Vec::new(),
            observations: Vec::new(),
            next_observation: 1,
            termination: None,
        })
    }

    pub fn empire(&self) -> &Empire {
        &self.empire
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn individual(&self, id: IndividualId) -> Option<&Individual> {
        self.population.get(id)
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn epidemics(&self) -> u64 {
        self.epidemics
    }

    pub fn best_found(&self) -> Option<&Snapshot> {
        self.best_found.as_ref()
    }

    pub fn candidates(&self) -> &[Snapshot] {
        &self.candidates
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Create `initial_population` individuals with random allocations, each
    /// with its first event drawn from the current clock.
    ///
    /// A seed larger than `max_population` is culled straight away, so the
    /// returned ids may name individuals that did not survive.
    pub fn seed_population(&mut self) -> Vec<IndividualId> {
        let mut ids = Vec::with_capacity(self.config.initial_population);
        for _ in 0..self.config.initial_population {
            let allocation = Allocation::random(&self.empire, &mut self.rng);
            ids.push(self.spawn(allocation, self.clock));
        }
        self.enforce_bound();
        self.refresh_best();
        self.refresh_candidates();

        log::info!(
            "Seeded {} individuals over {} patrols and {} systems (t_min={:.3})",
            ids.len(),
            self.empire.patrol_count(),
            self.empire.system_count(),
            self.empire.t_min()
        );
        ids
    }

    /// Add an individual with a caller-chosen allocation and a freshly drawn
    /// event.
    pub fn insert_individual(&mut self, allocation: Allocation) -> Result<IndividualId, ConfigError> {
        allocation.check(&self.empire)?;
        let id = self.spawn(allocation, self.clock);
        self.refresh_best();
        self.refresh_candidates();
        Ok(id)
    }

    /// Draw a new pending event for `id`, scheduled after `now`.
    pub fn set_next_event(&mut self, now: f64, id: IndividualId) -> Option<Event> {
        let comfort = self.population.get(id)?.comfort();
        let event = self.factory.create_event(comfort, now, &mut self.rng);
        self.population.get_mut(id)?.set_event(event);
        Some(event)
    }

    /// Replace the pending event of `id`. Returns `false` if it is not alive
    /// or the event lies before the clock.
    pub fn schedule(&mut self, id: IndividualId, event: Event) -> bool {
        if event.time() < self.clock {
            return false;
        }
        match self.population.get_mut(id) {
            Some(individual) => {
                individual.set_event(event);
                true
            }
            None => false,
        }
    }

    /// Execute the pending event of `id` at `now`, rescheduling the survivor
    /// and any offspring. `None` if `id` is not alive.
    pub fn perform_event(&mut self, id: IndividualId, now: f64) -> Option<EventRecord> {
        let kind = self.population.get(id)?.event().kind();

        let offspring = match kind {
            EventKind::Death => {
                self.population.remove(id);
                None
            }
            EventKind::Mutate => {
                self.mutate(id);
                self.set_next_event(now, id);
                None
            }
            EventKind::Reproduce => {
                let child = self.reproduce(id, now);
                self.set_next_event(now, id);
                child
            }
        };

        let record = EventRecord {
            time: now,
            kind,
            individual: id,
            offspring,
            population: self.population.len(),
        };
        log::trace!(
            "t={:.4} {} {} -> population {}",
            record.time,
            record.kind,
            record.individual,
            record.population
        );
        Some(record)
    }

    /// Execute the earliest pending event, or stop the run.
    pub fn step(&mut self) -> Step {
        if let Some(reason) = self.termination {
            return Step::Halted(reason);
        }

        let (id, time) = match self.population.next_due() {
            Some(next) => (next.id(), next.time()),
            None => return self.halt(Termination::Extinct),
        };
        if self
            .config
            .max_events
            .is_some_and(|limit| self.events >= limit)
        {
            return self.halt(Termination::EventBudget);
        }
        if self.target_reached() {
            return self.halt(Termination::TargetComfort);
        }
        if time > self.config.horizon {
            return self.halt(Termination::Horizon);
        }

        self.clock = time;
        let Some(record) = self.perform_event(id, time) else {
            unreachable!("individual {id} was selected but is not in the population");
        };
        self.events += 1;
        self.enforce_bound();

        self.refresh_best();
        self.refresh_candidates();
        self.observe_if_due();

        Step::Executed(record)
    }

    /// Step until the run stops.
    pub fn run(&mut self) -> Report {
        while let Step::Executed(_) = self.step() {}
        self.report()
    }

    pub fn report(&self) -> Report {
        Report {
            termination: self.termination,
            clock: self.clock,
            events: self.events,
            epidemics: self.epidemics,
            population: self.population.len(),
            best: self
                .population
                .best_individual()
                .map(Individual::snapshot),
            best_found: self.best_found.clone(),
            candidates: self.candidates.clone(),
            observations: self.observations.clone(),
        }
    }

    /// Run an epidemic if the population is over its bound.
    fn enforce_bound(&mut self) {
        if !self.population.is_overcrowded() {
            return;
        }
        let removed = self
            .population
            .handle_epidemic(self.config.epidemic, &mut self.rng);
        self.epidemics += 1;
        log::debug!(
            "Epidemic at t={:.4}: {} removed, {} remain",
            self.clock,
            removed,
            self.population.len()
        );
    }

    fn spawn(&mut self, allocation: Allocation, now: f64) -> IndividualId {
        let (policing_time, comfort) =
            score(&self.empire, self.comfort_model.as_ref(), &allocation);
        let event = self.factory.create_event(comfort, now, &mut self.rng);
        let id = IndividualId(self.next_id);
        self.next_id += 1;
        self.population
            .add_individual(Individual::new(id, allocation, policing_time, comfort, event));
        id
    }

    fn mutate(&mut self, id: IndividualId) {
        let Some(individual) = self.population.get_mut(id) else {
            return;
        };
        if individual.allocation_mut().relocate(&mut self.rng) {
            let (policing_time, comfort) = score(
                &self.empire,
                self.comfort_model.as_ref(),
                individual.allocation(),
            );
            individual.rescore(policing_time, comfort);
        }
    }

    /// The child re-deals `floor((1 - comfort) * m)` systems of the parent.
    fn reproduce(&mut self, id: IndividualId, now: f64) -> Option<IndividualId> {
        let parent = self.population.get(id)?;
        let unrest = 1.0 - parent.comfort().clamp(0.0, 1.0);
        let count = (unrest * self.empire.system_count() as f64).floor() as usize;
        let allocation = parent
            .allocation()
            .perturbed(count, &self.empire, &mut self.rng);
        Some(self.spawn(allocation, now))
    }

    fn halt(&mut self, reason: Termination) -> Step {
        self.termination = Some(reason);
        self.record_observation();
        log::info!(
            "Simulation stopped ({}) at t={:.4} after {} events and {} epidemics; {} alive",
            reason,
            self.clock,
            self.events,
            self.epidemics,
            self.population.len()
        );
        Step::Halted(reason)
    }

    fn target_reached(&self) -> bool {
        match (self.config.target_comfort, &self.best_found) {
            (Some(target), Some(best)) => best.comfort >= target,
            _ => false,
        }
    }

    /// Keep a detached copy of the best individual ever seen.
    fn refresh_best(&mut self) {
        let Some(current) = self.population.best_individual() else {
            return;
        };
        let improved = self
            .best_found
            .as_ref()
            .map_or(true, |best| current.comfort() > best.comfort);
        if improved {
            self.best_found = Some(current.snapshot());
        }
    }

    /// Merge the population's top distinct allocations into the leaderboard.
    fn refresh_candidates(&mut self) {
        let pool = self.config.candidate_pool;
        if pool == 0 {
            return;
        }

        let mut merged: Vec<Snapshot> = self
            .population
            .candidate_distributions(pool)
            .into_iter()
            .map(Individual::snapshot)
            .collect();
        merged.append(&mut self.candidates);
        merged.sort_by(|a, b| b.comfort.total_cmp(&a.comfort));

        let mut seen = HashSet::new();
        merged.retain(|snapshot| seen.insert(snapshot.allocation.clone()));
        merged.truncate(pool);
        self.candidates = merged;
    }

    fn observe_if_due(&mut self) {
        if let Some(interval) = self.config.observation_interval() {
            // One event can jump several intervals; number them all.
            while self.clock >= self.next_observation as f64 * interval {
                self.record_observation();
            }
        }
    }

    fn record_observation(&mut self) {
        let best = self.best_found.clone();
        let candidates = self
            .candidates
            .iter()
            .filter(|c| best.as_ref().map_or(true, |b| c.allocation != b.allocation))
            .take(OTHER_CANDIDATES)
            .cloned()
            .collect();

        self.observations.push(Observation {
            number: self.next_observation,
            time: self.clock,
            events: self.events,
            population: self.population.len(),
            epidemics: self.epidemics,
            best,
            candidates,
        });
        self.next_observation += 1;
    }
}

fn score(empire: &Empire, model: &dyn ComfortModel, allocation: &Allocation) -> (u64, f64) {
    (
        allocation.policing_time(empire),
        model.comfort(allocation, empire),
    )
}
