//! The bounded population of live individuals.
//!
//! Individuals are kept in insertion order. That order is the tie-break for
//! every selection in this module: among equals, the earlier-inserted
//! individual wins. Inserting never fails; the bound is restored explicitly
//! by [`Population::handle_epidemic`].

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::individual::{Individual, IndividualId};

/// Under the stochastic policy this many of the best always survive.
const ELITE_SURVIVORS: usize = 5;

/// Under the stochastic policy a non-elite survives with
/// probability `SURVIVAL_FACTOR * comfort`.
const SURVIVAL_FACTOR: f64 = 2.0 / 3.0;

/// How an overcrowded population is culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpidemicPolicy {
    /// Remove the lowest-comfort individuals until the bound holds.
    #[default]
    CullWeakest,
    /// The elite survive; everyone else survives with a comfort-weighted
    /// chance. Survivors are then cut down to the bound by comfort.
    Stochastic,
}

/// Every live individual, bounded by `max_population` after each epidemic.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    max_population: usize,
}

impl Population {
    pub fn new(max_population: usize) -> Self {
        Self {
            individuals: Vec::new(),
            max_population,
        }
    }

    /// Insert at the end of the iteration order. May exceed the bound.
    pub fn add_individual(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    /// Remove and return the individual with `id`.
    pub fn remove(&mut self, id: IndividualId) -> Option<Individual> {
        let position = self.position(id)?;
        Some(self.individuals.remove(position))
    }

    pub fn get(&self, id: IndividualId) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: IndividualId) -> Option<&mut Individual> {
        self.individuals.iter_mut().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: IndividualId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: IndividualId) -> Option<usize> {
        self.individuals.iter().position(|i| i.id() == id)
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn max_population(&self) -> usize {
        self.max_population
    }

    pub fn is_overcrowded(&self) -> bool {
        self.individuals.len() > self.max_population
    }

    /// Highest comfort; the earliest-inserted wins ties. `None` when empty.
    pub fn best_individual(&self) -> Option<&Individual> {
        self.individuals.iter().fold(None, |best, candidate| match best {
            Some(b) if candidate.comfort() <= b.comfort() => Some(b),
            _ => Some(candidate),
        })
    }

    /// The individual whose pending event fires first; the earliest-inserted
    /// wins ties.
    pub fn next_due(&self) -> Option<&Individual> {
        self.individuals.iter().fold(None, |next, candidate| match next {
            Some(n) if candidate.time() >= n.time() => Some(n),
            _ => Some(candidate),
        })
    }

    /// Up to `count` individuals with distinct allocations, best first.
    pub fn candidate_distributions(&self, count: usize) -> Vec<&Individual> {
        let mut seen: HashSet<&Allocation> = HashSet::new();
        self.ranked()
            .into_iter()
            .map(|index| &self.individuals[index])
            .filter(|individual| seen.insert(individual.allocation()))
            .take(count)
            .collect()
    }

    /// Restore `len() <= max_population()`. Returns how many were removed;
    /// zero (and no random draws) when the population is within bounds.
    pub fn handle_epidemic(&mut self, policy: EpidemicPolicy, rng: &mut impl Rng) -> usize {
        if !self.is_overcrowded() {
            return 0;
        }

        let ranked = self.ranked();
        let mut keep = vec![false; self.individuals.len()];
        match policy {
            EpidemicPolicy::CullWeakest => {
                for &index in ranked.iter().take(self.max_population) {
                    keep[index] = true;
                }
            }
            EpidemicPolicy::Stochastic => {
                let mut kept = 0;
                for (rank, &index) in ranked.iter().enumerate() {
                    let survives = rank < ELITE_SURVIVORS
                        || rng.gen::<f64>() < SURVIVAL_FACTOR * self.individuals[index].comfort();
                    if survives && kept < self.max_population {
                        keep[index] = true;
                        kept += 1;
                    }
                }
            }
        }

        let before = self.individuals.len();
        let mut flags = keep.into_iter();
        self.individuals.retain(|_| flags.next().unwrap_or(false));
        before - self.individuals.len()
    }

    /// Indices ordered by comfort, best first; stable, so insertion order
    /// breaks ties.
    fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by(|&a, &b| {
            self.individuals[b]
                .comfort()
                .total_cmp(&self.individuals[a].comfort())
        });
        order
    }
}
