//! Stochastic event selection.
//!
//! Three exponential clocks race, one per event kind; the earliest wins.
//! Comfort stretches or shrinks each clock's mean:
//!
//! - death:        `(1 - ln(1 - c)) * rates.death`
//! - mutation:     `(1 - ln c) * rates.mutation`
//! - reproduction: `(1 - ln c) * rates.reproduction`
//!
//! so comfortable individuals die later and mutate/reproduce sooner.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::{Event, EventKind};

/// Comfort is clamped this far away from 0 and 1 so both logarithms stay finite.
const COMFORT_MARGIN: f64 = 1e-9;

/// Smallest delay between now and a scheduled event.
const MIN_DELAY: f64 = 1e-9;

/// Mean-delay constants for each event kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParams {
    pub death: f64,
    pub mutation: f64,
    pub reproduction: f64,
}

impl Default for RateParams {
    fn default() -> Self {
        Self {
            death: 1.0,
            mutation: 1.0,
            reproduction: 1.0,
        }
    }
}

impl RateParams {
    /// Every constant must be finite and non-negative.
    pub fn validate(&self) -> Vec<ConfigError> {
        [
            ("death", self.death),
            ("mutation", self.mutation),
            ("reproduction", self.reproduction),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_finite() || *value < 0.0)
        .map(|(name, value)| ConfigError::InvalidRate { name, value })
        .collect()
    }
}

/// Mean delays for one individual, derived from its comfort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanDelays {
    pub death: f64,
    pub mutation: f64,
    pub reproduction: f64,
}

/// Draws the next event for an individual.
#[derive(Debug, Clone)]
pub struct EventFactory {
    rates: RateParams,
}

impl EventFactory {
    pub fn new(rates: RateParams) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> RateParams {
        self.rates
    }

    pub fn mean_delays(&self, comfort: f64) -> MeanDelays {
        let c = if comfort.is_nan() {
            COMFORT_MARGIN
        } else {
            comfort.clamp(COMFORT_MARGIN, 1.0 - COMFORT_MARGIN)
        };
        let vigour = 1.0 - c.ln();
        MeanDelays {
            death: (1.0 - (1.0 - c).ln()) * self.rates.death,
            mutation: vigour * self.rates.mutation,
            reproduction: vigour * self.rates.reproduction,
        }
    }

    /// Draw the next event for an individual of the given comfort, scheduled
    /// strictly after `now`. Consumes exactly three uniforms, in the order
    /// death, mutation, reproduction.
    pub fn create_event(&self, comfort: f64, now: f64, rng: &mut impl Rng) -> Event {
        let means = self.mean_delays(comfort);
        let death = sample_delay(means.death, rng);
        let mutation = sample_delay(means.mutation, rng);
        let reproduction = sample_delay(means.reproduction, rng);

        let (kind, delay) = if mutation < death && mutation < reproduction {
            (EventKind::Mutate, mutation)
        } else if reproduction < death && reproduction < mutation {
            (EventKind::Reproduce, reproduction)
        } else {
            (EventKind::Death, death)
        };

        // The floor grows with `now` so the sum never rounds back onto it.
        let floor = MIN_DELAY.max(now.abs() * f64::EPSILON);
        Event::new(kind, now + delay.max(floor))
    }
}

/// Inverse-CDF exponential sample with the given mean.
fn sample_delay(mean: f64, rng: &mut impl Rng) -> f64 {
    let u: f64 = rng.gen();
    -mean * (1.0 - u).ln()
}
