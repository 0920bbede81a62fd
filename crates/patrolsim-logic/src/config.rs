//! Simulation parameters.
//!
//! Everything the driver needs besides the empire itself. Values are taken
//! as given; [`SimulationConfig::validate`] reports every problem at once and
//! [`crate::simulation::Simulation::new`] refuses to start on any of them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::factory::RateParams;
use crate::population::EpidemicPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Final instant of evolution. Events scheduled exactly at the horizon
    /// still fire.
    pub horizon: f64,
    /// Individuals created by [`crate::simulation::Simulation::seed_population`].
    pub initial_population: usize,
    /// Bound restored by every epidemic.
    pub max_population: usize,
    pub rates: RateParams,
    pub epidemic: EpidemicPolicy,
    pub seed: u64,
    /// Stop after this many executed events.
    pub max_events: Option<u64>,
    /// Stop once the best comfort found reaches this value.
    pub target_comfort: Option<f64>,
    /// Periodic observations spread evenly across the horizon.
    pub observations: u32,
    /// Distinct allocations tracked on the candidate leaderboard.
    pub candidate_pool: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 100.0,
            initial_population: 10,
            max_population: 50,
            rates: RateParams::default(),
            epidemic: EpidemicPolicy::default(),
            seed: 42,
            max_events: None,
            target_comfort: Some(1.0),
            observations: 20,
            candidate_pool: 6,
        }
    }
}

impl SimulationConfig {
    /// Every problem with this configuration; empty when it is usable.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_population == 0 {
            errors.push(ConfigError::ZeroMaxPopulation);
        }
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            errors.push(ConfigError::InvalidHorizon(self.horizon));
        }
        if let Some(target) = self.target_comfort {
            if !(target > 0.0 && target <= 1.0) {
                errors.push(ConfigError::InvalidTargetComfort(target));
            }
        }
        errors.extend(self.rates.validate());

        errors
    }

    /// Spacing between periodic observations; `None` disables them.
    pub fn observation_interval(&self) -> Option<f64> {
        if self.observations == 0 || self.horizon <= 0.0 {
            return None;
        }
        Some(self.horizon / self.observations as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_empty());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = SimulationConfig {
            max_population: 0,
            horizon: f64::NAN,
            target_comfort: Some(1.5),
            rates: RateParams {
                death: -0.5,
                ..RateParams::default()
            },
            ..SimulationConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ConfigError::ZeroMaxPopulation);
        assert!(errors.contains(&ConfigError::InvalidTargetComfort(1.5)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"horizon": 12.5, "epidemic": "stochastic"}"#).unwrap();
        assert_eq!(config.horizon, 12.5);
        assert_eq!(config.epidemic, EpidemicPolicy::Stochastic);
        assert_eq!(config.max_population, 50);
    }

    #[test]
    fn test_observation_interval() {
        let config = SimulationConfig {
            horizon: 40.0,
            observations: 20,
            ..SimulationConfig::default()
        };
        assert_eq!(config.observation_interval(), Some(2.0));

        let silent = SimulationConfig {
            observations: 0,
            ..config
        };
        assert_eq!(silent.observation_interval(), None);
    }
}
