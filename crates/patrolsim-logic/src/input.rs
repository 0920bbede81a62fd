//! Scenario input: the numeric parameters and timing table of one run.
//!
//! The text format is whitespace separated:
//!
//! ```text
//! n m tau nu nuMax mu rho delta
//! C[0][0] .. C[0][m-1]
//! ..
//! C[n-1][0] .. C[n-1][m-1]
//! ```
//!
//! where `C[p][s]` is the time patrol `p` needs to pacify system `s`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{ConfigError, InputError};
use crate::factory::RateParams;
use crate::model::Empire;

/// Range of generated pacification times, inclusive.
const RANDOM_TIME_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Scalar parameters shared by file and command-line input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub patrols: usize,
    pub systems: usize,
    pub tau: u32,
    pub nu: usize,
    pub nu_max: usize,
    pub mu: f64,
    pub rho: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub parameters: Parameters,
    /// `times[patrol][system]`.
    pub times: Vec<Vec<u32>>,
}

impl Parameters {
    /// Parse the eight scalar parameters from the front of `tokens`.
    pub fn parse<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Self, InputError> {
        Ok(Self {
            patrols: next_value(tokens, "n")?,
            systems: next_value(tokens, "m")?,
            tau: next_value(tokens, "tau")?,
            nu: next_value(tokens, "nu")?,
            nu_max: next_value(tokens, "nuMax")?,
            mu: next_value(tokens, "mu")?,
            rho: next_value(tokens, "rho")?,
            delta: next_value(tokens, "delta")?,
        })
    }

    /// Overlay these parameters on `base`.
    ///
    /// `mu`, `rho` and `delta` drive the death, mutation and reproduction
    /// clocks respectively.
    pub fn apply(&self, base: SimulationConfig) -> SimulationConfig {
        SimulationConfig {
            horizon: self.tau as f64,
            initial_population: self.nu,
            max_population: self.nu_max,
            rates: RateParams {
                death: self.mu,
                mutation: self.rho,
                reproduction: self.delta,
            },
            ..base
        }
    }
}

impl Scenario {
    /// Parse the full text format. Trailing values are an error.
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut tokens = text.split_whitespace();
        let parameters = Parameters::parse(&mut tokens)?;

        // Counts come from the input; size nothing until the values are known to exist.
        let cells = parameters.patrols.checked_mul(parameters.systems);
        if cells.map_or(true, |cells| cells > tokens.clone().count()) {
            return Err(InputError::Missing("C"));
        }
        if parameters.systems == 0 && parameters.patrols > 0 {
            return Err(ConfigError::NoSystems.into());
        }

        let mut times = Vec::new();
        for _ in 0..parameters.patrols {
            let mut row = Vec::new();
            for _ in 0..parameters.systems {
                row.push(next_value(&mut tokens, "C")?);
            }
            times.push(row);
        }

        let trailing = tokens.count();
        if trailing > 0 {
            return Err(InputError::Trailing(trailing));
        }
        Ok(Self { parameters, times })
    }

    /// A scenario with a random `n x m` timing table.
    pub fn random(parameters: Parameters, rng: &mut impl Rng) -> Self {
        let times = (0..parameters.patrols)
            .map(|_| {
                (0..parameters.systems)
                    .map(|_| rng.gen_range(RANDOM_TIME_RANGE))
                    .collect()
            })
            .collect();
        Self { parameters, times }
    }

    /// The catalog described by the timing table.
    pub fn empire(&self) -> Result<Empire, InputError> {
        let empire = Empire::from_table(&self.times)?;
        if empire.patrol_count() != self.parameters.patrols
            || empire.system_count() != self.parameters.systems
        {
            return Err(ConfigError::TableShape {
                patrols: self.parameters.patrols,
                systems: self.parameters.systems,
                found_patrols: empire.patrol_count(),
                found_systems: empire.system_count(),
            }
            .into());
        }
        Ok(empire)
    }

    pub fn config(&self, base: SimulationConfig) -> SimulationConfig {
        self.parameters.apply(base)
    }
}

fn next_value<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<T, InputError> {
    let token = tokens.next().ok_or(InputError::Missing(field))?;
    token.parse().map_err(|_| InputError::Invalid {
        field,
        token: token.to_string(),
    })
}
