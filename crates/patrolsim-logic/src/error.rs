//! Error types for configuration and scenario input.

use thiserror::Error;

/// A simulation cannot be built from these parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("maximum population must be at least 1")]
    ZeroMaxPopulation,
    #[error("{name} rate must be a finite non-negative number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("horizon must be a finite non-negative number, got {0}")]
    InvalidHorizon(f64),
    #[error("target comfort must lie in (0, 1], got {0}")]
    InvalidTargetComfort(f64),
    #[error("an empire needs at least one patrol")]
    NoPatrols,
    #[error("an empire needs at least one planetary system")]
    NoSystems,
    #[error("system {system} has {found} patrol timings, expected {expected}")]
    TimingWidth {
        system: usize,
        expected: usize,
        found: usize,
    },
    #[error("timing table is {found_patrols}x{found_systems}, expected {patrols}x{systems}")]
    TableShape {
        patrols: usize,
        systems: usize,
        found_patrols: usize,
        found_systems: usize,
    },
    #[error("system at index {index} carries id {id}; ids must match catalog position")]
    SystemId { index: usize, id: usize },
    #[error("allocation has {found} routes, expected one per patrol ({expected})")]
    RouteCount { expected: usize, found: usize },
    #[error("allocation references unknown system {0}")]
    UnknownSystem(usize),
}

/// A scenario file or argument list could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("missing value for {0}")]
    Missing(&'static str),
    #[error("invalid value {token:?} for {field}")]
    Invalid { field: &'static str, token: String },
    #[error("{0} unexpected trailing values")]
    Trailing(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
