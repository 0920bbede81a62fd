//! Pure simulation logic for the patrol assignment evolution.
//!
//! A population of candidate assignments (patrol units to ordered routes of
//! planetary systems) evolves over continuous time. Every individual carries
//! exactly one pending event (death, mutation or reproduction); the driver
//! repeatedly fires the earliest one, reschedules, and culls the population
//! back to its bound when it overflows.
//!
//! Nothing in this crate touches the filesystem, the terminal or global state.
//! All randomness flows through the single seeded generator owned by
//! [`simulation::Simulation`], so a run is reproducible from its seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`allocation`] | Patrol routes, policing time, mutation and offspring perturbation |
//! | [`comfort`] | Pluggable fitness scoring (makespan comfort by default) |
//! | [`config`] | Simulation parameters and their validation |
//! | [`error`] | Configuration and input errors |
//! | [`event`] | Death / mutate / reproduce events and executed-event records |
//! | [`factory`] | Stochastic event selection from comfort and rate constants |
//! | [`individual`] | One candidate assignment with its pending event |
//! | [`input`] | Scenario parsing and random scenario generation |
//! | [`model`] | Patrols, planetary systems, and the empire catalog |
//! | [`population`] | Bounded population, epidemic culling, best tracking |
//! | [`simulation`] | The event loop driver, observations, and run report |

pub mod allocation;
pub mod comfort;
pub mod config;
pub mod error;
pub mod event;
pub mod factory;
pub mod individual;
pub mod input;
pub mod model;
pub mod population;
pub mod simulation;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::allocation::Allocation;
    pub use crate::comfort::{ComfortModel, MakespanComfort};
    pub use crate::config::SimulationConfig;
    pub use crate::error::{ConfigError, InputError};
    pub use crate::event::{Event, EventKind, EventRecord};
    pub use crate::factory::{EventFactory, RateParams};
    pub use crate::individual::{Individual, IndividualId, Snapshot};
    pub use crate::input::Scenario;
    pub use crate::model::{Empire, Patrol, PlanetarySystem};
    pub use crate::population::{EpidemicPolicy, Population};
    pub use crate::simulation::{Observation, Report, Simulation, Step, Termination};
}
