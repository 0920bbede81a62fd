//! Fitness scoring for allocations.
//!
//! The driver only ever compares comfort values, so the scoring function is a
//! trait object handed to [`crate::simulation::Simulation`]. Higher is better.

use std::fmt;

use crate::allocation::Allocation;
use crate::model::Empire;

/// Scores an allocation. Implementations must be pure: the same allocation
/// over the same empire always yields the same value, in `[0, 1]`.
pub trait ComfortModel: fmt::Debug + Send + Sync {
    fn comfort(&self, allocation: &Allocation, empire: &Empire) -> f64;
}

/// Ratio of the empire's lower bound `t_min` to the allocation's policing
/// time. A perfectly balanced allocation approaches 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakespanComfort;

impl ComfortModel for MakespanComfort {
    fn comfort(&self, allocation: &Allocation, empire: &Empire) -> f64 {
        let policing = allocation.policing_time(empire);
        if policing == 0 {
            return 1.0;
        }
        (empire.t_min() / policing as f64).clamp(0.0, 1.0)
    }
}
