//! Patrols, planetary systems, and the empire catalog they live in.
//!
//! The catalog is immutable for the whole run. Allocations refer to systems
//! by catalog index, so a system's id always equals its position.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A patrol unit. Its id doubles as the column into every system's timing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Patrol {
    id: usize,
}

impl Patrol {
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    pub fn id(self) -> usize {
        self.id
    }
}

impl fmt::Display for Patrol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Patrol {}", self.id)
    }
}

/// A planetary system and the time each patrol needs to pacify it.
///
/// `Clone` is a deep copy: the timing row is duplicated, never shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetarySystem {
    id: usize,
    time_for_patrol: Vec<u32>,
}

impl PlanetarySystem {
    pub fn new(id: usize, time_for_patrol: Vec<u32>) -> Self {
        Self {
            id,
            time_for_patrol,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Time `patrol` needs to pacify this system.
    pub fn time_for_patrol(&self, patrol: Patrol) -> u32 {
        self.time_for_patrol[patrol.id()]
    }

    /// Fastest pacification time over all patrols.
    pub fn min_time(&self) -> u32 {
        self.time_for_patrol.iter().copied().min().unwrap_or(0)
    }

    pub fn patrol_count(&self) -> usize {
        self.time_for_patrol.len()
    }
}

impl fmt::Display for PlanetarySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System {}", self.id)
    }
}

/// The fixed set of patrols and systems a run assigns between.
#[derive(Debug, Clone, PartialEq)]
pub struct Empire {
    patrols: Vec<Patrol>,
    systems: Vec<PlanetarySystem>,
    t_min: f64,
}

impl Empire {
    /// Build a catalog of `patrol_count` patrols over `systems`.
    ///
    /// Every system must have one timing per patrol and an id equal to its
    /// index.
    pub fn new(patrol_count: usize, systems: Vec<PlanetarySystem>) -> Result<Self, ConfigError> {
        if patrol_count == 0 {
            return Err(ConfigError::NoPatrols);
        }
        if systems.is_empty() {
            return Err(ConfigError::NoSystems);
        }
        for (index, system) in systems.iter().enumerate() {
            if system.id() != index {
                return Err(ConfigError::SystemId {
                    index,
                    id: system.id(),
                });
            }
            if system.patrol_count() != patrol_count {
                return Err(ConfigError::TimingWidth {
                    system: index,
                    expected: patrol_count,
                    found: system.patrol_count(),
                });
            }
        }

        let patrols = (0..patrol_count).map(Patrol::new).collect();
        let t_min = lower_bound(&systems, patrol_count);

        Ok(Self {
            patrols,
            systems,
            t_min,
        })
    }

    /// Build a catalog from a timing table laid out `times[patrol][system]`.
    pub fn from_table(times: &[Vec<u32>]) -> Result<Self, ConfigError> {
        let patrol_count = times.len();
        if patrol_count == 0 {
            return Err(ConfigError::NoPatrols);
        }
        let system_count = times[0].len();
        if let Some(row) = times.iter().find(|row| row.len() != system_count) {
            return Err(ConfigError::TableShape {
                patrols: patrol_count,
                systems: system_count,
                found_patrols: patrol_count,
                found_systems: row.len(),
            });
        }

        let systems = (0..system_count)
            .map(|s| PlanetarySystem::new(s, times.iter().map(|row| row[s]).collect()))
            .collect();
        Self::new(patrol_count, systems)
    }

    pub fn patrols(&self) -> &[Patrol] {
        &self.patrols
    }

    pub fn systems(&self) -> &[PlanetarySystem] {
        &self.systems
    }

    pub fn patrol_count(&self) -> usize {
        self.patrols.len()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn system(&self, id: usize) -> Option<&PlanetarySystem> {
        self.systems.get(id)
    }

    /// Lower bound on any allocation's policing time: the fastest time for
    /// every system, spread evenly over all patrols.
    pub fn t_min(&self) -> f64 {
        self.t_min
    }
}

fn lower_bound(systems: &[PlanetarySystem], patrol_count: usize) -> f64 {
    let total: u64 = systems.iter().map(|s| s.min_time() as u64).sum();
    total as f64 / patrol_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Vec<u32>> {
        vec![vec![4, 2, 6], vec![3, 5, 1]]
    }

    #[test]
    fn test_from_table_transposes() {
        let empire = Empire::from_table(&table()).unwrap();
        assert_eq!(empire.patrol_count(), 2);
        assert_eq!(empire.system_count(), 3);

        let s1 = empire.system(1).unwrap();
        assert_eq!(s1.time_for_patrol(Patrol::new(0)), 2);
        assert_eq!(s1.time_for_patrol(Patrol::new(1)), 5);
    }

    #[test]
    fn test_t_min() {
        let empire = Empire::from_table(&table()).unwrap();
        // mins: 3, 2, 1 -> 6 / 2 patrols
        assert!((empire.t_min() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_ragged_table() {
        let err = Empire::from_table(&[vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, ConfigError::TableShape { found_systems: 1, .. }));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Empire::from_table(&[]), Err(ConfigError::NoPatrols));
        assert_eq!(
            Empire::from_table(&[vec![], vec![]]),
            Err(ConfigError::NoSystems)
        );
    }

    #[test]
    fn test_rejects_timing_width_mismatch() {
        let systems = vec![PlanetarySystem::new(0, vec![1, 2, 3])];
        let err = Empire::new(2, systems).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TimingWidth {
                system: 0,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_rejects_misnumbered_system() {
        let systems = vec![PlanetarySystem::new(7, vec![1])];
        assert_eq!(
            Empire::new(1, systems),
            Err(ConfigError::SystemId { index: 0, id: 7 })
        );
    }

    #[test]
    fn test_system_clone_is_deep() {
        let original = PlanetarySystem::new(0, vec![1, 2]);
        let mut copy = original.clone();
        copy.time_for_patrol[0] = 99;
        assert_eq!(original.time_for_patrol(Patrol::new(0)), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Patrol::new(3).to_string(), "Patrol 3");
        assert_eq!(PlanetarySystem::new(2, vec![1]).to_string(), "System 2");
    }
}
