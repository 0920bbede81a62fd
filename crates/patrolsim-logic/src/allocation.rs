//! Patrol routes: which systems each patrol visits, and in what order.
//!
//! An [`Allocation`] is a plain owned value. Cloning it yields an independent
//! copy, which is what offspring creation relies on: a child never shares a
//! route with its parent.

use std::fmt;

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Empire, Patrol};

/// Ordered system ids per patrol; `routes[p]` is patrol `p`'s visiting order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    routes: Vec<Vec<usize>>,
}

impl Allocation {
    /// An allocation with `patrol_count` empty routes.
    pub fn empty(patrol_count: usize) -> Self {
        Self {
            routes: vec![Vec::new(); patrol_count],
        }
    }

    /// Wrap explicit routes, checking them against the empire.
    pub fn from_routes(routes: Vec<Vec<usize>>, empire: &Empire) -> Result<Self, ConfigError> {
        let allocation = Self { routes };
        allocation.check(empire)?;
        Ok(allocation)
    }

    /// One route per patrol, and only systems the empire knows.
    pub fn check(&self, empire: &Empire) -> Result<(), ConfigError> {
        if self.routes.len() != empire.patrol_count() {
            return Err(ConfigError::RouteCount {
                expected: empire.patrol_count(),
                found: self.routes.len(),
            });
        }
        if let Some(&bad) = self
            .routes
            .iter()
            .flatten()
            .find(|&&id| id >= empire.system_count())
        {
            return Err(ConfigError::UnknownSystem(bad));
        }
        Ok(())
    }

    /// Every system handed to a uniformly random patrol, in catalog order.
    pub fn random(empire: &Empire, rng: &mut impl Rng) -> Self {
        let mut allocation = Self::empty(empire.patrol_count());
        for system in empire.systems() {
            let patrol = rng.gen_range(0..empire.patrol_count());
            allocation.routes[patrol].push(system.id());
        }
        allocation
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub fn route(&self, patrol: Patrol) -> &[usize] {
        &self.routes[patrol.id()]
    }

    /// Number of systems assigned across all routes.
    pub fn assigned(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Time `patrol` spends working through its route.
    pub fn patrol_time(&self, patrol: Patrol, empire: &Empire) -> u64 {
        self.routes[patrol.id()]
            .iter()
            .filter_map(|&id| empire.system(id))
            .map(|system| system.time_for_patrol(patrol) as u64)
            .sum()
    }

    /// Time until the whole empire is policed: the slowest patrol's route.
    pub fn policing_time(&self, empire: &Empire) -> u64 {
        empire
            .patrols()
            .iter()
            .map(|&patrol| self.patrol_time(patrol, empire))
            .max()
            .unwrap_or(0)
    }

    /// Move one random system from a non-empty route to a different patrol.
    ///
    /// Returns `false` (and draws nothing) when no move is possible: a single
    /// patrol, or nothing assigned.
    pub fn relocate(&mut self, rng: &mut impl Rng) -> bool {
        let patrols = self.routes.len();
        if patrols < 2 {
            return false;
        }
        let loaded: Vec<usize> = (0..patrols)
            .filter(|&p| !self.routes[p].is_empty())
            .collect();
        if loaded.is_empty() {
            return false;
        }

        let from = loaded[rng.gen_range(0..loaded.len())];
        let position = rng.gen_range(0..self.routes[from].len());
        let system = self.routes[from].remove(position);

        // Skip over `from` so one draw always lands on another patrol.
        let mut to = rng.gen_range(0..patrols - 1);
        if to >= from {
            to += 1;
        }
        self.routes[to].push(system);
        true
    }

    /// An independent copy with `count` distinct systems pulled from their
    /// routes and re-dealt to random patrols. `self` is left untouched.
    pub fn perturbed(&self, count: usize, empire: &Empire, rng: &mut impl Rng) -> Self {
        let mut child = self.clone();
        let count = count.min(empire.system_count());
        if count == 0 {
            return child;
        }

        let picked = index::sample(rng, empire.system_count(), count).into_vec();
        let mut moving = vec![false; empire.system_count()];
        for &id in &picked {
            moving[id] = true;
        }
        for route in &mut child.routes {
            route.retain(|&id| !moving[id]);
        }
        for id in picked {
            let patrol = rng.gen_range(0..child.routes.len());
            child.routes[patrol].push(id);
        }
        child
    }
}

impl fmt::Display for Allocation {
    /// `{{0,3}, {1}, {}}`: routes in patrol order, system ids in visit order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (p, route) in self.routes.iter().enumerate() {
            if p > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{")?;
            for (i, id) in route.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", id)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn empire() -> Empire {
        Empire::from_table(&[vec![2, 3, 4, 5, 6], vec![1, 1, 1, 1, 1], vec![9, 9, 9, 9, 9]])
            .unwrap()
    }

    fn sorted_systems(allocation: &Allocation) -> Vec<usize> {
        let mut ids: Vec<usize> = allocation.routes().iter().flatten().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_random_assigns_every_system_once() {
        let empire = empire();
        let mut rng = StdRng::seed_from_u64(42);
        let allocation = Allocation::random(&empire, &mut rng);
        assert_eq!(allocation.routes().len(), 3);
        assert_eq!(sorted_systems(&allocation), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_patrol_and_policing_time() {
        let empire = empire();
        let allocation =
            Allocation::from_routes(vec![vec![0, 1], vec![2, 3], vec![4]], &empire).unwrap();
        assert_eq!(allocation.patrol_time(Patrol::new(0), &empire), 5);
        assert_eq!(allocation.patrol_time(Patrol::new(1), &empire), 2);
        assert_eq!(allocation.patrol_time(Patrol::new(2), &empire), 9);
        assert_eq!(allocation.policing_time(&empire), 9);
    }

    #[test]
    fn test_from_routes_validation() {
        let empire = empire();
        assert_eq!(
            Allocation::from_routes(vec![vec![0]], &empire),
            Err(ConfigError::RouteCount {
                expected: 3,
                found: 1
            })
        );
        assert_eq!(
            Allocation::from_routes(vec![vec![0], vec![7], vec![]], &empire),
            Err(ConfigError::UnknownSystem(7))
        );
    }

    #[test]
    fn test_relocate_moves_exactly_one_system() {
        let empire = empire();
        let mut rng = StdRng::seed_from_u64(42);
        let before = Allocation::from_routes(vec![vec![0, 1, 2, 3, 4], vec![], vec![]], &empire)
            .unwrap();
        let mut after = before.clone();

        assert!(after.relocate(&mut rng));
        assert_ne!(before, after);
        assert_eq!(after.routes()[0].len(), 4);
        assert_eq!(after.routes()[1].len() + after.routes()[2].len(), 1);
        assert_eq!(sorted_systems(&after), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_relocate_single_patrol_is_noop() {
        let empire = Empire::from_table(&[vec![1, 2]]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut allocation = Allocation::from_routes(vec![vec![0, 1]], &empire).unwrap();
        assert!(!allocation.relocate(&mut rng));
        assert_eq!(allocation.routes()[0], vec![0, 1]);
    }

    #[test]
    fn test_perturbed_leaves_parent_untouched() {
        let empire = empire();
        let mut rng = StdRng::seed_from_u64(7);
        let parent =
            Allocation::from_routes(vec![vec![0, 1], vec![2, 3], vec![4]], &empire).unwrap();
        let snapshot = parent.clone();

        let child = parent.perturbed(5, &empire, &mut rng);
        assert_eq!(parent, snapshot);
        assert_eq!(sorted_systems(&child), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_perturbed_zero_is_identical_copy() {
        let empire = empire();
        let mut rng = StdRng::seed_from_u64(7);
        let parent =
            Allocation::from_routes(vec![vec![0, 1], vec![2, 3], vec![4]], &empire).unwrap();
        assert_eq!(parent.perturbed(0, &empire, &mut rng), parent);
    }

    #[test]
    fn test_display_format() {
        let empire = empire();
        let allocation =
            Allocation::from_routes(vec![vec![0, 3], vec![1], vec![]], &empire).unwrap();
        assert_eq!(allocation.to_string(), "{{0,3}, {1}, {}}");
    }
}
