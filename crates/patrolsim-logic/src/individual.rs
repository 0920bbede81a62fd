//! One candidate assignment together with its pending event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::event::Event;

/// Stable identity of an individual, unique within a run and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndividualId(pub u64);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live member of the population.
///
/// The pending event is not optional: an individual is only ever built with
/// its first event already drawn, and keeps one until it dies.
#[derive(Debug, Clone)]
pub struct Individual {
    id: IndividualId,
    allocation: Allocation,
    policing_time: u64,
    comfort: f64,
    event: Event,
}

impl Individual {
    pub(crate) fn new(
        id: IndividualId,
        allocation: Allocation,
        policing_time: u64,
        comfort: f64,
        event: Event,
    ) -> Self {
        Self {
            id,
            allocation,
            policing_time,
            comfort,
            event,
        }
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn policing_time(&self) -> u64 {
        self.policing_time
    }

    pub fn comfort(&self) -> f64 {
        self.comfort
    }

    /// The pending event.
    pub fn event(&self) -> Event {
        self.event
    }

    /// When the pending event fires.
    pub fn time(&self) -> f64 {
        self.event.time()
    }

    pub(crate) fn set_event(&mut self, event: Event) {
        self.event = event;
    }

    pub(crate) fn allocation_mut(&mut self) -> &mut Allocation {
        &mut self.allocation
    }

    /// Store freshly computed scores after the allocation changed.
    pub(crate) fn rescore(&mut self, policing_time: u64, comfort: f64) {
        self.policing_time = policing_time;
        self.comfort = comfort;
    }

    /// Detached deep copy of the scored assignment, for reporting.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            id: self.id,
            allocation: self.allocation.clone(),
            policing_time: self.policing_time,
            comfort: self.comfort,
        }
    }
}

/// A scored assignment captured at some point of the run. It outlives the
/// individual it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: IndividualId,
    pub allocation: Allocation,
    pub policing_time: u64,
    pub comfort: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    #[test]
    fn test_time_follows_event() {
        let mut individual = Individual::new(
            IndividualId(1),
            Allocation::empty(2),
            0,
            1.0,
            Event::new(EventKind::Mutate, 3.0),
        );
        assert_eq!(individual.time(), 3.0);

        individual.set_event(Event::new(EventKind::Death, 4.5));
        assert_eq!(individual.time(), 4.5);
        assert_eq!(individual.event().kind(), EventKind::Death);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut individual = Individual::new(
            IndividualId(1),
            Allocation::empty(2),
            5,
            0.5,
            Event::new(EventKind::Mutate, 1.0),
        );
        let snapshot = individual.snapshot();
        individual.rescore(10, 0.25);
        assert_eq!(snapshot.policing_time, 5);
        assert_eq!(snapshot.comfort, 0.5);
        assert_eq!(individual.comfort(), 0.25);
    }
}
