//! Scheduled events and the record left behind when one fires.
//!
//! Each live individual owns exactly one pending [`Event`]. Events are
//! single-shot: once executed they are dropped and, unless the individual
//! died, replaced by a freshly drawn one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::individual::IndividualId;

/// Which state transition an event applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Remove the individual from the population.
    Death,
    /// Perturb the individual's allocation in place.
    Mutate,
    /// Add a perturbed copy of the individual to the population.
    Reproduce,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Death => "death",
            EventKind::Mutate => "mutate",
            EventKind::Reproduce => "reproduce",
        };
        f.write_str(name)
    }
}

/// A pending event at an absolute simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Death { time: f64 },
    Mutate { time: f64 },
    Reproduce { time: f64 },
}

impl Event {
    pub fn new(kind: EventKind, time: f64) -> Self {
        match kind {
            EventKind::Death => Event::Death { time },
            EventKind::Mutate => Event::Mutate { time },
            EventKind::Reproduce => Event::Reproduce { time },
        }
    }

    /// When the event fires.
    pub fn time(&self) -> f64 {
        match *self {
            Event::Death { time } | Event::Mutate { time } | Event::Reproduce { time } => time,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Death { .. } => EventKind::Death,
            Event::Mutate { .. } => EventKind::Mutate,
            Event::Reproduce { .. } => EventKind::Reproduce,
        }
    }
}

/// What happened when an event fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub time: f64,
    pub kind: EventKind,
    pub individual: IndividualId,
    /// Set for reproduction only.
    pub offspring: Option<IndividualId>,
    /// Population size right after the event, before any epidemic.
    pub population: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        for kind in [EventKind::Death, EventKind::Mutate, EventKind::Reproduce] {
            let event = Event::new(kind, 2.5);
            assert_eq!(event.kind(), kind);
            assert_eq!(event.time(), 2.5);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&Event::new(EventKind::Reproduce, 1.0)).unwrap();
        assert_eq!(json, r#"{"kind":"reproduce","time":1.0}"#);
    }
}
