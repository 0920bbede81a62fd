//! Plain-text rendering of observations.

use std::fmt::Write;

use patrolsim_logic::prelude::*;

/// One observation block, terminated by a blank line.
pub fn format_observation(observation: &Observation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Observation number: {}", observation.number);
    let _ = writeln!(out, "Present instant: {}", observation.time);
    let _ = writeln!(out, "Number of realized events: {}", observation.events);
    let _ = writeln!(out, "Population size: {}", observation.population);
    let _ = writeln!(out, "Number of epidemics: {}", observation.epidemics);

    match &observation.best {
        Some(best) => {
            let _ = writeln!(out, "Best distribution of the patrols: {}", best.allocation);
            let _ = writeln!(out, "Empire policing time: {}", best.policing_time);
            let _ = writeln!(out, "Comfort: {}", best.comfort);
        }
        None => {
            let _ = writeln!(out, "Best distribution of the patrols: none");
        }
    }

    for (i, candidate) in observation.candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "otherdist{}: {} : {} : {}",
            i + 1,
            candidate.allocation,
            candidate.policing_time,
            candidate.comfort
        );
    }
    out.push('\n');
    out
}
