//! Runtime primitives called by generated flowchart code.
//!
//! This file only depends on `std` and `rand` so it can be copied next to the
//! generated sources as-is.

use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::HashSet;

/// Repeats `body` `iterations` times, then appends `outputs` minus the body's
/// entry node.
///
/// Returns nothing when `last_executed` is the body's terminal node, as that
/// call is the loop being reached again by the pass it already unrolled.
pub fn loop_unroll<T>(
    iterations: u32,
    body: &[T],
    outputs: Vec<T>,
    last_executed: Option<&str>,
) -> Vec<T>
where
    T: Clone + PartialEq + AsRef<str>,
{
    let terminal: Option<&str> = body.last().map(AsRef::as_ref);
    if terminal.is_some() && terminal == last_executed {
        return Vec::new();
    }

    let mut full_output = Vec::with_capacity(body.len() * iterations as usize + outputs.len());
    for _ in 0..iterations {
        full_output.extend_from_slice(body);
    }

    let entry = body.first();
    full_output.extend(outputs.into_iter().filter(|o| Some(o) != entry));
    full_output
}

/// State shared by every node of one run: AND-gate arrivals, the last node
/// called and the random source.
#[derive(Debug)]
pub struct NodeImplementation<R = ThreadRng> {
    and_gates: HashSet<String>,
    last_call: Option<String>,
    rng: R,
}

impl NodeImplementation<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for NodeImplementation<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> NodeImplementation<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            and_gates: HashSet::new(),
            last_call: None,
            rng,
        }
    }

    /// Registers an arrival at an AND gate. The first arrival waits, the second
    /// satisfies the gate and clears it for the next pair.
    pub fn and_gate_arrive(&mut self, gate: &str) -> bool {
        if self.and_gates.remove(gate) {
            return true;
        }
        self.and_gates.insert(gate.to_string());
        false
    }

    pub fn and_gate<T>(&mut self, gate: &str, outputs: Vec<T>) -> Vec<T> {
        if self.and_gate_arrive(gate) {
            outputs
        } else {
            Vec::new()
        }
    }

    /// Picks `paths_taken` distinct candidates uniformly at random, or all of
    /// them if there are not more than that.
    pub fn decision_choose<T>(&mut self, paths_taken: u32, mut candidates: Vec<T>) -> Vec<T> {
        let paths_taken = paths_taken as usize;
        if candidates.len() <= paths_taken {
            return candidates;
        }

        let mut chosen = Vec::with_capacity(paths_taken);
        for _ in 0..paths_taken {
            let selected = self.rng.random_range(0..candidates.len());
            chosen.push(candidates.remove(selected));
        }
        chosen
    }

    /// Draws from 1 to 100 and succeeds if the draw is at most `percent`.
    pub fn probability_roll(&mut self, percent: u8) -> bool {
        self.rng.random_range(1..=100u8) <= percent
    }

    pub fn loop_unroll<T>(&self, iterations: u32, body: &[T], outputs: Vec<T>) -> Vec<T>
    where
        T: Clone + PartialEq + AsRef<str>,
    {
        loop_unroll(iterations, body, outputs, self.last_call.as_deref())
    }

    pub fn record_call(&mut self, name: &str) {
        self.last_call = Some(name.to_string());
    }

    pub fn last_call(&self) -> Option<&str> {
        self.last_call.as_deref()
    }

    /// Forgets all gate arrivals and the last call, ready for an independent run.
    pub fn reset(&mut self) {
        self.and_gates.clear();
        self.last_call = None;
    }
}
