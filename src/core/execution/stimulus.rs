use crate::core::types::EdgeInputs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of per-edge input vectors for a testbench channel
pub trait Stimulus: Send {
    /// Inputs for the next edge, or `None` once the source is exhausted
    fn next_edge(&mut self) -> Option<EdgeInputs>;
}

/// Replays a fixed list of edges in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedStimulus {
    edges: VecDeque<EdgeInputs>,
}

impl ScriptedStimulus {
    /// Script that replays `edges` front to back
    pub fn new(edges: impl IntoIterator<Item = EdgeInputs>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }

    /// Append an edge to the end of the script
    pub fn push(&mut self, edge: EdgeInputs) {
        self.edges.push_back(edge);
    }

    /// Edges not yet handed out
    pub fn remaining(&self) -> usize {
        self.edges.len()
    }
}

impl Stimulus for ScriptedStimulus {
    fn next_edge(&mut self) -> Option<EdgeInputs> {
        self.edges.pop_front()
    }
}

/// Seeded random traffic within a memory's legal input ranges
///
/// The first edge is always a clear so that every run starts from a known
/// state; later clears happen with `clear_probability`.
#[derive(Debug, Clone)]
pub struct RandomStimulus {
    rng: StdRng,
    depth: u32,
    word_mask: u64,
    remaining: u64,
    write_probability: f64,
    clear_probability: f64,
    started: bool,
}

impl RandomStimulus {
    /// Random edges for a memory of `depth` words
    ///
    /// # Arguments
    /// * `seed` - Seed for the generator; equal seeds give equal sequences
    /// * `depth` - Addresses are drawn from `0..depth`; zero is treated as one
    /// * `word_mask` - Write data is masked with this
    /// * `edges` - Number of edges to produce, the leading clear included
    pub fn new(seed: u64, depth: u32, word_mask: u64, edges: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            depth: depth.max(1),
            word_mask,
            remaining: edges,
            write_probability: 0.5,
            clear_probability: 0.0,
            started: false,
        }
    }

    /// Probability that an edge asserts write-enable.
    /// Clamped to `[0, 1]`; NaN means never.
    pub fn with_write_probability(mut self, probability: f64) -> Self {
        self.write_probability = bounded_probability(probability);
        self
    }

    /// Probability of a clear after the first edge.
    /// Clamped to `[0, 1]`; NaN means never.
    pub fn with_clear_probability(mut self, probability: f64) -> Self {
        self.clear_probability = bounded_probability(probability);
        self
    }
}

fn bounded_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

impl Stimulus for RandomStimulus {
    fn next_edge(&mut self) -> Option<EdgeInputs> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if !self.started {
            self.started = true;
            return Some(EdgeInputs::clear());
        }

        let clear = self.rng.gen_bool(self.clear_probability);
        let write_enable = self.rng.gen_bool(self.write_probability);
        let address = self.rng.gen_range(0..self.depth);
        let write_data = self.rng.gen::<u64>() & self.word_mask;

        Some(EdgeInputs {
            clear,
            write_enable,
            address,
            write_data,
        })
    }
}
