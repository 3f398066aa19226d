/// Next-state values computed from pre-edge state, applied in one commit
///
/// Splitting an edge into compute and commit reproduces two update rules
/// triggered by the same edge: the read latches what storage held before the
/// write of that edge lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDelta {
    /// Zero the whole array and the output
    Clear,
    /// Optional `(index, word)` write plus the value the output latches
    Access {
        write: Option<(usize, u64)>,
        next_output: u64,
    },
}
