/// Per-instance activity counters for monitoring and debugging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Accepted edges, clear edges included
    pub edges: u64,
    /// Edges with clear asserted
    pub clears: u64,
    /// Committed writes
    pub writes: u64,
    /// Read-rule latches (every non-clear edge)
    pub reads: u64,
    /// Edges refused because an input was out of range
    pub rejected_edges: u64,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_clear(&mut self) {
        self.edges += 1;
        self.clears += 1;
    }

    pub fn record_access(&mut self, wrote: bool) {
        self.edges += 1;
        self.reads += 1;
        if wrote {
            self.writes += 1;
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejected_edges += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_reset() {
        let mut stats = MemoryStats::new();
        stats.record_clear();
        stats.record_access(true);
        stats.record_access(false);
        stats.record_rejection();

        assert_eq!(stats.edges, 3);
        assert_eq!(stats.clears, 1);
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.rejected_edges, 1);

        stats.reset();
        assert_eq!(stats, MemoryStats::default());
    }
}
