use super::config::{MemoryConfig, RangePolicy};
use super::delta::EdgeDelta;
use super::errors::MemoryError;
use super::stats::MemoryStats;
use crate::core::components::traits::EdgeTriggered;
use crate::core::types::EdgeInputs;
use log::{debug, info, warn};

/// Single-port synchronous memory with a registered read output
///
/// Every state change happens in [`evaluate_edge`](Self::evaluate_edge), which
/// models one active clock edge. On that edge:
///
/// 1. a clear zeroes storage and the output and nothing else happens;
/// 2. otherwise an enabled write commits `write_data` at `address`;
/// 3. and the output latches `storage[address]` as it was *before* the write.
///
/// A value written on edge `n` is therefore visible on the output no earlier
/// than after edge `n + 1`.
///
/// Storage and output start zeroed, so reads before the first clear are
/// deterministic. [`has_been_cleared`](Self::has_been_cleared) reports whether
/// a clear has been seen for harnesses that want to insist on one.
#[derive(Debug, Clone)]
pub struct SyncMemory {
    config: MemoryConfig,
    /// `depth` words, each within `word_mask`
    storage: Vec<u64>,
    /// Registered read data
    output: u64,
    cleared: bool,
    stats: MemoryStats,
}

impl SyncMemory {
    /// Create a memory from a configuration, validating the widths
    ///
    /// # Arguments
    /// * `config` - Word width, address width and range policy
    ///
    /// # Returns
    /// A zeroed memory, or `MemoryError::Configuration` if a width is zero or
    /// does not fit the word/address representation
    pub fn new(config: MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;

        let depth = config.depth() as usize;
        info!(
            "SyncMemory: data_width={} addr_width={} depth={} policy={:?}",
            config.data_width, config.addr_width, depth, config.range_policy
        );

        Ok(Self {
            storage: vec![0; depth],
            output: 0,
            cleared: false,
            stats: MemoryStats::new(),
            config,
        })
    }

    /// Create a memory with the given widths and the default range policy
    ///
    /// # Arguments
    /// * `data_width` - Bit width of each stored word (1..=64)
    /// * `addr_width` - Bit width of the address (1..=31); depth is `2^addr_width`
    pub fn with_widths(data_width: u32, addr_width: u32) -> Result<Self, MemoryError> {
        Self::new(
            MemoryConfig::new()
                .with_data_width(data_width)
                .with_addr_width(addr_width),
        )
    }

    /// Evaluate one active edge.
    ///
    /// A clear edge always succeeds: address and data are don't-care. On other
    /// edges the address is checked against the range policy, and the write
    /// data too when `write_enable` is set. A rejected edge leaves storage,
    /// output and the edge count untouched.
    ///
    /// # Arguments
    /// * `clear` - Zero storage and output; preempts the write and read rules
    /// * `write_enable` - Commit `write_data` at `address`
    /// * `address` - Word written and latched onto the output
    /// * `write_data` - Word to write; ignored unless `write_enable`
    ///
    /// # Returns
    /// `AddressOutOfRange` or `ValueOutOfRange` when the edge is rejected
    pub fn evaluate_edge(
        &mut self,
        clear: bool,
        write_enable: bool,
        address: u32,
        write_data: u64,
    ) -> Result<(), MemoryError> {
        let delta = match self.compute_delta(clear, write_enable, address, write_data) {
            Ok(delta) => delta,
            Err(err) => {
                self.stats.record_rejection();
                debug!("SyncMemory: edge {} rejected: {}", self.stats.edges + 1, err);
                return Err(err);
            }
        };

        self.commit(delta);
        Ok(())
    }

    /// Check whether `evaluate_edge` would accept these inputs, without
    /// changing any state
    pub fn check_edge(
        &self,
        clear: bool,
        write_enable: bool,
        address: u32,
        write_data: u64,
    ) -> Result<(), MemoryError> {
        self.compute_delta(clear, write_enable, address, write_data)
            .map(|_| ())
    }

    /// Registered read data; no side effects
    pub fn read_output(&self) -> u64 {
        self.output
    }

    /// Inspect one storage word without advancing the model.
    /// Never masks, whatever the range policy.
    pub fn peek(&self, address: u32) -> Result<u64, MemoryError> {
        self.storage
            .get(address as usize)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange {
                address,
                depth: self.depth(),
            })
    }

    /// The whole storage array, index 0 first
    pub fn contents(&self) -> &[u64] {
        &self.storage
    }

    /// Configuration the memory was built with
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Number of addressable words, `2^addr_width`
    pub fn depth(&self) -> u32 {
        self.config.depth()
    }

    /// Bit width of a stored word
    pub fn data_width(&self) -> u32 {
        self.config.data_width
    }

    /// Bit width of the address bus
    pub fn addr_width(&self) -> u32 {
        self.config.addr_width
    }

    /// All-ones mask of `data_width` bits
    pub fn word_mask(&self) -> u64 {
        self.config.word_mask()
    }

    /// Number of accepted edges
    pub fn edge_count(&self) -> u64 {
        self.stats.edges
    }

    /// Activity counters since construction
    pub fn stats(&self) -> &MemoryStats {
        &self.stats
    }

    /// True once a clear edge has been evaluated
    pub fn has_been_cleared(&self) -> bool {
        self.cleared
    }

    /// Apply the range policy to the sampled address
    fn resolve_address(&self, address: u32) -> Result<usize, MemoryError> {
        let depth = self.depth();
        match self.config.range_policy {
            RangePolicy::Reject if address >= depth => {
                Err(MemoryError::AddressOutOfRange { address, depth })
            }
            RangePolicy::Reject => Ok(address as usize),
            RangePolicy::Mask => {
                let masked = address & (depth - 1);
                if masked != address {
                    warn!("SyncMemory: masked address {} -> {}", address, masked);
                }
                Ok(masked as usize)
            }
        }
    }

    /// Apply the range policy to the write data
    fn resolve_data(&self, write_data: u64) -> Result<u64, MemoryError> {
        let mask = self.word_mask();
        match self.config.range_policy {
            RangePolicy::Reject if write_data & !mask != 0 => Err(MemoryError::ValueOutOfRange {
                value: write_data,
                data_width: self.config.data_width,
            }),
            RangePolicy::Reject => Ok(write_data),
            RangePolicy::Mask => {
                let masked = write_data & mask;
                if masked != write_data {
                    warn!("SyncMemory: masked data {:#x} -> {:#x}", write_data, masked);
                }
                Ok(masked)
            }
        }
    }

    /// Compute the edge's effect from pre-edge state only
    fn compute_delta(
        &self,
        clear: bool,
        write_enable: bool,
        address: u32,
        write_data: u64,
    ) -> Result<EdgeDelta, MemoryError> {
        if clear {
            return Ok(EdgeDelta::Clear);
        }

        let index = self.resolve_address(address)?;
        let write = if write_enable {
            Some((index, self.resolve_data(write_data)?))
        } else {
            None
        };

        Ok(EdgeDelta::Access {
            write,
            next_output: self.storage[index],
        })
    }

    fn commit(&mut self, delta: EdgeDelta) {
        let edge = self.stats.edges + 1;
        match delta {
            EdgeDelta::Clear => {
                self.storage.fill(0);
                self.output = 0;
                self.cleared = true;
                self.stats.record_clear();
                debug!("SyncMemory: edge {} clear", edge);
            }
            EdgeDelta::Access { write, next_output } => {
                if let Some((index, data)) = write {
                    self.storage[index] = data;
                    debug!("SyncMemory: edge {} write [{}] <= {:#x}", edge, index, data);
                }
                self.output = next_output;
                self.stats.record_access(write.is_some());
                debug!("SyncMemory: edge {} q <= {:#x}", edge, next_output);
            }
        }
    }
}

impl EdgeTriggered for SyncMemory {
    type Inputs = EdgeInputs;
    type Output = u64;
    type Error = MemoryError;

    fn evaluate(&mut self, inputs: &EdgeInputs) -> Result<(), MemoryError> {
        self.evaluate_edge(
            inputs.clear,
            inputs.write_enable,
            inputs.address,
            inputs.write_data,
        )
    }

    fn check(&self, inputs: &EdgeInputs) -> Result<(), MemoryError> {
        self.check_edge(
            inputs.clear,
            inputs.write_enable,
            inputs.address,
            inputs.write_data,
        )
    }

    fn output(&self) -> u64 {
        self.read_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared_memory() -> SyncMemory {
        let mut mem = SyncMemory::new(MemoryConfig::default()).unwrap();
        mem.evaluate_edge(true, false, 0, 0).unwrap();
        mem
    }

    #[test]
    fn test_construction_rejects_bad_widths() {
        assert!(matches!(
            SyncMemory::with_widths(0, 4),
            Err(MemoryError::Configuration(_))
        ));
        assert!(matches!(
            SyncMemory::with_widths(8, 0),
            Err(MemoryError::Configuration(_))
        ));
        assert!(matches!(
            SyncMemory::with_widths(8, 32),
            Err(MemoryError::Configuration(_))
        ));
    }

    #[test]
    fn test_starts_zeroed() {
        let mem = SyncMemory::with_widths(8, 4).unwrap();
        assert_eq!(mem.depth(), 16);
        assert_eq!(mem.contents().len(), 16);
        assert!(mem.contents().iter().all(|&w| w == 0));
        assert_eq!(mem.read_output(), 0);
        assert!(!mem.has_been_cleared());
        assert_eq!(mem.edge_count(), 0);
    }

    #[test]
    fn test_clear_dominates_write() {
        let mut mem = cleared_memory();
        for addr in 0..16 {
            mem.evaluate_edge(false, true, addr, 0x10 + addr as u64).unwrap();
        }
        mem.evaluate_edge(false, false, 3, 0).unwrap();
        assert_eq!(mem.read_output(), 0x13);

        mem.evaluate_edge(true, true, 7, 0xFF).unwrap();
        assert!(mem.contents().iter().all(|&w| w == 0));
        assert_eq!(mem.read_output(), 0);
        assert!(mem.has_been_cleared());
    }

    #[test]
    fn test_one_cycle_read_latency() {
        let mut mem = cleared_memory();

        mem.evaluate_edge(false, true, 9, 0x5A).unwrap();
        assert_eq!(mem.read_output(), 0);
        assert_eq!(mem.peek(9).unwrap(), 0x5A);

        mem.evaluate_edge(false, false, 9, 0).unwrap();
        assert_eq!(mem.read_output(), 0x5A);
    }

    #[test]
    fn test_same_edge_read_sees_old_value() {
        let mut mem = cleared_memory();
        mem.evaluate_edge(false, true, 2, 0x11).unwrap();
        mem.evaluate_edge(false, true, 2, 0x22).unwrap();
        // The second edge latched the word as it was before its own write
        assert_eq!(mem.read_output(), 0x11);
        mem.evaluate_edge(false, false, 2, 0).unwrap();
        assert_eq!(mem.read_output(), 0x22);
    }

    #[test]
    fn test_write_isolation() {
        let mut mem = cleared_memory();
        for addr in 0..16 {
            mem.evaluate_edge(false, true, addr, addr as u64).unwrap();
        }
        let before = mem.contents().to_vec();

        mem.evaluate_edge(false, true, 6, 0xEE).unwrap();
        for (addr, (&old, &new)) in before.iter().zip(mem.contents()).enumerate() {
            if addr == 6 {
                assert_eq!(new, 0xEE);
            } else {
                assert_eq!(old, new, "address {} changed", addr);
            }
        }
    }

    #[test]
    fn test_idle_edges_are_stable() {
        let mut mem = cleared_memory();
        mem.evaluate_edge(false, true, 4, 0x77).unwrap();
        let snapshot = mem.contents().to_vec();

        for _ in 0..5 {
            mem.evaluate_edge(false, false, 4, 0).unwrap();
            assert_eq!(mem.read_output(), 0x77);
            assert_eq!(mem.contents(), snapshot.as_slice());
        }
    }

    #[test]
    fn test_boundary_addresses() {
        let mut mem = cleared_memory();
        for addr in [0u32, 15] {
            mem.evaluate_edge(false, true, addr, 0xC0 | addr as u64).unwrap();
            assert_eq!(mem.read_output(), 0);
            mem.evaluate_edge(false, false, addr, 0).unwrap();
            assert_eq!(mem.read_output(), 0xC0 | addr as u64);
        }
    }

    #[test]
    fn test_reject_policy_leaves_state_untouched() {
        let mut mem = cleared_memory();
        mem.evaluate_edge(false, true, 1, 0x42).unwrap();
        let contents = mem.contents().to_vec();
        let output = mem.read_output();
        let edges = mem.edge_count();

        assert_eq!(
            mem.evaluate_edge(false, true, 16, 0x01),
            Err(MemoryError::AddressOutOfRange { address: 16, depth: 16 })
        );
        assert_eq!(
            mem.evaluate_edge(false, true, 1, 0x100),
            Err(MemoryError::ValueOutOfRange { value: 0x100, data_width: 8 })
        );
        assert!(mem.check_edge(false, false, 20, 0).is_err());

        assert_eq!(mem.contents(), contents.as_slice());
        assert_eq!(mem.read_output(), output);
        assert_eq!(mem.edge_count(), edges);
        assert_eq!(mem.stats().rejected_edges, 2);
    }

    #[test]
    fn test_clear_ignores_out_of_range_inputs() {
        let mut mem = cleared_memory();
        mem.evaluate_edge(false, true, 3, 0x55).unwrap();
        mem.evaluate_edge(false, false, 3, 0).unwrap();
        assert_eq!(mem.read_output(), 0x55);

        assert!(mem.check_edge(true, true, 16, 0x1FF).is_ok());
        mem.evaluate_edge(true, true, 16, 0x1FF).unwrap();
        assert!(mem.contents().iter().all(|&w| w == 0));
        assert_eq!(mem.read_output(), 0);
        assert_eq!(mem.stats().rejected_edges, 0);
    }

    #[test]
    fn test_write_data_unchecked_when_write_disabled() {
        let mut mem = cleared_memory();
        mem.evaluate_edge(false, true, 8, 0x12).unwrap();

        // Data bus carries garbage but nothing is written
        mem.evaluate_edge(false, false, 8, 0xFFFF).unwrap();
        assert_eq!(mem.read_output(), 0x12);
        assert_eq!(mem.peek(8).unwrap(), 0x12);
    }

    #[test]
    fn test_mask_policy_truncates() {
        let config = MemoryConfig::default().with_range_policy(RangePolicy::Mask);
        let mut mem = SyncMemory::new(config).unwrap();
        mem.evaluate_edge(true, false, 0, 0).unwrap();

        // 0x13 & 0xF == 3, 0x1AB & 0xFF == 0xAB
        mem.evaluate_edge(false, true, 0x13, 0x1AB).unwrap();
        assert_eq!(mem.peek(3).unwrap(), 0xAB);
        mem.evaluate_edge(false, false, 0x23, 0).unwrap();
        assert_eq!(mem.read_output(), 0xAB);
        assert_eq!(mem.stats().rejected_edges, 0);
    }

    #[test]
    fn test_peek_never_masks() {
        let config = MemoryConfig::default().with_range_policy(RangePolicy::Mask);
        let mem = SyncMemory::new(config).unwrap();
        assert!(matches!(
            mem.peek(16),
            Err(MemoryError::AddressOutOfRange { address: 16, depth: 16 })
        ));
    }

    #[test]
    fn test_full_width_words() {
        let mut mem = SyncMemory::with_widths(64, 1).unwrap();
        mem.evaluate_edge(false, true, 1, u64::MAX).unwrap();
        mem.evaluate_edge(false, false, 1, 0).unwrap();
        assert_eq!(mem.read_output(), u64::MAX);
    }

    #[test]
    fn test_stats_counters() {
        let mut mem = cleared_memory();
        mem.evaluate_edge(false, true, 0, 1).unwrap();
        mem.evaluate_edge(false, false, 0, 0).unwrap();

        let stats = mem.stats();
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.clears, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.reads, 2);
    }

    #[test]
    fn test_edge_triggered_trait() {
        let mut mem = SyncMemory::with_widths(8, 4).unwrap();
        mem.evaluate(&EdgeInputs::clear()).unwrap();
        mem.evaluate(&EdgeInputs::write(5, 0xAA)).unwrap();
        mem.evaluate(&EdgeInputs::read(5)).unwrap();
        assert_eq!(EdgeTriggered::output(&mem), 0xAA);
    }
}
