use serde::{Deserialize, Serialize};

/// Identifier for one memory instance inside a testbench
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub(crate) String);

impl InstanceId {
    /// Create a new instance ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signals sampled by a memory on one active edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeInputs {
    pub clear: bool,
    pub write_enable: bool,
    pub address: u32,
    pub write_data: u64,
}

impl EdgeInputs {
    /// Clear edge; address and data are don't-care
    pub fn clear() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    /// Write `data` to `address` (the old word at `address` is latched)
    pub fn write(address: u32, data: u64) -> Self {
        Self {
            clear: false,
            write_enable: true,
            address,
            write_data: data,
        }
    }

    /// Read-only edge sampling `address`
    pub fn read(address: u32) -> Self {
        Self {
            clear: false,
            write_enable: false,
            address,
            write_data: 0,
        }
    }
}
