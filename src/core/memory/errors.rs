use crate::core::types::InstanceId;

/// Errors raised by a [`SyncMemory`](super::SyncMemory) at construction or on an edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Width parameters are zero or produce a depth/word that cannot be represented.
    /// Fatal: the model must not be used.
    Configuration(String),
    /// Address is not in `[0, depth-1]`
    AddressOutOfRange { address: u32, depth: u32 },
    /// Write value does not fit in `data_width` bits
    ValueOutOfRange { value: u64, data_width: u32 },
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::Configuration(msg) => write!(f, "Invalid memory configuration: {}", msg),
            MemoryError::AddressOutOfRange { address, depth } => write!(
                f,
                "Address {} out of range for memory of depth {}",
                address, depth
            ),
            MemoryError::ValueOutOfRange { value, data_width } => write!(
                f,
                "Value {:#x} does not fit in {} bits",
                value, data_width
            ),
        }
    }
}

impl std::error::Error for MemoryError {}

/// Errors raised while driving a testbench
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestbenchError {
    /// A channel's memory rejected an edge
    Channel {
        instance: InstanceId,
        cycle: u64,
        source: MemoryError,
    },
    /// Testbench could not be set up (thread pool, duplicate ids)
    Configuration(String),
}

impl std::fmt::Display for TestbenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestbenchError::Channel { instance, cycle, source } => {
                write!(f, "Channel '{}' failed at cycle {}: {}", instance, cycle, source)
            }
            TestbenchError::Configuration(msg) => write!(f, "Invalid testbench configuration: {}", msg),
        }
    }
}

impl std::error::Error for TestbenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TestbenchError::Channel { source, .. } => Some(source),
            TestbenchError::Configuration(_) => None,
        }
    }
}
