pub mod components;
pub mod execution;
pub mod memory;
pub mod types;

// Re-export commonly used types
pub use components::EdgeTriggered;
pub use execution::{ConcurrencyMode, Testbench, TestbenchConfig};
pub use memory::{MemoryConfig, MemoryError, RangePolicy, SyncMemory};
pub use types::{EdgeInputs, InstanceId};
