pub mod core;

// Re-export commonly used types
pub use crate::core::components::EdgeTriggered;
pub use crate::core::execution::{
    ConcurrencyMode, RandomStimulus, ScriptedStimulus, Stimulus, Testbench, TestbenchConfig,
};
pub use crate::core::memory::{
    MemoryConfig, MemoryError, MemoryStats, RangePolicy, SyncMemory, TestbenchError,
};
pub use crate::core::types::{EdgeInputs, InstanceId};
