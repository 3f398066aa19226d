pub mod config;
pub mod delta;
pub mod errors;
pub mod stats;
pub mod sync_memory;

// Re-export commonly used types
pub use config::{MemoryConfig, RangePolicy};
pub use delta::EdgeDelta;
pub use errors::{MemoryError, TestbenchError};
pub use stats::MemoryStats;
pub use sync_memory::SyncMemory;
