pub mod config;
pub mod stimulus;
pub mod testbench;

// Re-export commonly used types
pub use config::{ConcurrencyMode, TestbenchConfig};
pub use stimulus::{RandomStimulus, ScriptedStimulus, Stimulus};
pub use testbench::{Channel, Testbench};
