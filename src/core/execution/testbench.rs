use crate::core::components::traits::EdgeTriggered;
use crate::core::execution::config::{ConcurrencyMode, TestbenchConfig};
use crate::core::execution::stimulus::Stimulus;
use crate::core::memory::{MemoryError, SyncMemory, TestbenchError};
use crate::core::types::{EdgeInputs, InstanceId};
use log::{debug, info};
use rayon::prelude::*;

/// One model under test together with its stimulus and output trace
pub struct Channel<M = SyncMemory> {
    id: InstanceId,
    model: M,
    stimulus: Box<dyn Stimulus>,
    /// Edge pulled from the stimulus but not yet committed
    pending: Option<EdgeInputs>,
    /// Registered output sampled after each evaluated edge
    trace: Vec<u64>,
    exhausted: bool,
}

impl<M> Channel<M>
where
    M: EdgeTriggered<Inputs = EdgeInputs, Output = u64, Error = MemoryError>,
{
    /// Identifier the channel was registered under
    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    /// The model under test
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Output after each committed edge; its length equals the number of edges
    /// this channel has evaluated
    pub fn trace(&self) -> &[u64] {
        &self.trace
    }

    /// True once the stimulus has run dry
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Pull the next edge (unless one is already pending) and check it
    /// against the model. `Ok(false)` if the stimulus is exhausted.
    fn prepare(&mut self, cycle: u64) -> Result<bool, TestbenchError> {
        if self.exhausted {
            return Ok(false);
        }

        let inputs = match self.pending {
            Some(inputs) => inputs,
            None => match self.stimulus.next_edge() {
                Some(inputs) => {
                    self.pending = Some(inputs);
                    inputs
                }
                None => {
                    self.exhausted = true;
                    debug!("Testbench: channel '{}' exhausted at cycle {}", self.id, cycle);
                    return Ok(false);
                }
            },
        };

        self.model.check(&inputs).map_err(|source| TestbenchError::Channel {
            instance: self.id.clone(),
            cycle,
            source,
        })?;
        Ok(true)
    }

    /// Evaluate the pending edge; `Ok(false)` if none was prepared
    fn commit(&mut self, cycle: u64) -> Result<bool, TestbenchError> {
        let inputs = match self.pending.take() {
            Some(inputs) => inputs,
            None => return Ok(false),
        };

        self.model
            .evaluate(&inputs)
            .map_err(|source| TestbenchError::Channel {
                instance: self.id.clone(),
                cycle,
                source,
            })?;
        self.trace.push(self.model.output());
        Ok(true)
    }
}

/// Apply `phase` to every channel, in order or with Rayon
fn run_phase<M, F>(
    channels: &mut [Channel<M>],
    mode: ConcurrencyMode,
    pool: Option<&rayon::ThreadPool>,
    phase: F,
) -> Vec<Result<bool, TestbenchError>>
where
    M: Send,
    F: Fn(&mut Channel<M>) -> Result<bool, TestbenchError> + Send + Sync,
{
    match (mode, pool) {
        (ConcurrencyMode::Sequential, _) => channels.iter_mut().map(|c| phase(c)).collect(),
        (ConcurrencyMode::Rayon, Some(pool)) => {
            pool.install(|| channels.par_iter_mut().map(|c| phase(c)).collect())
        }
        (ConcurrencyMode::Rayon, None) => channels.par_iter_mut().map(|c| phase(c)).collect(),
    }
}

/// Drives independent memory instances edge by edge
///
/// Every channel sees the same edge numbering: `step()` advances each
/// non-exhausted channel by exactly one edge, or advances none of them.
/// Channels share nothing, so the Rayon mode yields the same traces as the
/// sequential one.
pub struct Testbench<M = SyncMemory> {
    channels: Vec<Channel<M>>,
    config: TestbenchConfig,
    current_cycle: u64,
    /// Dedicated pool when a thread count was configured
    pool: Option<rayon::ThreadPool>,
}

impl<M> Testbench<M>
where
    M: EdgeTriggered<Inputs = EdgeInputs, Output = u64, Error = MemoryError> + Send,
{
    /// Create an empty testbench
    ///
    /// # Arguments
    /// * `config` - Concurrency mode, optional Rayon pool size and cycle limit
    ///
    /// # Returns
    /// `TestbenchError::Configuration` if the pool size is zero or the pool
    /// cannot be built
    pub fn new(config: TestbenchConfig) -> Result<Self, TestbenchError> {
        let pool = match (config.concurrency_mode, config.thread_pool_size) {
            (ConcurrencyMode::Rayon, Some(0)) => {
                return Err(TestbenchError::Configuration(
                    "thread_pool_size must be positive".to_string(),
                ));
            }
            (ConcurrencyMode::Rayon, Some(size)) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(size)
                    .build()
                    .map_err(|e| TestbenchError::Configuration(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            channels: Vec::new(),
            config,
            current_cycle: 0,
            pool,
        })
    }

    /// Register a model with its stimulus under a unique id
    ///
    /// # Arguments
    /// * `id` - Name reported in traces and errors; must be unique
    /// * `model` - The model to drive
    /// * `stimulus` - Source of the model's per-edge inputs
    ///
    /// # Returns
    /// `TestbenchError::Configuration` if `id` is already registered
    pub fn add_channel(
        &mut self,
        id: InstanceId,
        model: M,
        stimulus: Box<dyn Stimulus>,
    ) -> Result<(), TestbenchError> {
        if self.channels.iter().any(|c| c.id == id) {
            return Err(TestbenchError::Configuration(format!(
                "Channel '{}' already registered",
                id
            )));
        }

        self.channels.push(Channel {
            id,
            model,
            stimulus,
            pending: None,
            trace: Vec::new(),
            exhausted: false,
        });
        Ok(())
    }

    /// Evaluate one edge on every channel that still has stimulus
    ///
    /// Every channel's next edge is checked before any channel commits. If one
    /// is rejected, no channel advances, the cycle stays put and the pulled
    /// edges stay pending, so a later `step()` retries the same edge.
    ///
    /// # Returns
    /// True if any channel advanced; the first rejection in registration order
    /// otherwise
    pub fn step(&mut self) -> Result<bool, TestbenchError> {
        let cycle = self.current_cycle + 1;
        let mode = self.config.concurrency_mode;
        let pool = self.pool.as_ref();

        let checks = run_phase(&mut self.channels, mode, pool, |c| c.prepare(cycle));
        let mut ready = false;
        for check in checks {
            ready |= check?;
        }
        if !ready {
            return Ok(false);
        }

        let commits = run_phase(&mut self.channels, mode, pool, |c| c.commit(cycle));
        for commit in commits {
            commit?;
        }

        self.current_cycle = cycle;
        debug!("=== Testbench Cycle {} ===", cycle);
        Ok(true)
    }

    /// Step until all stimuli are exhausted or `max_cycles` is reached
    ///
    /// # Returns
    /// The final cycle, or the first rejected edge
    pub fn run(&mut self) -> Result<u64, TestbenchError> {
        info!(
            "Testbench: running {} channel(s) in {:?} mode",
            self.channels.len(),
            self.config.concurrency_mode
        );

        while self
            .config
            .max_cycles
            .map_or(true, |max| self.current_cycle < max)
        {
            if !self.step()? {
                break;
            }
        }

        info!("Testbench: finished at cycle {}", self.current_cycle);
        Ok(self.current_cycle)
    }

    /// Number of edges every active channel has evaluated
    pub fn current_cycle(&self) -> u64 {
        self.current_cycle
    }

    /// Execution configuration the testbench was built with
    pub fn config(&self) -> &TestbenchConfig {
        &self.config
    }

    /// All channels in registration order
    pub fn channels(&self) -> &[Channel<M>] {
        &self.channels
    }

    /// Look up a channel by id
    pub fn channel(&self, id: &InstanceId) -> Option<&Channel<M>> {
        self.channels.iter().find(|c| &c.id == id)
    }
}
