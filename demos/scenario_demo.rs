//! Drives a 16x8 memory through a short write/read scenario and a batch of
//! random-traffic instances, printing the registered output after each edge.
//!
//! Run with `RUST_LOG=debug` to see every edge.

use syncmem::{
    ConcurrencyMode, EdgeInputs, InstanceId, MemoryConfig, RandomStimulus, ScriptedStimulus,
    SyncMemory, Testbench, TestbenchConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let script = vec![
        EdgeInputs::clear(),
        EdgeInputs::write(5, 0xAA),
        EdgeInputs::read(5),
        EdgeInputs::write(5, 0xBB),
        EdgeInputs::read(5),
    ];

    let mut bench = Testbench::new(TestbenchConfig::default())?;
    let id = InstanceId::new("scenario");
    bench.add_channel(
        id.clone(),
        SyncMemory::new(MemoryConfig::default())?,
        Box::new(ScriptedStimulus::new(script.clone())),
    )?;
    bench.run()?;

    if let Some(channel) = bench.channel(&id) {
        for (cycle, (edge, q)) in script.iter().zip(channel.trace()).enumerate() {
            println!(
                "cycle {:>2}: clr={} we={} addr={:>2} din={:#04x} -> q={:#04x}",
                cycle + 1,
                edge.clear as u8,
                edge.write_enable as u8,
                edge.address,
                edge.write_data,
                q
            );
        }
    }

    let config = TestbenchConfig::new()
        .with_concurrency(ConcurrencyMode::Rayon)
        .with_max_cycles(10_000);
    let mut random_bench = Testbench::new(config)?;
    for seed in 0..16u64 {
        let mem = SyncMemory::new(MemoryConfig::new().with_data_width(32).with_addr_width(10))?;
        let stimulus = RandomStimulus::new(seed, mem.depth(), mem.word_mask(), 10_000)
            .with_clear_probability(0.001);
        random_bench.add_channel(InstanceId::new(format!("random{}", seed)), mem, Box::new(stimulus))?;
    }
    let cycles = random_bench.run()?;

    for channel in random_bench.channels() {
        let stats = channel.model().stats();
        println!(
            "{}: {} edges, {} writes, {} clears",
            channel.id(),
            stats.edges,
            stats.writes,
            stats.clears
        );
    }
    println!("random traffic finished after {} cycles", cycles);

    Ok(())
}
