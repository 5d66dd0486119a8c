//! Borrow/Reuse Example
//!
//! Demonstrates stream reuse, priority classes, and how a failed stream is
//! replaced instead of being handed out again.
//!
//! Run with `RUST_LOG=accelpool_core=debug` to see every pool decision.
//! The priority for the first section can be picked with
//! `ACCELPOOL_PRIORITY=lowest|default|highest`.

use accelpool::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let priority: StreamPriority = match std::env::var("ACCELPOOL_PRIORITY") {
        Ok(value) => value.parse()?,
        Err(_) => StreamPriority::Default,
    };

    let executor = CpuExecutor::new(0);
    let config = StreamPoolConfigBuilder::new()
        .with_name("example")
        .with_default_priority(priority)
        .build();
    let pool = CpuStreamPool::with_config(config)?;

    println!("Stream pool '{}' (priority: {})\n", pool.name(), priority);

    // Borrow, use, and give back the same stream several times
    println!("Reusing a stream:");
    for round in 0..3 {
        let mut stream = pool.borrow_default(&executor);
        stream.submit(|| Ok::<(), String>(()))?;
        println!("  round {}: {}", round, stream.describe());
    }
    println!("  streams created: {}\n", executor.streams_created());

    // Each priority class has its own idle list
    println!("Priority classes:");
    for class in StreamPriority::all() {
        let stream = pool.borrow_stream(&executor, class);
        println!(
            "  {:<8} -> {} (device priority {})",
            class,
            stream.describe(),
            stream.device_priority()
        );
    }
    println!();

    // A failed stream is dropped on return and never handed out again
    println!("Failure handling:");
    let failed_id = {
        let mut stream = pool.borrow_default(&executor);
        if let Err(e) = stream.submit(|| Err("simulated kernel fault")) {
            println!("  {}", e);
        }
        stream.id()
    };
    let replacement = pool.borrow_default(&executor);
    println!(
        "  failed stream #{} replaced by #{}",
        failed_id,
        replacement.id()
    );
    drop(replacement);

    println!("\n{}", pool.stats());
    Ok(())
}
