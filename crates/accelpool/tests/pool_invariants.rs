//! Randomized borrow/return sequences checked against a reference model.

use std::collections::{HashMap, HashSet};

use accelpool::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Expected idle ids per priority, most recently returned last.
#[derive(Default)]
struct Model {
    idle: HashMap<StreamPriority, Vec<u64>>,
    failed: HashSet<u64>,
}

impl Model {
    fn total_idle(&self) -> usize {
        self.idle.values().map(Vec::len).sum()
    }
}

fn run_sequence(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let executor = CpuExecutor::new(0);
    let pool = CpuStreamPool::new();
    let mut model = Model::default();
    let mut held: Vec<PooledStream<CpuStream>> = Vec::new();

    for _ in 0..steps {
        match rng.gen_range(0..3) {
            // Borrow
            0 => {
                let priority = StreamPriority::all()[rng.gen_range(0..3)];
                let expected = model.idle.get_mut(&priority).and_then(Vec::pop);
                let next_new = executor.streams_created();

                let stream = pool.borrow_stream(&executor, priority);
                match expected {
                    Some(id) => assert_eq!(stream.id(), id, "seed {seed}: expected LIFO reuse"),
                    None => assert_eq!(stream.id(), next_new, "seed {seed}: expected new stream"),
                }
                assert_eq!(stream.priority(), priority);
                assert!(!model.failed.contains(&stream.id()));
                held.push(stream);
            }
            // Return, sometimes after a failure
            1 if !held.is_empty() => {
                let index = rng.gen_range(0..held.len());
                let mut stream = held.swap_remove(index);
                if rng.gen_bool(0.25) {
                    stream.poison("injected fault");
                    model.failed.insert(stream.id());
                } else {
                    model
                        .idle
                        .entry(stream.priority())
                        .or_default()
                        .push(stream.id());
                }
                drop(stream);
            }
            // Use a held stream
            _ => {
                if let Some(stream) = held.first_mut() {
                    stream.submit(|| Ok::<(), String>(())).expect("healthy stream");
                }
            }
        }

        for priority in StreamPriority::all() {
            assert_eq!(
                pool.idle_count(priority),
                model.idle.get(&priority).map_or(0, Vec::len)
            );
        }
        assert_eq!(pool.total_idle(), model.total_idle());
        assert_eq!(executor.live_streams(), held.len() + pool.total_idle());
        assert_eq!(pool.stats().outstanding, held.len());
    }

    drop(held);
    drop(pool);
    assert_eq!(executor.live_streams(), 0);
}

#[test]
fn test_random_sequences_match_model() {
    for seed in 0..32 {
        run_sequence(seed, 400);
    }
}

#[test]
fn test_long_random_sequence() {
    run_sequence(0x5eed_cafe, 5_000);
}
