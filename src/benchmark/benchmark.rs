use std::sync::Arc;
use std::time::Instant;

use crate::simulation::engine::{build_pool, hw_threads};
use crate::simulation::forces::NewtonianGravity;
use crate::simulation::params::{Domain, Parameters};
use crate::simulation::pipeline::Pipeline;
use crate::simulation::states::{Color, Entity, NVec2};

/// Helper to build `n` gravitational bodies at deterministic positions
fn make_bodies(n: usize, domain: &Domain) -> Vec<Entity> {
    let center = domain.center();
    let spread = domain.width.min(domain.height) * 0.4;

    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let offset = NVec2::new((i_f * 0.37).sin(), (i_f * 0.13).cos()) * spread;
            Entity::body(center + offset, NVec2::zeros(), Color::rgb(255, 255, 255), 1.0, 1.0)
        })
        .collect()
}

/// Helper to build the per-tick parameters used by every run
fn make_params() -> Parameters {
    Parameters {
        tick_interval_ms: 20,
        trail_length: 32,
        domain: Domain::new(4000.0, 4000.0),
    }
}

/// Time the real pipeline for a range of n and pool sizes
/// Paste output directly into a spreadsheet to graph
pub fn bench_pipeline() {
    let max_threads = hw_threads();
    let mut pool_sizes = vec![1, 2, 4, max_threads];
    pool_sizes.retain(|&t| t <= max_threads);
    pool_sizes.dedup();

    println!("n,threads,ms_per_tick");

    for n in (250..=4000).step_by(250) {
        // Small n: average over more ticks to smooth noise
        let ticks = if n <= 1000 { 20 } else { 5 };

        for &threads in &pool_sizes {
            let pool = match build_pool(threads) {
                Ok(pool) => pool,
                Err(err) => {
                    log::warn!("skipping {threads} threads: {err}");
                    continue;
                }
            };

            let params = make_params();
            let rule = Arc::new(NewtonianGravity {
                G: 1.0,
                velocity_multiplier: 1.0,
                max_velocity: 2.0,
            });
            let mut pipeline = Pipeline::new(make_bodies(n, &params.domain), rule, params, pool);

            // Warm-up tick primes the one-step-ahead launch
            if let Err(err) = pipeline.tick() {
                log::warn!("warm-up failed for n = {n}: {err}");
                continue;
            }

            let t0 = Instant::now();
            let mut completed = 0u32;
            for _ in 0..ticks {
                if pipeline.tick().is_ok() {
                    completed += 1;
                }
            }
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

            if completed > 0 {
                println!("{},{},{:.6}", n, threads, elapsed_ms / f64::from(completed));
            }
        }
    }
}
