//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `SimulationConfig` (YAML-facing) and produces the runtime bundle
//! a `Pipeline` is started from:
//! - engine settings (`Engine`)
//! - per-tick parameters (`Parameters`)
//! - the initial entity set
//! - the selected update rule
//!
//! Every value the configuration leaves unspecified is drawn from an
//! injected RNG, so a fixed seed always yields the same scenario.

use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::{ConfigError, SimulationConfig};
use crate::simulation::engine::{hw_threads, Engine};
use crate::simulation::forces::NewtonianGravity;
use crate::simulation::kinematic::Kinematic;
use crate::simulation::params::{Domain, Parameters};
use crate::simulation::rules::{RuleKind, UpdateRule};
use crate::simulation::states::{Color, Entity, NVec2};

/// Gap kept between randomly placed bodies and the far edges
const SPAWN_INSET: f64 = 20.0;

/// Runtime bundle built from a [`SimulationConfig`]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub entities: Vec<Entity>,
    pub rule: Arc<dyn UpdateRule>,
}

impl Scenario {
    /// Validate `cfg` and build it, seeding from `engine.seed` or from OS entropy
    pub fn build_scenario(cfg: &SimulationConfig) -> Result<Self, ConfigError> {
        let mut rng = match cfg.engine.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::build_with_rng(cfg, &mut rng)
    }

    /// Validate `cfg` and build it, drawing unspecified values from `rng`
    pub fn build_with_rng<R: Rng>(cfg: &SimulationConfig, rng: &mut R) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let rule_kind = cfg.engine.rule;
        let domain = Domain::new(cfg.domain.width, cfg.domain.height);

        let engine = Engine {
            rule: rule_kind,
            threads: cfg.engine.threads.unwrap_or_else(hw_threads),
            tick_interval: Duration::from_millis(u64::from(cfg.engine.tick_interval_ms)),
            worker_timeout: cfg.engine.worker_timeout_ms.map(Duration::from_millis),
        };

        let parameters = Parameters {
            tick_interval_ms: cfg.engine.tick_interval_ms,
            trail_length: cfg.trail_length(),
            domain,
        };

        let entities = match rule_kind {
            RuleKind::Kinematic => launching_balls(cfg, &domain, rng),
            RuleKind::Gravitational => gravitating_bodies(cfg, &domain, rng),
        };

        let p = &cfg.parameters;
        let rule: Arc<dyn UpdateRule> = match rule_kind {
            RuleKind::Kinematic => Arc::new(Kinematic { bounce: p.bounce }),
            RuleKind::Gravitational => Arc::new(NewtonianGravity {
                G: p.G,
                velocity_multiplier: p.velocity_multiplier,
                max_velocity: p.max_velocity,
            }),
        };

        log::info!(
            "built {:?} scenario: {} entities, {} workers, tick {:?}",
            engine.rule,
            entities.len(),
            engine.threads,
            engine.tick_interval
        );

        Ok(Self {
            engine,
            parameters,
            entities,
            rule,
        })
    }
}

/// Balls start at the domain centre and launch after an optional delay
fn launching_balls<R: Rng>(cfg: &SimulationConfig, domain: &Domain, rng: &mut R) -> Vec<Entity> {
    let p = &cfg.parameters;
    let e = &cfg.entities;
    let spread = p.launch_speed(RuleKind::Kinematic);

    (0..cfg.entity_count())
        .map(|i| {
            let position = e.positions.get(i).map(|&[x, y]| NVec2::new(x, y)).unwrap_or_else(|| domain.center());

            let velocity = match e.velocities.get(i) {
                Some(&[vx, vy]) => NVec2::new(vx, vy),
                None => NVec2::new(
                    (rng.random::<f64>() - 0.5) * spread,
                    (rng.random::<f64>() - 0.5) * spread,
                ),
            };

            let color = e.colors.get(i).copied().unwrap_or_else(|| random_color(rng));

            let delay_ms = match e.delays_ms.get(i) {
                Some(&delay) => delay,
                None if p.enable_delay && p.max_delay_ms > 0 => rng.random_range(0..p.max_delay_ms),
                None => 0,
            };

            Entity::kinematic(position, velocity, color, delay_ms)
        })
        .collect()
}

/// Bodies start anywhere in the domain with a small random drift
fn gravitating_bodies<R: Rng>(cfg: &SimulationConfig, domain: &Domain, rng: &mut R) -> Vec<Entity> {
    let e = &cfg.entities;
    let speed = cfg.parameters.launch_speed(RuleKind::Gravitational);
    let max_distance = (domain.width.min(domain.height) - SPAWN_INSET).max(0.0);

    (0..cfg.entity_count())
        .map(|i| {
            let position = match e.positions.get(i) {
                Some(&[x, y]) => NVec2::new(x, y),
                None => NVec2::new(rng.random::<f64>() * max_distance, rng.random::<f64>() * max_distance),
            };

            let velocity = match e.velocities.get(i) {
                Some(&[vx, vy]) => NVec2::new(vx, vy),
                None => NVec2::new(rng.random::<f64>() * speed, rng.random::<f64>() * speed),
            };

            let color = e.colors.get(i).copied().unwrap_or_else(|| random_color(rng));

            Entity::body(position, velocity, color, e.radius(i), e.mass(i))
        })
        .collect()
}

fn random_color<R: Rng>(rng: &mut R) -> Color {
    Color::rgb(rng.random(), rng.random(), rng.random())
}
