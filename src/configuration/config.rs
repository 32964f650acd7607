//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – rule selection, worker count and tick timing
//! - [`DomainConfig`]     – size of the drawable area
//! - [`ParametersConfig`] – physical constants and generation knobs
//! - [`EntitiesConfig`]   – optional per-entity overrides
//! - [`SimulationConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A three-body scenario matching these types:
//!
//! ```yaml
//! engine:
//!   rule: "gravitational"   # or "kinematic"
//!   threads: 4              # optional, defaults to the number of CPUs
//!   tick_interval_ms: 20
//!   seed: 7                 # optional, omit for a different run every time
//!
//! domain:
//!   width: 800
//!   height: 800
//!
//! parameters:
//!   trail_length: 32
//!   G: 100.0
//!   velocity_multiplier: 4.0
//!   max_velocity: 2.0       # <= 0 disables the speed clamp
//!
//! entities:
//!   positions: [[200, 200], [600, 300], [400, 600]]
//!   radii: [64]             # shorter lists repeat their last value
//!   masses: [64]
//! ```
//!
//! Every field has a default, so an empty document is a valid kinematic
//! scenario. Overrides shorter than `entity_count` fall back to random
//! generation (positions, velocities, colours, delays) or to the last
//! supplied value (radii, masses) when the scenario is built.

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::rules::RuleKind;
use crate::simulation::states::Color;

/// Rejected configuration; caught before any stepping starts
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("tick interval must be positive")]
    NonPositiveTickInterval,

    #[error("domain {width}x{height} is not a positive finite area")]
    InvalidDomain { width: f64, height: f64 },

    #[error("entity {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("entity {index} has negative radius {radius}")]
    NegativeRadius { index: usize, radius: f64 },

    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub rule: RuleKind,                 // update rule driving every entity
    pub threads: Option<usize>,         // worker pool size, `None` = available parallelism
    pub tick_interval_ms: u32,          // fixed tick period
    pub seed: Option<u64>,              // deterministic seed to make runs reproducible
    pub worker_timeout_ms: Option<u64>, // bound on how long a tick waits for workers
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rule: RuleKind::Kinematic,
            threads: None,
            tick_interval_ms: 20,
            seed: None,
            worker_timeout_ms: None,
        }
    }
}

/// Drawable area in pixels
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DomainConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
        }
    }
}

/// Global physical parameters and generation knobs
///
/// Fields left as `None` take a rule-dependent default
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub entity_count: Option<usize>, // 1000 balls / 3 bodies
    pub trail_length: Option<usize>, // 0 balls / 32 bodies, 0 disables trails
    pub bounce: bool,                // kinematic wall bounce
    pub enable_delay: bool,          // random launch delay for balls without an override
    pub max_delay_ms: u32,           // upper bound (exclusive) of random delays
    pub launch_speed: Option<f64>,   // random velocity scale: 3.0 balls / 0.01 bodies
    pub G: f64,                      // gravitational constant
    pub velocity_multiplier: f64,    // position += velocity * multiplier (bodies)
    pub max_velocity: f64,           // speed clamp for bodies, <= 0 disables
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            entity_count: None,
            trail_length: None,
            bounce: true,
            enable_delay: true,
            max_delay_ms: 8000,
            launch_speed: None,
            G: 100.0,
            velocity_multiplier: 4.0,
            max_velocity: 2.0,
        }
    }
}

impl ParametersConfig {
    pub fn entity_count(&self, rule: RuleKind) -> usize {
        self.entity_count.unwrap_or(match rule {
            RuleKind::Kinematic => 1000,
            RuleKind::Gravitational => 3,
        })
    }

    pub fn trail_length(&self, rule: RuleKind) -> usize {
        self.trail_length.unwrap_or(match rule {
            RuleKind::Kinematic => 0,
            RuleKind::Gravitational => 32,
        })
    }

    pub fn launch_speed(&self, rule: RuleKind) -> f64 {
        self.launch_speed.unwrap_or(match rule {
            RuleKind::Kinematic => 3.0,
            RuleKind::Gravitational => 0.01,
        })
    }
}

/// Optional per-entity initial values, indexed by entity
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EntitiesConfig {
    pub positions: Vec<[f64; 2]>,
    pub velocities: Vec<[f64; 2]>,
    pub colors: Vec<Color>,
    pub radii: Vec<f64>,  // last value repeats
    pub masses: Vec<f64>, // last value repeats
    pub delays_ms: Vec<u32>,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            velocities: Vec::new(),
            colors: Vec::new(),
            radii: vec![DEFAULT_BODY_SIZE],
            masses: vec![DEFAULT_BODY_SIZE],
            delays_ms: Vec::new(),
        }
    }
}

/// Radius and mass used when no override is given at all
pub const DEFAULT_BODY_SIZE: f64 = 64.0;

impl EntitiesConfig {
    /// Radius of entity `i`: its override, else the last supplied radius
    pub fn radius(&self, i: usize) -> f64 {
        self.radii.get(i).or(self.radii.last()).copied().unwrap_or(DEFAULT_BODY_SIZE)
    }

    /// Mass of entity `i`: its override, else the last supplied mass
    pub fn mass(&self, i: usize) -> f64 {
        self.masses.get(i).or(self.masses.last()).copied().unwrap_or(DEFAULT_BODY_SIZE)
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub engine: EngineConfig,         // rule, pool size, timing
    pub domain: DomainConfig,         // drawable area
    pub parameters: ParametersConfig, // physical constants
    pub entities: EntitiesConfig,     // per-entity overrides
}

impl SimulationConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn entity_count(&self) -> usize {
        self.parameters.entity_count(self.engine.rule)
    }

    pub fn trail_length(&self) -> usize {
        self.parameters.trail_length(self.engine.rule)
    }

    /// Reject anything that would make the stepping loop undefined
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.threads == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.engine.tick_interval_ms == 0 {
            return Err(ConfigError::NonPositiveTickInterval);
        }

        let DomainConfig { width, height } = self.domain;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidDomain { width, height });
        }

        let p = &self.parameters;
        for (field, value) in [
            ("G", p.G),
            ("velocity_multiplier", p.velocity_multiplier),
            ("max_velocity", p.max_velocity),
            ("launch_speed", p.launch_speed(self.engine.rule)),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        let e = &self.entities;
        if e.positions.iter().chain(&e.velocities).flatten().any(|c| !c.is_finite()) {
            return Err(ConfigError::NonFinite { field: "entities" });
        }

        if self.engine.rule == RuleKind::Gravitational {
            for i in 0..self.entity_count() {
                let mass = e.mass(i);
                if !(mass > 0.0 && mass.is_finite()) {
                    return Err(ConfigError::NonPositiveMass { index: i, mass });
                }
                let radius = e.radius(i);
                if !(radius >= 0.0 && radius.is_finite()) {
                    return Err(ConfigError::NegativeRadius { index: i, radius });
                }
            }
        }

        Ok(())
    }
}
