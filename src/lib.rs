pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Color, Entity, EntityKind, NVec2};
pub use simulation::trail::Trail;
pub use simulation::params::{Domain, Parameters, EDGE_MARGIN};
pub use simulation::error::StepError;
pub use simulation::rules::{RuleKind, UpdateRule};
pub use simulation::kinematic::Kinematic;
pub use simulation::forces::NewtonianGravity;
pub use simulation::partition::partition;
pub use simulation::store::EntityStore;
pub use simulation::engine::{build_pool, Engine};
pub use simulation::pipeline::{Pipeline, PipelineState, TickReport};
pub use simulation::scheduler::{run_fixed, RunSummary, Ticker};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ConfigError, DomainConfig, EngineConfig, EntitiesConfig, ParametersConfig, SimulationConfig};

pub use visualization::render::{Disc, Frame, RenderStyle, TrailSegment};
pub use visualization::viewer::run_viewer;

pub use benchmark::benchmark::bench_pipeline;
