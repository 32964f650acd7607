//! Update rules for the stepping pipeline
//!
//! An [`UpdateRule`] maps one entity of the current snapshot to its next state.
//! Rules are selected once per scenario and shared by every worker, so they
//! must be `Send + Sync` and must not mutate anything but their return value.

use serde::Deserialize;

use super::error::StepError;
use super::params::Parameters;
use super::states::Entity;

/// Which physics drives a scenario
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    #[serde(rename = "kinematic")] // bounded velocity, optional wall bounce, launch delay
    Kinematic,

    #[serde(rename = "gravitational")] // pairwise inverse-square attraction, O(N^2) per step
    Gravitational,
}

/// Per-entity physics function
///
/// `current` is the full, immutable snapshot for this step. Implementations
/// return the state to store at index `i` of the next buffer.
pub trait UpdateRule: Send + Sync {
    fn next_state(&self, i: usize, current: &[Entity], params: &Parameters) -> Result<Entity, StepError>;

    fn kind(&self) -> RuleKind;
}
