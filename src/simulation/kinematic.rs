//! Kinematic rule: free-flying balls with delayed launch
//!
//! Reads only the entity's own prior state, so any partition is safe.

use super::error::StepError;
use super::params::Parameters;
use super::rules::{RuleKind, UpdateRule};
use super::states::{Entity, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematic {
    pub bounce: bool, // reflect off the domain edges
}

impl UpdateRule for Kinematic {
    fn next_state(&self, i: usize, current: &[Entity], params: &Parameters) -> Result<Entity, StepError> {
        let mut next = current[i].clone();

        // Still waiting to launch: count down, nothing else changes
        if let EntityKind::Kinematic { delay_remaining_ms } = &mut next.kind {
            if *delay_remaining_ms > 0 {
                *delay_remaining_ms = delay_remaining_ms.saturating_sub(params.tick_interval_ms);
                return Ok(next);
            }
        }

        next.trail.record(next.position, params.trail_length);
        next.position += next.velocity;

        if self.bounce {
            params.domain.reflect(&next.position, &mut next.velocity);
        }

        Ok(next)
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Kinematic
    }
}
