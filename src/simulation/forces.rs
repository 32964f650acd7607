//! Gravitational N-body rule
//!
//! Direct pairwise summation against the whole current snapshot, explicit
//! Euler update, optional speed clamp and axis-wise edge reflection.

use super::error::StepError;
use super::params::Parameters;
use super::rules::{RuleKind, UpdateRule};
use super::states::{Entity, NVec2};

/// 2D Newtonian gravity softened by body radii
///
/// The pair distance is `|r| + radius_i + radius_j`, so bodies in contact
/// never produce a singular force as long as their radii are positive
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub G: f64,                   // gravitational constant
    pub velocity_multiplier: f64, // position += v * multiplier
    pub max_velocity: f64,        // speed clamp, <= 0 disables
}

impl NewtonianGravity {
    /// Acceleration on body `i` from every other body in `bodies`
    pub fn acceleration(&self, i: usize, bodies: &[Entity]) -> Result<NVec2, StepError> {
        let bi = &bodies[i];
        let Some((ri, mi)) = bi.body_params() else {
            return Ok(NVec2::zeros());
        };
        if mi <= 0.0 {
            return Err(StepError::NonPositiveMass { index: i, mass: mi });
        }

        let mut accel = NVec2::zeros();
        for (j, bj) in bodies.iter().enumerate() {
            if j == i {
                continue;
            }
            // Kinematic entities exert no pull
            let Some((rj, mj)) = bj.body_params() else {
                continue;
            };

            // r points from i to j
            let r = bj.position - bi.position;
            let distance = r.norm() + ri + rj;

            // Zero radii at coincident positions: no defined direction, no force
            if distance <= 0.0 || !distance.is_finite() {
                continue;
            }

            let force = self.G * mi * mj / (distance * distance);

            // force / m_i along the unit vector toward j
            accel += r * (force / mi / distance);
        }

        Ok(accel)
    }
}

impl UpdateRule for NewtonianGravity {
    fn next_state(&self, i: usize, current: &[Entity], params: &Parameters) -> Result<Entity, StepError> {
        let mut next = current[i].clone();
        next.trail.record(current[i].position, params.trail_length);

        next.velocity += self.acceleration(i, current)?;

        if self.max_velocity > 0.0 {
            let speed = next.velocity.norm();
            if speed > self.max_velocity {
                next.velocity *= self.max_velocity / speed;
            }
        }

        next.position += next.velocity * self.velocity_multiplier;
        params.domain.reflect(&next.position, &mut next.velocity);

        if !next.is_finite() {
            return Err(StepError::NonFinite { index: i });
        }
        Ok(next)
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Gravitational
    }
}
