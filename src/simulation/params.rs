//! Per-tick parameters handed to every update rule
//!
//! `Parameters` holds the settings shared by both rules:
//! - tick interval (drives the launch-delay countdown),
//! - trail length (0 disables trails),
//! - drawable domain used for wall bounce

use super::states::NVec2;

/// Distance from an edge at which velocities are reflected
pub const EDGE_MARGIN: f64 = 10.0;

/// Drawable area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
}

impl Domain {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> NVec2 {
        NVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Negate each velocity axis whose position is within `EDGE_MARGIN` of either edge
    pub fn reflect(&self, position: &NVec2, velocity: &mut NVec2) {
        if position.x < EDGE_MARGIN || position.x > self.width - EDGE_MARGIN {
            velocity.x = -velocity.x;
        }
        if position.y < EDGE_MARGIN || position.y > self.height - EDGE_MARGIN {
            velocity.y = -velocity.y;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub tick_interval_ms: u32, // timer interval, also the delay decrement
    pub trail_length: usize,   // max trail points, 0 = off
    pub domain: Domain,        // drawable area
}
