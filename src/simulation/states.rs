//! Core state types for the stepping pipeline.
//!
//! Defines the 2D entity record shared by both update rules:
//! - `Entity` holds position, velocity, colour and trail
//! - `EntityKind` carries the rule-specific fields (launch delay or body mass/radius)
//!
//! Positions live in screen space: origin top-left, y grows downward.

use nalgebra::Vector2;
use serde::Deserialize;

use super::trail::Trail;

pub type NVec2 = Vector2<f64>;

/// Opaque RGB display attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Rule-specific part of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    /// Launched ball; stays hidden and still until the delay reaches zero
    Kinematic { delay_remaining_ms: u32 },
    /// Point mass; radius softens the pairwise distance
    Gravitational { radius: f64, mass: f64 },
}

impl Default for EntityKind {
    fn default() -> Self {
        EntityKind::Kinematic { delay_remaining_ms: 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: NVec2, // position
    pub velocity: NVec2, // velocity
    pub color: Color,
    pub trail: Trail, // recent positions, newest first
    pub kind: EntityKind,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            position: NVec2::zeros(),
            velocity: NVec2::zeros(),
            color: Color::default(),
            trail: Trail::default(),
            kind: EntityKind::default(),
        }
    }
}

impl Entity {
    pub fn kinematic(position: NVec2, velocity: NVec2, color: Color, delay_ms: u32) -> Self {
        Self {
            position,
            velocity,
            color,
            trail: Trail::default(),
            kind: EntityKind::Kinematic { delay_remaining_ms: delay_ms },
        }
    }

    pub fn body(position: NVec2, velocity: NVec2, color: Color, radius: f64, mass: f64) -> Self {
        Self {
            position,
            velocity,
            color,
            trail: Trail::default(),
            kind: EntityKind::Gravitational { radius, mass },
        }
    }

    /// Remaining launch delay, zero for anything that is already moving
    pub fn delay_remaining_ms(&self) -> u32 {
        match self.kind {
            EntityKind::Kinematic { delay_remaining_ms } => delay_remaining_ms,
            EntityKind::Gravitational { .. } => 0,
        }
    }

    /// Whether the entity has launched (visible and moving)
    pub fn is_active(&self) -> bool {
        self.delay_remaining_ms() == 0
    }

    /// `(radius, mass)` for gravitational bodies
    pub fn body_params(&self) -> Option<(f64, f64)> {
        match self.kind {
            EntityKind::Gravitational { radius, mass } => Some((radius, mass)),
            EntityKind::Kinematic { .. } => None,
        }
    }

    pub fn radius(&self) -> Option<f64> {
        self.body_params().map(|(radius, _)| radius)
    }

    pub fn mass(&self) -> Option<f64> {
        self.body_params().map(|(_, mass)| mass)
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }
}
