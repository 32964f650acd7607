//! What a renderer should draw for one published snapshot
//!
//! Backend-agnostic: a list of filled discs plus trail segments whose opacity
//! fades linearly from 1.0 at the newest segment to 0.0 at the oldest.

use crate::simulation::rules::RuleKind;
use crate::simulation::states::{Color, Entity, NVec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub disc_radius: f32,  // pixels
    pub stroke_width: f32, // trail line width in pixels
}

impl RenderStyle {
    pub fn for_rule(rule: RuleKind) -> Self {
        match rule {
            RuleKind::Kinematic => Self {
                disc_radius: 5.0,
                stroke_width: 1.0,
            },
            RuleKind::Gravitational => Self {
                disc_radius: 10.0,
                stroke_width: 5.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub index: usize,
    pub position: NVec2,
    pub radius: f32,
    pub color: Color,
}

/// Line from `trail[k]` to `trail[k + 1]` with a gradient between two alphas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub index: usize, // owning entity
    pub from: NVec2,
    pub to: NVec2,
    pub color: Color,
    pub alpha_from: f32,
    pub alpha_to: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub discs: Vec<Disc>,
    pub segments: Vec<TrailSegment>,
    pub stroke_width: f32,
}

impl Frame {
    /// Describe `entities` in draw order: trails, then discs on top.
    /// Entities still waiting to launch get no disc.
    pub fn build(entities: &[Entity], style: RenderStyle, trail_length: usize) -> Self {
        let mut frame = Frame {
            discs: Vec::with_capacity(entities.len()),
            segments: Vec::new(),
            stroke_width: style.stroke_width,
        };

        if trail_length > 0 {
            let len = trail_length as f32;
            for (index, entity) in entities.iter().enumerate() {
                for (k, from, to) in entity.trail.segments() {
                    frame.segments.push(TrailSegment {
                        index,
                        from: *from,
                        to: *to,
                        color: entity.color,
                        alpha_from: 1.0 - k as f32 / len,
                        alpha_to: 1.0 - (k + 1) as f32 / len,
                    });
                }
            }
        }

        frame.discs.extend(
            entities
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_active())
                .map(|(index, e)| Disc {
                    index,
                    position: e.position,
                    radius: style.disc_radius,
                    color: e.color,
                }),
        );

        frame
    }
}
