//! Risk meter and nearest-target guidance
//!
//! The risk scalar is cosmetic: it drives a UI meter and the results report
//! but never feeds back into scoring. Models are pluggable through
//! [`RiskModel`]; [`ProximityRisk`] is the placeholder policy used by default.

use glam::Vec2;

use super::state::{Guidance, Target};
use crate::consts::*;
use crate::distance;

/// Inputs available to a risk model for one tick
#[derive(Debug, Clone, Copy)]
pub struct RiskContext<'a> {
    /// Distance to the nearest incomplete target, if any
    pub distance: Option<f32>,
    /// Instrument speed (pixels per tick)
    pub speed: f32,
    pub instrument: Vec2,
    pub targets: &'a [Target],
}

/// Pluggable risk scoring
pub trait RiskModel {
    fn assess(&self, ctx: &RiskContext<'_>) -> f32;
}

/// Step base risk by proximity, then add a speed term.
///
/// `risk = (d < near ? near_base : far_base) + speed * speed_weight`. With no
/// target in play the far base applies. The result is not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRisk {
    pub near_distance: f32,
    pub near_base: f32,
    pub far_base: f32,
    pub speed_weight: f32,
}

impl Default for ProximityRisk {
    fn default() -> Self {
        Self {
            near_distance: RISK_NEAR_DISTANCE,
            near_base: RISK_NEAR_BASE,
            far_base: RISK_FAR_BASE,
            speed_weight: RISK_SPEED_WEIGHT,
        }
    }
}

impl ProximityRisk {
    pub fn with_speed_weight(speed_weight: f32) -> Self {
        Self {
            speed_weight,
            ..Self::default()
        }
    }
}

impl RiskModel for ProximityRisk {
    fn assess(&self, ctx: &RiskContext<'_>) -> f32 {
        let base = match ctx.distance {
            Some(d) if d < self.near_distance => self.near_base,
            _ => self.far_base,
        };
        base + ctx.speed * self.speed_weight
    }
}

/// Accumulate encroachment into each hazard's safety margin, clamped to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardMarginRisk {
    /// Distance from a hazard edge at which risk starts to build
    pub margin: f32,
}

impl RiskModel for HazardMarginRisk {
    fn assess(&self, ctx: &RiskContext<'_>) -> f32 {
        if self.margin <= 0.0 {
            return 0.0;
        }
        let risk: f32 = ctx
            .targets
            .iter()
            .filter(|t| t.kind.is_hazard())
            .map(|t| {
                let gap = (distance(ctx.instrument, t.pos) - t.radius).max(0.0);
                if gap < self.margin {
                    (self.margin - gap) / self.margin
                } else {
                    0.0
                }
            })
            .sum();
        risk.min(1.0)
    }
}

/// Nearest incomplete target and its center distance
pub fn nearest_target(pos: Vec2, targets: &[Target]) -> Option<(&Target, f32)> {
    targets
        .iter()
        .filter(|t| !t.completed)
        .map(|t| (t, distance(pos, t.pos)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Guide line toward the nearest incomplete goal
pub fn guidance_for(pos: Vec2, targets: &[Target]) -> Option<Guidance> {
    targets
        .iter()
        .filter(|t| !t.completed && t.kind.is_goal())
        .map(|t| (t, distance(pos, t.pos)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(t, d)| Guidance {
            target_id: t.id,
            from: pos,
            to: t.pos,
            distance: d,
            near: d < GUIDANCE_NEAR_DISTANCE,
        })
}
