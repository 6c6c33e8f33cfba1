//! Instrument control loop
//!
//! Direct control pins the tool tip to the pointer. Assisted control applies
//! first-order exponential smoothing toward the pointer, which trades
//! responsiveness for the "guided" feel.

use glam::Vec2;

/// Next instrument position for one tick.
///
/// No bounds clamping: the result may leave the visible play area.
#[inline]
pub fn step_instrument(prev: Vec2, cursor: Vec2, assist: bool, smoothing: f32) -> Vec2 {
    if assist {
        prev + (cursor - prev) * smoothing
    } else {
        cursor
    }
}
