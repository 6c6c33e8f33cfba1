//! Scalpel Rush - headless core of a surgical-robot guidance mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (instrument control, contacts, risk, clock)
//! - `levels`: Data-driven level definitions
//! - `settings`: Player preferences
//! - `report`: End-of-level and end-of-run results
//! - `highscores`: Run leaderboard
//! - `platform`: Browser bindings for the headless interface

pub mod error;
pub mod highscores;
pub mod levels;
pub mod platform;
pub mod report;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use highscores::HighScores;
pub use levels::{LevelCatalog, LevelConfig};
pub use report::{RunSummary, SessionReport};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz motion updates)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Countdown granularity (seconds per decrement)
    pub const COUNTDOWN_PERIOD: f32 = 1.0;

    /// Play area dimensions (canvas pixels)
    pub const PLAY_AREA_WIDTH: f32 = 800.0;
    pub const PLAY_AREA_HEIGHT: f32 = 600.0;
    /// Keep random targets this far from the edges
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Instrument defaults
    pub const INSTRUMENT_RADIUS: f32 = 5.0;
    /// First-order smoothing factor when assistance is on
    pub const ASSIST_SMOOTHING: f32 = 0.1;

    /// Scoring defaults
    pub const GOAL_POINTS: i64 = 100;
    pub const HAZARD_PENALTY: i64 = 10;
    /// Click scan reach around the tip on scan levels
    pub const SCAN_RADIUS: f32 = 30.0;

    /// Risk meter: base risk steps at this distance
    pub const RISK_NEAR_DISTANCE: f32 = 50.0;
    pub const RISK_NEAR_BASE: f32 = 0.5;
    pub const RISK_FAR_BASE: f32 = 0.2;
    /// Speed contribution per pixel/tick
    pub const RISK_SPEED_WEIGHT: f32 = 0.1;

    /// Guidance flags a target as "near" inside this distance
    pub const GUIDANCE_NEAR_DISTANCE: f32 = 100.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

