//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically: instrument
//! control, contact scoring, guidance and risk, then the countdown.

use glam::Vec2;

use super::contact::resolve_contacts;
use super::risk::{ProximityRisk, RiskModel, RiskContext, guidance_for, nearest_target};
use super::state::{GameEvent, Session, SessionPhase};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position, if it moved since the last tick
    pub cursor: Option<Vec2>,
    /// Flip AI assistance on/off
    pub toggle_assist: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start the countdown from `Idle`
    pub start: bool,
    /// Scan click at the instrument tip (scan levels only)
    pub click: bool,
}

/// Advance the session by one timestep using the default risk meter
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    let model = ProximityRisk::with_speed_weight(session.risk_weight);
    tick_with_model(session, input, dt, &model);
}

/// Advance the session by one timestep with a caller-supplied risk model
pub fn tick_with_model(session: &mut Session, input: &TickInput, dt: f32, model: &dyn RiskModel) {
    if input.start {
        session.start();
    }

    // Handle pause toggle
    if input.pause {
        match session.phase {
            SessionPhase::Active => {
                session.phase = SessionPhase::Paused;
                log::info!("Paused with {}s left", session.time_remaining);
                return;
            }
            SessionPhase::Paused => {
                session.phase = SessionPhase::Active;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    // Only an active session moves; ended sessions stay frozen
    if session.phase != SessionPhase::Active {
        return;
    }

    if input.toggle_assist {
        let enabled = !session.assist;
        session.set_assist(enabled);
        log::info!("Assistance {}", if enabled { "on" } else { "off" });
    }
    if let Some(cursor) = input.cursor {
        session.cursor = cursor;
    }

    session.time_ticks += 1;

    // --- CONTROL ---
    let cursor = session.cursor;
    let assist = session.assist;
    session.instrument.follow(cursor, assist);
    session.instrument.settle();

    // --- CONTACTS ---
    resolve_contacts(session);
    if input.click {
        session.on_click();
    }

    // --- GUIDANCE & RISK ---
    let tip = session.instrument.pos;
    session.guidance = if session.assist {
        guidance_for(tip, &session.targets)
    } else {
        None
    };
    if session.risk_analysis {
        let ctx = RiskContext {
            distance: nearest_target(tip, &session.targets).map(|(_, d)| d),
            speed: session.instrument.speed(),
            instrument: tip,
            targets: &session.targets,
        };
        let risk = model.assess(&ctx);
        session.risk = risk;
        session.stats.record_risk(risk);
    }

    // --- LEVEL CLEAR ---
    if !session.respawn_goals
        && session.completed_objectives() > 0
        && session.remaining_objectives() == 0
    {
        let passed = session.score >= session.passing_score;
        log::info!(
            "Level {} cleared with {} points ({})",
            session.level_index + 1,
            session.score,
            if passed { "passed" } else { "below passing score" }
        );
        session.events.push(GameEvent::LevelComplete { passed });
        session.end();
        return;
    }

    // --- COUNTDOWN ---
    advance_clock(session, dt);
}

/// Slack for f32 rounding when sixty `SIM_DT` steps sum to just under a period
const CLOCK_EPSILON: f32 = 1e-4;

/// Accumulate `dt` and decrement the countdown once per whole period
fn advance_clock(session: &mut Session, dt: f32) {
    debug_assert!(dt >= 0.0, "negative timestep");
    session.clock_accum += dt.max(0.0);
    while session.clock_accum + CLOCK_EPSILON >= COUNTDOWN_PERIOD && session.time_remaining > 0 {
        session.clock_accum -= COUNTDOWN_PERIOD;
        session.time_remaining -= 1;
    }
    if session.time_remaining == 0 {
        session.clock_accum = 0.0;
        session.end();
    }
}
