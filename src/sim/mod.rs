//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - No rendering or platform dependencies

pub mod contact;
pub mod control;
pub mod risk;
pub mod state;
pub mod tick;

pub use contact::{Contact, in_contact, resolve_contacts};
pub use control::step_instrument;
pub use risk::{HazardMarginRisk, ProximityRisk, RiskModel, RiskContext, guidance_for, nearest_target};
pub use state::{
    GameEvent, Guidance, Instrument, Interaction, RngState, Session, SessionPhase, SessionSnapshot,
    SessionStats, Target, TargetKind,
};
pub use tick::{TickInput, tick, tick_with_model};
