//! Session state and core simulation types
//!
//! Everything a running session owns lives here: the instrument, the target
//! set, the clock and score, plus the seeded RNG used for replacement targets.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::control::step_instrument;
use crate::consts::*;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Level loaded, waiting for start
    #[default]
    Idle,
    /// Clock running, input accepted
    Active,
    /// Clock frozen
    Paused,
    /// Time ran out or level finished; further ticks are no-ops
    Ended,
}

/// Target types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Beneficial zone (tumour, calibration point): awards points once
    Goal { points: i64 },
    /// Critical structure: deducts points on every overlapping tick
    Hazard { penalty: i64 },
    /// Healthy tissue in a scan level: must be identified, scores nothing
    Decoy,
}

/// How the instrument completes targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interaction {
    /// Goals complete on overlap with the tip
    #[default]
    Touch,
    /// Goals and decoys complete only when a click scans them
    Scan,
}

impl TargetKind {
    pub fn is_goal(&self) -> bool {
        matches!(self, TargetKind::Goal { .. })
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, TargetKind::Hazard { .. })
    }

    pub fn is_decoy(&self) -> bool {
        matches!(self, TargetKind::Decoy)
    }

    /// Targets that must be completed to clear a level
    pub fn is_objective(&self) -> bool {
        !self.is_hazard()
    }
}

/// A circular target zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: TargetKind,
    /// Once set the target is never scored again
    #[serde(default)]
    pub completed: bool,
}

impl Target {
    pub fn goal(id: u32, pos: Vec2, radius: f32, points: i64) -> Self {
        Self {
            id,
            pos,
            radius,
            kind: TargetKind::Goal { points },
            completed: false,
        }
    }

    pub fn hazard(id: u32, pos: Vec2, radius: f32, penalty: i64) -> Self {
        Self {
            id,
            pos,
            radius,
            kind: TargetKind::Hazard { penalty },
            completed: false,
        }
    }

    pub fn decoy(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            kind: TargetKind::Decoy,
            completed: false,
        }
    }
}

/// The user-controlled tool tip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub pos: Vec2,
    /// Displacement over the last tick
    pub vel: Vec2,
    pub radius: f32,
    /// Smoothing factor applied while assistance is on
    pub smoothing: f32,
    /// Position at the end of the previous tick
    #[serde(default)]
    pub last_pos: Vec2,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: INSTRUMENT_RADIUS,
            smoothing: ASSIST_SMOOTHING,
            last_pos: Vec2::ZERO,
        }
    }
}

impl Instrument {
    /// Place the instrument without producing any velocity
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.last_pos = pos;
        self.vel = Vec2::ZERO;
    }

    /// Move toward (or onto) the cursor
    pub fn follow(&mut self, cursor: Vec2, assist: bool) {
        self.pos = step_instrument(self.pos, cursor, assist, self.smoothing);
    }

    /// Close out a tick: velocity is the displacement since the previous tick
    pub fn settle(&mut self) {
        self.vel = self.pos - self.last_pos;
        self.last_pos = self.pos;
    }

    /// Frame-to-frame speed (pixels per tick)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Decorative guide line from the instrument to the nearest goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub target_id: u32,
    pub from: Vec2,
    pub to: Vec2,
    pub distance: f32,
    /// Close enough for the "approach carefully" hint
    pub near: bool,
}

/// Gameplay events emitted during a tick (drained by the caller)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    GoalReached { target_id: u32, points: i64 },
    HazardContact { target_id: u32, penalty: i64 },
    TargetSpawned { target_id: u32 },
    /// A scan click identified a goal (points > 0) or a decoy (points == 0)
    Identified { target_id: u32, points: i64 },
    AssistToggled { enabled: bool },
    LevelComplete { passed: bool },
    SessionEnded,
}

/// Running contact/risk statistics for the results report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub goals_reached: u32,
    pub hazard_contacts: u32,
    #[serde(default)]
    pub decoys_identified: u32,
    pub risk_samples: u32,
    pub risk_sum: f32,
    pub risk_peak: f32,
}

impl SessionStats {
    pub fn record_risk(&mut self, risk: f32) {
        self.risk_samples += 1;
        self.risk_sum += risk;
        self.risk_peak = self.risk_peak.max(risk);
    }

    pub fn mean_risk(&self) -> f32 {
        if self.risk_samples == 0 {
            0.0
        } else {
            self.risk_sum / self.risk_samples as f32
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Hand out a fresh generator; each call uses a new PCG stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }

    /// Uniform point inside the play area, `margin` pixels from every edge.
    /// Oversized margins collapse to the center line instead of an empty range.
    pub fn random_point(&mut self, margin: f32) -> Vec2 {
        let margin = margin.clamp(0.0, PLAY_AREA_WIDTH.min(PLAY_AREA_HEIGHT) / 2.0);
        let mut rng = self.next_rng();
        let x = rng.random_range(margin..=PLAY_AREA_WIDTH - margin);
        let y = rng.random_range(margin..=PLAY_AREA_HEIGHT - margin);
        Vec2::new(x, y)
    }
}

/// Headless view of a session for presentation layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: i64,
    pub time_remaining: u32,
    pub phase: SessionPhase,
    pub targets: Vec<Target>,
    pub instrument_position: Vec2,
    pub assist: bool,
    pub risk: f32,
    pub guidance: Option<Guidance>,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub seed: u64,
    pub rng_state: RngState,
    /// Index into the level catalog
    pub level_index: usize,
    pub score: i64,
    /// Countdown length for the current level
    pub time_limit: u32,
    /// Whole seconds left on the countdown
    pub time_remaining: u32,
    /// Seconds accumulated toward the next countdown step
    pub clock_accum: f32,
    pub time_ticks: u64,
    pub phase: SessionPhase,
    pub instrument: Instrument,
    /// Last reported pointer position
    pub cursor: Vec2,
    /// AI assistance (smoothing + guidance)
    pub assist: bool,
    #[serde(default)]
    pub interaction: Interaction,
    /// Click scan reach around the tip
    pub scan_radius: f32,
    /// Risk scalar is only computed when the level enables analysis
    pub risk_analysis: bool,
    /// Goals are replaced on contact instead of ending the level
    pub respawn_goals: bool,
    /// Completed goals are dropped instead of kept flagged
    pub remove_completed: bool,
    pub goal_radius: f32,
    pub goal_points: i64,
    /// Speed weight for the risk meter
    pub risk_weight: f32,
    pub passing_score: i64,
    /// Active targets (sorted by id for determinism)
    pub targets: Vec<Target>,
    pub risk: f32,
    pub guidance: Option<Guidance>,
    pub stats: SessionStats,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Session {
    /// Create an idle session with no targets and the given countdown
    pub fn new(seed: u64, time_limit: u32) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            level_index: 0,
            score: 0,
            time_limit,
            time_remaining: time_limit,
            clock_accum: 0.0,
            time_ticks: 0,
            phase: SessionPhase::Idle,
            instrument: Instrument::default(),
            cursor: Vec2::ZERO,
            assist: true,
            interaction: Interaction::Touch,
            scan_radius: SCAN_RADIUS,
            risk_analysis: true,
            respawn_goals: false,
            remove_completed: false,
            goal_radius: 20.0,
            goal_points: GOAL_POINTS,
            risk_weight: RISK_SPEED_WEIGHT,
            passing_score: 0,
            targets: Vec::new(),
            risk: 0.0,
            guidance: None,
            stats: SessionStats::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a goal and return its id
    pub fn add_goal(&mut self, pos: Vec2, radius: f32, points: i64) -> u32 {
        let id = self.next_entity_id();
        self.targets.push(Target::goal(id, pos, radius, points));
        id
    }

    /// Add a hazard and return its id
    pub fn add_hazard(&mut self, pos: Vec2, radius: f32, penalty: i64) -> u32 {
        let id = self.next_entity_id();
        self.targets.push(Target::hazard(id, pos, radius, penalty));
        id
    }

    /// Add a decoy and return its id
    pub fn add_decoy(&mut self, pos: Vec2, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.targets.push(Target::decoy(id, pos, radius));
        id
    }

    /// Place a replacement goal at a seeded random spot
    pub fn spawn_random_goal(&mut self) -> u32 {
        let pos = self.rng_state.random_point(SPAWN_MARGIN);
        let id = self.add_goal(pos, self.goal_radius, self.goal_points);
        self.events.push(GameEvent::TargetSpawned { target_id: id });
        id
    }

    /// Begin the countdown (no-op unless idle)
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Active;
            self.events.push(GameEvent::Started);
            log::info!(
                "Session started: level {}, {}s on the clock",
                self.level_index + 1,
                self.time_remaining
            );
        }
    }

    /// Transition to `Ended` exactly once
    pub fn end(&mut self) {
        if self.phase != SessionPhase::Ended {
            self.phase = SessionPhase::Ended;
            self.events.push(GameEvent::SessionEnded);
            log::info!("Session ended with score {}", self.score);
        }
    }

    pub fn set_assist(&mut self, enabled: bool) {
        if self.assist != enabled {
            self.assist = enabled;
            self.events.push(GameEvent::AssistToggled { enabled });
            if !enabled {
                self.guidance = None;
            }
        }
    }

    /// Record a pointer position. Without assistance an active instrument
    /// snaps to it; in any other phase only the cursor is remembered.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
        if !self.assist && self.phase == SessionPhase::Active {
            self.instrument.follow(self.cursor, false);
        }
    }

    /// Scan around the tip and identify every incomplete goal or decoy whose
    /// center lies strictly inside `scan_radius`. Goals score their points,
    /// decoys score nothing; either is identified at most once. Only scan
    /// levels accept clicks, and only while active. Returns the number of
    /// targets identified.
    pub fn on_click(&mut self) -> usize {
        if self.phase != SessionPhase::Active || self.interaction != Interaction::Scan {
            return 0;
        }

        let tip = self.instrument.pos;
        let mut found = 0;
        for target in self.targets.iter_mut() {
            if target.completed || target.pos.distance(tip) >= self.scan_radius {
                continue;
            }
            let points = match target.kind {
                TargetKind::Goal { points } => {
                    self.stats.goals_reached += 1;
                    points
                }
                TargetKind::Decoy => {
                    self.stats.decoys_identified += 1;
                    0
                }
                TargetKind::Hazard { .. } => continue,
            };
            target.completed = true;
            self.score = self.score.saturating_add(points);
            self.events.push(GameEvent::Identified {
                target_id: target.id,
                points,
            });
            log::debug!("Identified {} (+{})", target.id, points);
            found += 1;
        }
        found
    }

    /// Incomplete goals and decoys left in the set
    pub fn remaining_objectives(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.kind.is_objective() && !t.completed)
            .count()
    }

    /// Objectives completed so far (touched goals, identified goals and decoys)
    pub fn completed_objectives(&self) -> u32 {
        self.stats.goals_reached + self.stats.decoys_identified
    }

    pub fn get_state(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            time_remaining: self.time_remaining,
            phase: self.phase,
            targets: self.targets.clone(),
            instrument_position: self.instrument.pos,
            assist: self.assist,
            risk: self.risk,
            guidance: self.guidance.clone(),
        }
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
