//! Data-driven level definitions
//!
//! Levels differ only in data: countdown, passing score, which AI features are
//! on, and how targets are laid out. A catalog can be loaded from JSON; any
//! failure falls back to the built-in progression.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::distance;
use crate::error::SimError;
use crate::settings::Settings;
use crate::sim::{Interaction, Session, TargetKind};

/// Attempts before a random target is accepted even if it overlaps
const PLACEMENT_ATTEMPTS: u32 = 16;
/// Extra clearance between randomly placed targets
const PLACEMENT_GAP: f32 = 10.0;

/// A single hand-placed target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: TargetKind,
}

/// How a level populates its target set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum TargetLayout {
    /// Explicit positions
    Fixed { targets: Vec<TargetSpec> },
    /// Evenly spaced goals along a horizontal line
    Row {
        count: u32,
        start: Vec2,
        spacing: f32,
        radius: f32,
        points: i64,
    },
    /// Seeded random placement inside the play area. Decoys share the goal
    /// radius and only matter on scan levels.
    Random {
        goals: u32,
        hazards: u32,
        #[serde(default)]
        decoys: u32,
        goal_radius: f32,
        hazard_radius: f32,
        points: i64,
        penalty: i64,
    },
}

/// Level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Countdown in seconds
    pub time_limit: u32,
    pub passing_score: i64,
    /// Assistance starts on (if the player's settings allow it)
    #[serde(default = "default_true")]
    pub real_time_assist: bool,
    /// Drive the risk meter
    #[serde(default = "default_true")]
    pub risk_analysis: bool,
    /// Replace each reached goal instead of clearing the level
    #[serde(default)]
    pub respawn_goals: bool,
    /// Drop reached goals from the target set. Always on for respawning levels.
    #[serde(default)]
    pub remove_completed: bool,
    /// Touch to complete goals, or click to identify them
    #[serde(default)]
    pub interaction: Interaction,
    pub targets: TargetLayout,
}

fn default_true() -> bool {
    true
}

impl LevelConfig {
    /// Radius and points used for replacement goals
    fn goal_template(&self) -> (f32, i64) {
        match &self.targets {
            TargetLayout::Row { radius, points, .. } => (*radius, *points),
            TargetLayout::Random {
                goal_radius,
                points,
                ..
            } => (*goal_radius, *points),
            TargetLayout::Fixed { targets } => targets
                .iter()
                .find_map(|t| match t.kind {
                    TargetKind::Goal { points } => Some((t.radius, points)),
                    TargetKind::Hazard { .. } | TargetKind::Decoy => None,
                })
                .unwrap_or((20.0, GOAL_POINTS)),
        }
    }

    /// Reject layouts that cannot be placed inside the play area
    pub fn validate(&self) -> Result<(), SimError> {
        let bad = |reason: String| Err(SimError::unavailable(format!("level \"{}\"", self.name), reason));
        let radii: Vec<f32> = match &self.targets {
            TargetLayout::Fixed { targets } => targets.iter().map(|t| t.radius).collect(),
            TargetLayout::Row { radius, .. } => vec![*radius],
            TargetLayout::Random {
                goal_radius,
                hazard_radius,
                ..
            } => vec![*goal_radius, *hazard_radius],
        };
        if let Some(r) = radii.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return bad(format!("invalid target radius {r}"));
        }
        if let TargetLayout::Random {
            goal_radius,
            hazard_radius,
            ..
        } = &self.targets
        {
            let widest = SPAWN_MARGIN.max(*goal_radius).max(*hazard_radius);
            if widest * 2.0 > PLAY_AREA_WIDTH.min(PLAY_AREA_HEIGHT) {
                return bad(format!("radius {widest} does not fit the play area"));
            }
        }
        Ok(())
    }

    /// Build an idle session for this level
    pub fn build_session(&self, index: usize, seed: u64, settings: &Settings) -> Session {
        let mut session = Session::new(seed, self.time_limit);
        session.level_index = index;
        session.passing_score = self.passing_score;
        session.assist = self.real_time_assist && settings.assist.enabled();
        session.risk_analysis = self.risk_analysis;
        session.respawn_goals = self.respawn_goals;
        // Respawning without removal would grow the target set every hit
        session.remove_completed = self.remove_completed || self.respawn_goals;
        session.interaction = self.interaction;
        session.risk_weight = settings.risk_speed_weight;
        session.instrument.radius = settings.instrument_radius;
        session.instrument.smoothing = settings.smoothing();

        let (goal_radius, goal_points) = self.goal_template();
        session.goal_radius = goal_radius;
        session.goal_points = goal_points;

        let start = Vec2::new(PLAY_AREA_WIDTH / 2.0, PLAY_AREA_HEIGHT / 2.0);
        session.instrument.place(start);
        session.cursor = start;

        match &self.targets {
            TargetLayout::Fixed { targets } => {
                for t in targets {
                    match t.kind {
                        TargetKind::Goal { points } => session.add_goal(t.pos, t.radius, points),
                        TargetKind::Hazard { penalty } => {
                            session.add_hazard(t.pos, t.radius, penalty)
                        }
                        TargetKind::Decoy => session.add_decoy(t.pos, t.radius),
                    };
                }
            }
            TargetLayout::Row {
                count,
                start,
                spacing,
                radius,
                points,
            } => {
                for i in 0..*count {
                    let pos = *start + Vec2::new(i as f32 * spacing, 0.0);
                    session.add_goal(pos, *radius, *points);
                }
            }
            TargetLayout::Random {
                goals,
                hazards,
                decoys,
                goal_radius,
                hazard_radius,
                points,
                penalty,
            } => {
                // Hazards first so goals can be kept clear of them
                for _ in 0..*hazards {
                    let pos = place_clear(&mut session, *hazard_radius, start);
                    session.add_hazard(pos, *hazard_radius, *penalty);
                }
                for _ in 0..*goals {
                    let pos = place_clear(&mut session, *goal_radius, start);
                    session.add_goal(pos, *goal_radius, *points);
                }
                for _ in 0..*decoys {
                    let pos = place_clear(&mut session, *goal_radius, start);
                    session.add_decoy(pos, *goal_radius);
                }
            }
        }

        log::info!(
            "Level {} \"{}\": {} targets, {}s",
            index + 1,
            self.name,
            session.targets.len(),
            self.time_limit
        );
        session
    }
}

/// Pick a random spot clear of existing targets and the instrument start
fn place_clear(session: &mut Session, radius: f32, start: Vec2) -> Vec2 {
    let margin = SPAWN_MARGIN.max(radius);
    let mut pos = session.rng_state.random_point(margin);
    for _ in 1..PLACEMENT_ATTEMPTS {
        let clear_of_start =
            distance(pos, start) >= radius + session.instrument.radius + PLACEMENT_GAP;
        let clear_of_targets = session
            .targets
            .iter()
            .all(|t| distance(pos, t.pos) >= radius + t.radius + PLACEMENT_GAP);
        if clear_of_start && clear_of_targets {
            break;
        }
        pos = session.rng_state.random_point(margin);
    }
    pos
}

/// Ordered set of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelConfig>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// The five-stage progression: self-check, planning, precision,
    /// collaboration, then image recognition
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    name: "System Self-Check".into(),
                    description: "Touch every calibration point to verify the position sensors"
                        .into(),
                    time_limit: 60,
                    passing_score: 70,
                    real_time_assist: false,
                    risk_analysis: true,
                    respawn_goals: false,
                    remove_completed: false,
                    interaction: Interaction::Touch,
                    targets: TargetLayout::Row {
                        count: 5,
                        start: Vec2::new(100.0, 200.0),
                        spacing: 150.0,
                        radius: 15.0,
                        points: 20,
                    },
                },
                LevelConfig {
                    name: "Surgical Planning".into(),
                    description: "Reach each tumour as it is identified".into(),
                    time_limit: 90,
                    passing_score: 80,
                    real_time_assist: true,
                    risk_analysis: true,
                    respawn_goals: true,
                    remove_completed: true,
                    interaction: Interaction::Touch,
                    targets: TargetLayout::Random {
                        goals: 1,
                        hazards: 0,
                        decoys: 0,
                        goal_radius: 30.0,
                        hazard_radius: 0.0,
                        points: GOAL_POINTS,
                        penalty: HAZARD_PENALTY,
                    },
                },
                LevelConfig {
                    name: "Precision Operation".into(),
                    description: "Excise the targets while avoiding vessels and nerves".into(),
                    time_limit: 120,
                    passing_score: 85,
                    real_time_assist: true,
                    risk_analysis: true,
                    respawn_goals: false,
                    remove_completed: true,
                    interaction: Interaction::Touch,
                    targets: TargetLayout::Random {
                        goals: 4,
                        hazards: 3,
                        decoys: 0,
                        goal_radius: 20.0,
                        hazard_radius: 35.0,
                        points: 25,
                        penalty: HAZARD_PENALTY,
                    },
                },
                LevelConfig {
                    name: "Human-Robot Collaboration".into(),
                    description: "Work alongside the surgeon through a crowded field".into(),
                    time_limit: 180,
                    passing_score: 90,
                    real_time_assist: true,
                    risk_analysis: true,
                    respawn_goals: false,
                    remove_completed: false,
                    interaction: Interaction::Touch,
                    targets: TargetLayout::Random {
                        goals: 6,
                        hazards: 5,
                        decoys: 0,
                        goal_radius: 18.0,
                        hazard_radius: 30.0,
                        points: 20,
                        penalty: HAZARD_PENALTY,
                    },
                },
                LevelConfig {
                    name: "Medical Image Recognition".into(),
                    description: "Scan the image and click to classify every lesion".into(),
                    time_limit: 60,
                    passing_score: 300,
                    real_time_assist: true,
                    risk_analysis: false,
                    respawn_goals: false,
                    remove_completed: false,
                    interaction: Interaction::Scan,
                    targets: TargetLayout::Random {
                        goals: 3,
                        hazards: 0,
                        decoys: 2,
                        goal_radius: 20.0,
                        hazard_radius: 0.0,
                        points: GOAL_POINTS,
                        penalty: 0,
                    },
                },
            ],
        }
    }

    /// Parse a catalog. An empty level list or a layout that cannot be
    /// placed counts as unavailable.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let catalog: Self = serde_json::from_str(json)?;
        if catalog.levels.is_empty() {
            return Err(SimError::unavailable("level catalog", "no levels defined"));
        }
        for level in &catalog.levels {
            level.validate()?;
        }
        Ok(catalog)
    }

    /// Parse `json` if given, otherwise (or on failure) use the built-ins
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(catalog)) => {
                log::info!("Loaded {} levels", catalog.levels.len());
                catalog
            }
            Some(Err(e)) => {
                log::warn!("{e}, falling back to built-in levels");
                Self::builtin()
            }
            None => Self::builtin(),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&LevelConfig, SimError> {
        self.levels
            .get(index)
            .ok_or_else(|| SimError::unavailable(format!("level {}", index + 1), "out of range"))
    }

    /// Build the session for level `index`
    pub fn session(&self, index: usize, seed: u64, settings: &Settings) -> Result<Session, SimError> {
        Ok(self.get(index)?.build_session(index, seed, settings))
    }

    /// Build the session following `current`, carrying the score forward
    pub fn next_session(&self, current: &Session, settings: &Settings) -> Result<Session, SimError> {
        let index = current.level_index + 1;
        // Fresh stream per level keeps layouts independent but reproducible
        let seed = current.seed.wrapping_add(index as u64);
        let mut next = self.session(index, seed, settings)?;
        next.score = current.score;
        next.seed = current.seed;
        Ok(next)
    }
}
