//! End-of-session results, per level and per run

use serde::{Deserialize, Serialize};

use crate::sim::Session;

/// Results shown once a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub level: u32,
    pub score: i64,
    pub goals_reached: u32,
    pub hazard_contacts: u32,
    /// Goal contacts as a share of all contact ticks (percent)
    pub accuracy: u32,
    /// Seconds spent on the clock
    pub time_used: u32,
    pub mean_risk: f32,
    pub peak_risk: f32,
    pub passed: bool,
}

impl SessionReport {
    pub fn from_session(session: &Session) -> Self {
        let stats = &session.stats;
        let contacts = stats.goals_reached + stats.hazard_contacts;
        let accuracy = if contacts == 0 {
            100
        } else {
            ((stats.goals_reached as f64 / contacts as f64) * 100.0).round() as u32
        };

        Self {
            level: session.level_index as u32 + 1,
            score: session.score,
            goals_reached: stats.goals_reached,
            hazard_contacts: stats.hazard_contacts,
            accuracy,
            time_used: session.time_limit.saturating_sub(session.time_remaining),
            mean_risk: stats.mean_risk(),
            peak_risk: stats.risk_peak,
            passed: session.score >= session.passing_score,
        }
    }
}

/// The levels played in one run. The score carries across levels, so the
/// run's score is the last level's score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub levels: Vec<SessionReport>,
    /// Levels in the catalog this run plays through
    pub level_count: usize,
}

impl RunSummary {
    pub fn new(level_count: usize) -> Self {
        Self {
            levels: Vec::new(),
            level_count,
        }
    }

    /// Add a finished level. Returns true once the run is over: the level
    /// was failed or it was the last one.
    pub fn finish_level(&mut self, report: SessionReport) -> bool {
        self.levels.push(report);
        self.is_over()
    }

    pub fn is_over(&self) -> bool {
        match self.levels.last() {
            Some(last) => !last.passed || self.levels.len() >= self.level_count,
            None => false,
        }
    }

    pub fn final_score(&self) -> i64 {
        self.levels.last().map(|r| r.score).unwrap_or(0)
    }

    pub fn levels_cleared(&self) -> u32 {
        self.levels.iter().filter(|r| r.passed).count() as u32
    }

    /// Goal contacts as a share of all contacts over the whole run (percent)
    pub fn accuracy(&self) -> u32 {
        let goals: u32 = self.levels.iter().map(|r| r.goals_reached).sum();
        let hazards: u32 = self.levels.iter().map(|r| r.hazard_contacts).sum();
        if goals + hazards == 0 {
            100
        } else {
            ((goals as f64 / (goals + hazards) as f64) * 100.0).round() as u32
        }
    }
}
