//! Contact detection and scoring
//!
//! A single O(n) pass over the target set: circle-vs-circle overlap between
//! the instrument tip and every incomplete target.

use glam::Vec2;

use super::state::{GameEvent, Interaction, Session, TargetKind};
use crate::distance;

/// Result of a single contact during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub target_id: u32,
    pub kind: TargetKind,
    pub distance: f32,
    /// Score change applied for this contact
    pub delta: i64,
}

/// Strict overlap test: touching edges do not count
#[inline]
pub fn in_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    distance(a_pos, b_pos) < a_radius + b_radius
}

/// Score every overlapping incomplete target and return the contacts.
///
/// Goals award their points and are completed (or dropped, per level). When
/// the level respawns goals, each completed goal is replaced after the scan so
/// a replacement cannot score on the same tick. Hazards deduct their penalty
/// and stay live, so sustained overlap is penalised every tick.
pub fn resolve_contacts(session: &mut Session) -> Vec<Contact> {
    let tip = session.instrument.pos;
    let tip_radius = session.instrument.radius;
    let mut contacts = Vec::new();

    let scanning = session.interaction == Interaction::Scan;
    for target in session.targets.iter_mut() {
        if target.completed {
            continue;
        }
        // Scan levels complete goals by click only; decoys never react to touch
        if target.kind.is_decoy() || (scanning && target.kind.is_goal()) {
            continue;
        }
        if !in_contact(tip, tip_radius, target.pos, target.radius) {
            continue;
        }
        let d = distance(tip, target.pos);

        let delta = match target.kind {
            TargetKind::Goal { points } => {
                target.completed = true;
                session.stats.goals_reached += 1;
                session.events.push(GameEvent::GoalReached {
                    target_id: target.id,
                    points,
                });
                log::debug!("Goal {} reached (+{})", target.id, points);
                points
            }
            TargetKind::Hazard { penalty } => {
                session.stats.hazard_contacts += 1;
                session.events.push(GameEvent::HazardContact {
                    target_id: target.id,
                    penalty,
                });
                log::debug!("Hazard {} contact (-{})", target.id, penalty);
                -penalty
            }
            TargetKind::Decoy => continue,
        };

        session.score = session.score.saturating_add(delta);
        contacts.push(Contact {
            target_id: target.id,
            kind: target.kind,
            distance: d,
            delta,
        });
    }

    let goals_hit = contacts.iter().filter(|c| c.kind.is_goal()).count();
    if session.remove_completed {
        session.targets.retain(|t| !(t.completed && t.kind.is_goal()));
    }
    if session.respawn_goals {
        for _ in 0..goals_hit {
            session.spawn_random_goal();
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SessionPhase;

    fn session_at(pos: Vec2) -> Session {
        let mut s = Session::new(1, 60);
        s.phase = SessionPhase::Active;
        s.instrument.pos = pos;
        s.instrument.radius = 5.0;
        s
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        assert!(!in_contact(Vec2::ZERO, 5.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(in_contact(Vec2::ZERO, 5.0, Vec2::new(14.99, 0.0), 10.0));
    }

    #[test]
    fn test_goal_within_reach_scores_and_completes() {
        // tip at origin r=5, goal r=10 at (5, 0): 5 < 15
        let mut s = session_at(Vec2::ZERO);
        let id = s.add_goal(Vec2::new(5.0, 0.0), 10.0, 100);

        let contacts = resolve_contacts(&mut s);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].target_id, id);
        assert_eq!(contacts[0].delta, 100);
        assert_eq!(s.score, 100);
        assert!(s.targets[0].completed);
    }

    #[test]
    fn test_completed_goal_scores_once() {
        let mut s = session_at(Vec2::new(300.0, 300.0));
        s.add_goal(Vec2::new(300.0, 300.0), 20.0, 100);

        resolve_contacts(&mut s);
        resolve_contacts(&mut s);
        resolve_contacts(&mut s);
        assert_eq!(s.score, 100);
        assert_eq!(s.stats.goals_reached, 1);
    }

    #[test]
    fn test_hazard_penalises_every_tick() {
        let mut s = session_at(Vec2::new(100.0, 100.0));
        s.add_hazard(Vec2::new(102.0, 100.0), 30.0, 10);

        for _ in 0..4 {
            resolve_contacts(&mut s);
        }
        assert_eq!(s.score, -40);
        assert!(!s.targets[0].completed);
        assert_eq!(s.stats.hazard_contacts, 4);
    }

    #[test]
    fn test_score_goes_negative_without_floor() {
        let mut s = session_at(Vec2::ZERO);
        s.add_hazard(Vec2::ZERO, 10.0, 1_000);
        resolve_contacts(&mut s);
        assert_eq!(s.score, -1_000);
    }

    #[test]
    fn test_remove_completed_drops_goal() {
        let mut s = session_at(Vec2::ZERO);
        s.remove_completed = true;
        s.add_goal(Vec2::ZERO, 10.0, 50);
        s.add_hazard(Vec2::new(400.0, 400.0), 10.0, 5);

        resolve_contacts(&mut s);
        assert_eq!(s.targets.len(), 1);
        assert!(s.targets[0].kind.is_hazard());
    }

    #[test]
    fn test_respawn_replaces_goal_after_scan() {
        let mut s = session_at(Vec2::ZERO);
        s.respawn_goals = true;
        s.remove_completed = true;
        s.add_goal(Vec2::ZERO, 10.0, 50);

        let contacts = resolve_contacts(&mut s);
        assert_eq!(contacts.len(), 1);
        assert_eq!(s.targets.len(), 1);
        assert!(!s.targets[0].completed);
        assert_eq!(s.remaining_objectives(), 1);
        assert!(
            s.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::TargetSpawned { .. }))
        );
    }

    #[test]
    fn test_scan_level_ignores_touch_on_goals_and_decoys() {
        let mut s = session_at(Vec2::ZERO);
        s.interaction = Interaction::Scan;
        s.add_goal(Vec2::ZERO, 20.0, 100);
        s.add_decoy(Vec2::new(3.0, 0.0), 20.0);
        s.add_hazard(Vec2::new(0.0, 3.0), 20.0, 10);

        let contacts = resolve_contacts(&mut s);
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].kind.is_hazard());
        assert_eq!(s.score, -10);
        assert_eq!(s.remaining_objectives(), 2);
    }

    #[test]
    fn test_far_targets_untouched() {
        let mut s = session_at(Vec2::ZERO);
        s.add_goal(Vec2::new(500.0, 0.0), 10.0, 50);
        assert!(resolve_contacts(&mut s).is_empty());
        assert_eq!(s.score, 0);
    }
}
