//! Scalpel Rush entry point
//!
//! Natively this runs a scripted autopilot through every level and prints the
//! results. The web build is driven from JS through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use glam::Vec2;
    use scalpel_rush::consts::SIM_DT;
    use scalpel_rush::sim::{GameEvent, Interaction, Session, SessionPhase, TickInput, tick};
    use scalpel_rush::{HighScores, LevelCatalog, RunSummary, SessionReport, Settings};

    /// Aim at the nearest incomplete goal (or decoy, when scanning), or hold still
    fn autopilot(session: &Session) -> Option<Vec2> {
        let scanning = session.interaction == Interaction::Scan;
        session
            .targets
            .iter()
            .filter(|t| !t.completed && (t.kind.is_goal() || (scanning && t.kind.is_decoy())))
            .min_by(|a, b| {
                let da = a.pos.distance(session.instrument.pos);
                let db = b.pos.distance(session.instrument.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|t| t.pos)
    }

    /// Play one level to completion, returning its report
    fn play(session: &mut Session) -> SessionReport {
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(session, &start, SIM_DT);

        while session.phase == SessionPhase::Active {
            let cursor = autopilot(session);
            // Scan once the tip has settled on the target
            let click = session.interaction == Interaction::Scan
                && cursor.is_some_and(|c| c.distance(session.instrument.pos) < 1.0);
            let input = TickInput {
                cursor,
                click,
                ..Default::default()
            };
            tick(session, &input, SIM_DT);
            for event in session.drain_events() {
                match event {
                    GameEvent::GoalReached { target_id, points }
                    | GameEvent::Identified { target_id, points } => {
                        log::info!("Goal {target_id} reached (+{points}), score {}", session.score)
                    }
                    GameEvent::HazardContact { target_id, .. } => {
                        log::debug!("Hazard {target_id} brushed, score {}", session.score)
                    }
                    GameEvent::LevelComplete { passed } => {
                        log::info!("Level complete (passed: {passed})")
                    }
                    _ => {}
                }
            }
        }

        SessionReport::from_session(session)
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Scalpel Rush (native autopilot) starting...");

        let mut args = std::env::args().skip(1);
        let settings = args
            .next()
            .map(|p| Settings::load_from_path(Path::new(&p)))
            .unwrap_or_default();
        let levels_json = args.next().and_then(|p| match std::fs::read_to_string(&p) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Cannot read {p}: {e}");
                None
            }
        });
        let catalog = LevelCatalog::load_or_default(levels_json.as_deref());

        let seed = settings.seed.unwrap_or(0x5eed);
        log::info!("Seed: {seed}");

        let mut high_scores = HighScores::new();
        let mut run = RunSummary::new(catalog.len());
        let mut session = match catalog.session(0, seed, &settings) {
            Ok(session) => session,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        loop {
            let report = play(&mut session);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Cannot serialize report: {e}"),
            }
            if run.finish_level(report) {
                break;
            }

            match catalog.next_session(&session, &settings) {
                Ok(next) => session = next,
                Err(e) => {
                    log::warn!("{e}");
                    break;
                }
            }
        }

        log::info!(
            "Run finished: {} points, {} of {} levels cleared",
            run.final_score(),
            run.levels_cleared(),
            catalog.len()
        );
        if let Some(rank) = high_scores.record_run(&run, 0.0) {
            log::info!("Leaderboard rank {rank}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
