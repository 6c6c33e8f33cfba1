//! Browser binding for the headless interface
//!
//! The host page owns the canvas and the timers. It calls `on_pointer_move`
//! from its pointer handler, `tick` from `requestAnimationFrame`, and renders
//! whatever `state_json` returns.

use wasm_bindgen::prelude::*;

use crate::error::SimError;
use crate::highscores::HighScores;
use crate::levels::LevelCatalog;
use crate::report::{RunSummary, SessionReport};
use crate::settings::Settings;
use crate::sim::{GameEvent, Session, SessionPhase, TickInput, tick};

fn local_storage() -> Result<web_sys::Storage, SimError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| SimError::unavailable("LocalStorage", "not available"))
}

/// Read a LocalStorage entry
pub fn read_storage(key: &str) -> Result<String, SimError> {
    local_storage()?
        .get_item(key)
        .map_err(|e| SimError::unavailable(key, format!("{e:?}")))?
        .ok_or_else(|| SimError::unavailable(key, "not stored"))
}

/// Write a LocalStorage entry
pub fn write_storage(key: &str, value: &str) -> Result<(), SimError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|e| SimError::unavailable(key, format!("{e:?}")))
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Scalpel Rush starting...");
}

/// One game run exposed to JS
#[wasm_bindgen]
pub struct WebSession {
    catalog: LevelCatalog,
    settings: Settings,
    session: Session,
    input: TickInput,
    run: RunSummary,
    high_scores: HighScores,
}

#[wasm_bindgen]
impl WebSession {
    /// Create a run. `levels_json` may be empty to use the built-in levels.
    #[wasm_bindgen(constructor)]
    pub fn new(levels_json: Option<String>) -> WebSession {
        let catalog = LevelCatalog::load_or_default(levels_json.as_deref());
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let session = catalog
            .session(0, seed, &settings)
            .unwrap_or_else(|e| {
                log::warn!("{e}, falling back to built-in levels");
                LevelCatalog::builtin()
                    .levels[0]
                    .build_session(0, seed, &settings)
            });
        log::info!("Game initialized with seed: {}", seed);

        let run = RunSummary::new(catalog.len());
        WebSession {
            run,
            catalog,
            settings,
            session,
            input: TickInput::default(),
            high_scores: HighScores::load(),
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.session.on_pointer_move(x, y);
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn toggle_assist(&mut self) {
        self.input.toggle_assist = true;
    }

    /// Scan click at the instrument tip, applied on the next tick
    pub fn click(&mut self) {
        self.input.click = true;
    }

    /// Advance by `dt` seconds; returns the events of this tick as JSON
    pub fn tick(&mut self, dt: f32) -> String {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.session, &input, dt);

        let events = self.session.drain_events();
        // Each level ends once; the board only sees the run as a whole
        if events.contains(&GameEvent::SessionEnded)
            && self
                .run
                .finish_level(SessionReport::from_session(&self.session))
            && self
                .high_scores
                .record_run(&self.run, js_sys::Date::now())
                .is_some()
        {
            self.high_scores.save();
        }
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Move to the next level once the current one has ended, keeping the
    /// score. Returns false while the level is still running and once the
    /// run is over (a level was failed or the last one is done).
    pub fn next_level(&mut self) -> bool {
        if self.session.phase != SessionPhase::Ended || self.run.is_over() {
            return false;
        }
        match self.catalog.next_session(&self.session, &self.settings) {
            Ok(next) => {
                self.session = next;
                true
            }
            Err(e) => {
                log::info!("{e}");
                false
            }
        }
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.session.get_state()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn report_json(&self) -> String {
        serde_json::to_string(&SessionReport::from_session(&self.session))
            .unwrap_or_else(|_| "{}".to_string())
    }

    pub fn run_json(&self) -> String {
        serde_json::to_string(&self.run).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.high_scores).unwrap_or_else(|_| "{}".to_string())
    }
}
