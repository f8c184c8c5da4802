//! Browser bindings
//!
//! `WebGame` owns a session, a frame clock and the queued input. JavaScript
//! forwards key presses and `requestAnimationFrame` timestamps, then reads
//! the JSON snapshot to draw.

use wasm_bindgen::prelude::*;

use super::{FrameClock, run_frame};
use crate::error::{Error, Result};
use crate::persistence::Storage;
use crate::profile::Profile;
use crate::sim::{GameSession, TickInput};
use crate::tuning::Tuning;

/// `window.localStorage`
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::Storage("no window".into()))?;
        let inner = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| Error::Storage("localStorage disabled".into()))?;
        Ok(Self { inner })
    }
}

fn js_error(value: JsValue) -> Error {
    Error::Storage(format!("{:?}", value))
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner.remove_item(key).map_err(js_error)
    }
}

/// Install the panic hook and console logger
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Obstacle Jumper starting...");
}

/// The game as seen from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    clock: FrameClock,
    input: TickInput,
    storage: Option<LocalStorage>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let storage = match LocalStorage::open() {
            Ok(storage) => Some(storage),
            Err(e) => {
                log::warn!("Progress will not be saved: {}", e);
                None
            }
        };
        let (profile, tuning) = match &storage {
            Some(storage) => (Profile::load(storage), Tuning::load(storage)),
            None => (Profile::new(), Tuning::default()),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!(
            "Loaded profile: high score {}, {} skins unlocked",
            profile.high_score(),
            profile.unlocked_skins().count()
        );

        WebGame {
            session: GameSession::new(profile, tuning, seed),
            clock: FrameClock::new(),
            input: TickInput::default(),
            storage,
        }
    }

    /// Run the simulation up to `now_ms` (a `requestAnimationFrame` timestamp)
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let steps = run_frame(&mut self.session, &mut self.clock, &mut self.input, now_ms);
        self.persist();
        steps
    }

    /// Stop the frame clock for good (page teardown)
    pub fn shutdown(&mut self) {
        self.clock.cancel();
        self.persist();
    }

    pub fn start_game(&mut self) -> bool {
        let started = self.session.start_game();
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..Default::default()
        };
        started
    }

    pub fn pause_game(&mut self) -> bool {
        let paused = self.session.pause_game();
        self.persist();
        paused
    }

    pub fn resume_game(&mut self) -> bool {
        self.session.resume_game()
    }

    pub fn reset_game(&mut self) -> bool {
        self.session.reset_game()
    }

    /// Queue a jump for the next step
    pub fn jump(&mut self) {
        self.input.jump = true;
    }

    /// Queue a shot for the next step
    pub fn shoot(&mut self) {
        self.input.shoot = true;
    }

    /// Queue the skin ability for the next step
    pub fn use_ability(&mut self) {
        self.input.ability = true;
    }

    /// Queue a pause toggle
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn set_idle_mode(&mut self, enabled: bool) {
        self.input.idle_mode = enabled;
    }

    pub fn set_skin(&mut self, id: &str) -> bool {
        let changed = self.session.set_skin(id);
        self.persist();
        changed
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    pub fn score(&self) -> u64 {
        self.session.score()
    }

    pub fn high_score(&self) -> u64 {
        self.session.high_score()
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    /// Full session state as JSON
    pub fn snapshot(&self) -> std::result::Result<String, JsValue> {
        self.session
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> std::result::Result<String, JsValue> {
        let events = self.session.drain_events();
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebGame {
    fn persist(&mut self) {
        if let Some(storage) = self.storage.as_mut() {
            match self.session.persist(storage) {
                Ok(true) => log::debug!("Profile saved"),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to save profile: {}", e),
            }
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
