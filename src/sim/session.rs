//! Game session state machine
//!
//! The single entry point for mutating game state. Input layers call the
//! command methods; the frame driver calls `tick` once per fixed step; the
//! renderer reads accessors (or the serialized snapshot) afterwards.
//!
//! Phases: `Idle -> Playing <-> Paused`, `Playing -> GameOver -> Idle`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ability::{AbilityKind, AbilityTracker};
use super::collision::{Rect, player_hitbox, projectile_hitbox};
use super::effects::EffectSlot;
use super::obstacles::{ObstacleField, PassContext, Resolution};
use super::player::{JumpOutcome, JumpState, Player};
use super::powerup::{Gun, PowerupKind, Projectile};
use super::progress::Progression;
use super::state::{GameEvent, GamePhase, Modifiers};
use crate::consts::*;
use crate::error::Result;
use crate::persistence::Storage;
use crate::profile::Profile;
use crate::skins::Skin;
use crate::tuning::Tuning;

/// Input commands gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump / double jump (space, up arrow, tap)
    pub jump: bool,
    /// Fire the gun (X / F)
    pub shoot: bool,
    /// Trigger the skin's special ability
    pub ability: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the session plays itself
    pub idle_mode: bool,
}

/// One player's game: the current run plus the persistent profile
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    phase: GamePhase,
    player: Player,
    obstacles: ObstacleField,
    progress: Progression,
    modifiers: Modifiers,
    powerup: EffectSlot<PowerupKind>,
    ability: AbilityTracker,
    /// Simulated time spent in `Playing` this run
    clock_ms: f64,
    /// Time since the last obstacle spawn
    spawn_accum_ms: f32,
    /// Obstacle speed from before slow-time or time warp took hold
    speed_snapshot: Option<f32>,
    profile: Profile,
    seed: u64,
    #[serde(skip)]
    tuning: Tuning,
    #[serde(skip)]
    rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create an idle session
    pub fn new(profile: Profile, tuning: Tuning, seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            player: Player::new(),
            obstacles: ObstacleField::new(),
            progress: Progression::new(&tuning, 0),
            modifiers: Modifiers::default(),
            powerup: EffectSlot::new(),
            ability: AbilityTracker::new(),
            clock_ms: 0.0,
            spawn_accum_ms: 0.0,
            speed_snapshot: None,
            profile,
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Idle session with a fresh profile and default tuning
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Profile::new(), Tuning::default(), seed)
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn score(&self) -> u64 {
        self.progress.score
    }

    pub fn high_score(&self) -> u64 {
        self.profile.high_score()
    }

    pub fn total_score(&self) -> u64 {
        self.profile.total_score()
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    /// Speed for newly spawned obstacles, slow-time and time warp included
    pub fn obstacle_speed(&self) -> f32 {
        self.progress.obstacle_speed
    }

    pub fn spawn_interval_ms(&self) -> u32 {
        self.progress.spawn_interval_ms
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn points_multiplier(&self) -> u64 {
        self.modifiers.points_multiplier
    }

    pub fn active_powerup(&self) -> Option<PowerupKind> {
        self.powerup.current()
    }

    pub fn powerup_remaining_ms(&self) -> Option<f32> {
        self.powerup.remaining_ms()
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.modifiers.gun.projectile()
    }

    pub fn active_ability(&self) -> Option<AbilityKind> {
        self.ability.active()
    }

    /// Cooldown left on the current skin's ability (0 when ready or none)
    pub fn ability_cooldown_ms(&self) -> f32 {
        self.current_skin()
            .ability
            .map(|spec| self.ability.cooldown_remaining(&spec, self.clock_ms))
            .unwrap_or(0.0)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn current_skin(&self) -> &'static Skin {
        self.profile.current_skin()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulated milliseconds of play this run
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Size multiplier the renderer should draw obstacles with
    pub fn obstacle_render_scale(&self) -> f32 {
        if self.modifiers.shrink_obstacles {
            self.tuning.shrink_scale
        } else {
            1.0
        }
    }

    /// Size multiplier used for obstacle hit tests
    pub fn obstacle_hitbox_scale(&self) -> f32 {
        if self.tuning.shrink_affects_hitbox {
            self.obstacle_render_scale()
        } else {
            1.0
        }
    }

    pub fn player_hitbox(&self) -> Rect {
        player_hitbox(self.player.pos, self.modifiers.small_player)
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// JSON snapshot for the renderer
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    // === Phase commands ===

    /// Begin a run. Valid from `Idle` or `GameOver`.
    pub fn start_game(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            return false;
        }
        let bonus = self.current_skin().start_bonus;
        self.reset_run(bonus);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!(
            "Game started (skin '{}', score {})",
            self.current_skin().id,
            bonus
        );
        true
    }

    /// Freeze the run. Valid only while `Playing`.
    pub fn pause_game(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.events.push(GameEvent::Paused);
        log::info!("Paused");
        true
    }

    /// Continue a paused run; timers pick up where they stopped
    pub fn resume_game(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed");
        true
    }

    /// End the run after a collision. Valid only while `Playing`. The final
    /// score stays visible until the next reset or start.
    pub fn end_game(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        let score = self.progress.score;
        let new_high_score = self.profile.record_score(score);
        self.events.push(GameEvent::GameOver {
            score,
            new_high_score,
        });
        log::info!(
            "Game over: score {}, level {}{}",
            score,
            self.progress.level,
            if new_high_score { " (new high score!)" } else { "" }
        );
        true
    }

    /// Back to `Idle` with a clean run. Valid from `Idle` or `GameOver`.
    pub fn reset_game(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            return false;
        }
        self.reset_run(0);
        self.phase = GamePhase::Idle;
        true
    }

    fn reset_run(&mut self, start_score: u64) {
        self.player = Player::new();
        self.obstacles.clear();
        self.progress = Progression::new(&self.tuning, start_score);
        self.modifiers = Modifiers::default();
        self.powerup.clear();
        self.ability = AbilityTracker::new();
        self.clock_ms = 0.0;
        self.spawn_accum_ms = 0.0;
        self.speed_snapshot = None;
    }

    // === Player commands ===

    /// Jump, or double jump while airborne
    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        match self.player.jump(self.modifiers.max_ascents(), &self.tuning) {
            JumpOutcome::Ignored => false,
            JumpOutcome::Jumped => {
                self.events.push(GameEvent::Jumped);
                true
            }
            JumpOutcome::DoubleJumped | JumpOutcome::ExtraJumped => {
                self.events.push(GameEvent::DoubleJumped);
                true
            }
        }
    }

    /// Fire the gun. Needs an active gun and no projectile in flight.
    pub fn shoot(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if !self.modifiers.gun.fire(self.player.pos) {
            return false;
        }
        self.events.push(GameEvent::ShotFired);
        true
    }

    /// Trigger the current skin's special ability
    pub fn use_ability(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(spec) = self.current_skin().ability else {
            return false;
        };
        let scale = self.modifiers.speed_scale();
        match self.ability.activate(&spec, self.clock_ms, &mut self.modifiers) {
            Ok(()) => {
                self.sync_obstacle_speed(scale);
                self.events.push(GameEvent::AbilityUsed(spec.kind));
                log::info!("Ability {} used", spec.kind.as_str());
                true
            }
            Err(refusal) => {
                log::debug!("Ability {} refused: {:?}", spec.kind.as_str(), refusal);
                false
            }
        }
    }

    /// Select a skin. False (and unchanged) if the skin is locked.
    pub fn set_skin(&mut self, id: &str) -> bool {
        self.profile.set_skin(id)
    }

    /// Replace the active power-up (if any) with `kind`. Only while playing.
    pub fn activate_powerup(&mut self, kind: PowerupKind) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let duration = self.tuning.powerup_duration_ms;
        let scale = self.modifiers.speed_scale();
        let (_, replaced) = self.powerup.activate(kind, duration, &mut self.modifiers);
        self.sync_obstacle_speed(scale);
        if let Some(old) = replaced {
            log::debug!("Power-up {} replaced by {}", old.as_str(), kind.as_str());
        }
        self.events.push(GameEvent::PowerupCollected(kind));
        log::info!("Power-up {} active", kind.as_str());
        true
    }

    /// Add one obstacle at the right edge. Called by the spawn clock; exposed
    /// for drivers that schedule spawns themselves.
    pub fn spawn_obstacle(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let allow_powerup = !self.powerup.is_active();
        Some(self.obstacles.spawn(
            &mut self.rng,
            &self.tuning,
            self.progress.level,
            self.progress.obstacle_speed,
            allow_powerup,
        ))
    }

    // === Simulation ===

    /// Apply one tick's input, then advance the simulation by `dt_ms`
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) {
        let input = if input.idle_mode && self.phase == GamePhase::Playing {
            let auto = self.autopilot();
            TickInput {
                jump: input.jump || auto.jump,
                shoot: input.shoot || auto.shoot,
                ..input.clone()
            }
        } else {
            input.clone()
        };

        if input.pause {
            match self.phase {
                GamePhase::Playing => {
                    self.pause_game();
                }
                GamePhase::Paused => {
                    self.resume_game();
                }
                _ => {}
            }
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        if input.jump {
            self.jump();
        }
        if input.shoot {
            self.shoot();
        }
        if input.ability {
            self.use_ability();
        }

        self.advance(dt_ms);
    }

    /// Advance the run by `dt_ms` of simulated time. No-op unless playing.
    pub fn advance(&mut self, dt_ms: f32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.clock_ms += dt_ms as f64;

        // Timed effects
        let scale = self.modifiers.speed_scale();
        if let Some(kind) = self.powerup.tick(dt_ms, &mut self.modifiers) {
            self.events.push(GameEvent::PowerupExpired(kind));
            log::info!("Power-up {} expired", kind.as_str());
        }
        if let Some(kind) = self.ability.tick(dt_ms, &mut self.modifiers) {
            self.events.push(GameEvent::AbilityEnded(kind));
            log::debug!("Ability {} ended", kind.as_str());
        }
        self.sync_obstacle_speed(scale);

        // Dash / teleport scroll the world instead of moving the player
        let shift = std::mem::take(&mut self.modifiers.pending_shift);
        if shift > 0.0 {
            self.obstacles.shift(shift);
        }

        self.player.update(dt_ms, &self.tuning);

        // Spawn clock
        self.spawn_accum_ms += dt_ms;
        loop {
            let interval = self.progress.spawn_interval_ms as f32;
            if self.spawn_accum_ms < interval {
                break;
            }
            self.spawn_accum_ms -= interval;
            self.spawn_obstacle();
        }

        let frames = dt_ms / FRAME_MS;
        self.modifiers
            .gun
            .advance(self.tuning.projectile_speed * frames);

        let ctx = PassContext {
            player: self.player_hitbox(),
            airborne: self.player.is_airborne(),
            magnet: self.modifiers.magnet,
            has_active_powerup: self.powerup.is_active(),
            projectile: self.projectile().map(|p| projectile_hitbox(p.pos)),
            hitbox_scale: self.obstacle_hitbox_scale(),
            frames,
        };
        let report = self.obstacles.advance(&ctx);

        if report.projectile_hit() {
            self.modifiers.gun.clear_projectile();
        }
        // In obstacle order, so a pickup counts for the awards after it
        for resolution in report.resolutions {
            match resolution {
                Resolution::Destroyed(id) => {
                    self.events.push(GameEvent::ObstacleDestroyed { id });
                    self.increase_score();
                }
                Resolution::Passed(id) => {
                    self.events.push(GameEvent::ObstaclePassed { id });
                    self.increase_score();
                }
                Resolution::Pickup { kind, .. } => {
                    self.activate_powerup(kind);
                }
            }
        }

        self.obstacles.cull();

        if self.modifiers.collisions_enabled() {
            let hit = self
                .obstacles
                .first_collision(&self.player_hitbox(), self.obstacle_hitbox_scale());
            if let Some(id) = hit {
                log::debug!("Collided with obstacle {}", id);
                self.end_game();
            }
        }
    }

    /// Carry a change in the slow-time/time-warp scale over to obstacle
    /// speeds. `before` is the scale prior to the change.
    ///
    /// The speed in force when the first slowdown began is kept and put back
    /// once none remain. Level-ups gained meanwhile are lost unless
    /// `Tuning::slowdown_keeps_level_ups` is set.
    fn sync_obstacle_speed(&mut self, before: f32) {
        let after = self.modifiers.speed_scale();
        if after == before {
            return;
        }
        let factor = after / before;
        self.obstacles.scale_speeds(factor);

        if after == 1.0 {
            if let Some(speed) = self.speed_snapshot.take() {
                self.progress.obstacle_speed = if self.tuning.slowdown_keeps_level_ups {
                    self.tuning.speed_for_level(self.progress.level)
                } else {
                    speed
                };
            }
        } else {
            if self.speed_snapshot.is_none() {
                self.speed_snapshot = Some(self.progress.obstacle_speed);
            }
            self.progress.obstacle_speed *= factor;
        }
        log::debug!("Obstacle speed now {}", self.progress.obstacle_speed);
    }

    /// Award points for one obstacle
    fn increase_score(&mut self) {
        let points = BASE_POINTS * self.modifiers.points_multiplier;
        if let Some(level) = self.progress.add_points(points, &self.tuning) {
            self.events.push(GameEvent::LevelUp { level });
        }
        for skin in self.profile.add_points(points) {
            log::info!("Unlocked skin '{}'", skin.id);
            self.events.push(GameEvent::SkinUnlocked { id: skin.id });
        }
    }

    /// Demo input: jump over the nearest threat, shoot when armed
    pub fn autopilot(&self) -> TickInput {
        let mut input = TickInput::default();
        let front = self.player.pos.x + PLAYER_WIDTH;

        let threat = self
            .obstacles
            .iter()
            .filter(|o| !o.destroyed && o.right() > self.player.pos.x)
            .min_by(|a, b| a.x.total_cmp(&b.x));

        if let Some(obstacle) = threat {
            let speed = obstacle.speed.max(1.0);
            let gap = obstacle.x - front;
            input.shoot = self.modifiers.gun == Gun::Ready && gap > 0.0;
            input.jump = match self.player.jump_state {
                JumpState::Grounded => gap >= 0.0 && gap / speed <= 10.0,
                JumpState::Descending => {
                    self.player.can_double_jump
                        && gap < 20.0
                        && self.player.pos.y < obstacle.height + 20.0
                }
                _ => false,
            };
        }
        input
    }

    // === Persistence ===

    /// Save the profile if anything changed. Returns true if it wrote.
    pub fn persist(&mut self, storage: &mut impl Storage) -> Result<bool> {
        if !self.profile.is_dirty() {
            return Ok(false);
        }
        self.profile.save(storage)?;
        Ok(true)
    }
}
