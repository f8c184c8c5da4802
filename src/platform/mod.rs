//! Platform abstraction layer
//!
//! Turns wall-clock frame timestamps into fixed simulation steps and, on the
//! web, binds the session to JavaScript and `window.localStorage`.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{FRAME_MS, MAX_SUBSTEPS};
use crate::sim::{GamePhase, GameSession, TickInput};

/// Longest wall-clock gap a single frame may feed into the simulation
const MAX_FRAME_GAP_MS: f32 = 250.0;

/// Fixed-step accumulator driven by frame timestamps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    accumulator: f32,
    cancelled: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp; returns how many fixed steps to run
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        if self.cancelled {
            return 0;
        }
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last).max(0.0) as f32).min(MAX_FRAME_GAP_MS),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= FRAME_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_MS;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Too far behind; drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }
        steps
    }

    /// Forget accumulated time (game not running). The next frame starts fresh.
    pub fn suspend(&mut self) {
        self.last_ms = None;
        self.accumulator = 0.0;
    }

    /// Stop for good; every later frame yields zero steps
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.suspend();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Run one rendered frame: tick the session once per fixed step.
///
/// One-shot inputs (jump, shoot, ability, pause) are consumed by the first
/// step; `idle_mode` stays as set. Returns the number of steps run.
pub fn run_frame(
    session: &mut GameSession,
    clock: &mut FrameClock,
    input: &mut TickInput,
    now_ms: f64,
) -> u32 {
    let steps = clock.advance(now_ms);
    for _ in 0..steps {
        session.tick(input, FRAME_MS);
        input.jump = false;
        input.shoot = false;
        input.ability = false;
        input.pause = false;
    }

    // A pause toggle must reach the session even when no step is due
    if input.pause {
        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        session.tick(&toggle, 0.0);
        input.pause = false;
    }

    if session.phase() != GamePhase::Playing {
        clock.suspend();
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1_000.0), 0);
        assert_eq!(clock.advance(1_000.0 + FRAME_MS as f64 + 0.1), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        // 10 frames worth of time, but only 8 substeps allowed
        let steps = clock.advance(10.0 * FRAME_MS as f64 + 0.5);
        assert_eq!(steps, MAX_SUBSTEPS);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        // A 5 second stall runs at most one capped batch
        assert_eq!(clock.advance(5_000.0), MAX_SUBSTEPS);
        assert_eq!(clock.advance(5_000.0), 0);
    }

    #[test]
    fn test_suspend_drops_backlog() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.advance(10.0);
        clock.suspend();
        assert_eq!(clock.advance(20_000.0), 0);
        assert_eq!(clock.advance(20_000.0 + FRAME_MS as f64 + 0.1), 1);
    }

    #[test]
    fn test_cancel_is_permanent() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.cancel();
        assert!(clock.is_cancelled());
        assert_eq!(clock.advance(1_000.0), 0);
        assert_eq!(clock.advance(2_000.0), 0);
    }

    #[test]
    fn test_run_frame_consumes_one_shots() {
        let mut session = GameSession::with_seed(1);
        session.start_game();
        let mut clock = FrameClock::new();
        let mut input = TickInput {
            jump: true,
            ..Default::default()
        };

        run_frame(&mut session, &mut clock, &mut input, 0.0);
        assert!(input.jump);
        let steps = run_frame(&mut session, &mut clock, &mut input, 3.5 * FRAME_MS as f64);
        assert_eq!(steps, 3);
        assert!(!input.jump);
        assert!(session.player().is_airborne());
    }

    #[test]
    fn test_pause_toggle_without_due_step() {
        let mut session = GameSession::with_seed(1);
        session.start_game();
        let mut clock = FrameClock::new();
        let mut input = TickInput {
            pause: true,
            ..Default::default()
        };
        run_frame(&mut session, &mut clock, &mut input, 0.0);
        assert_eq!(session.phase(), GamePhase::Paused);
        assert!(!input.pause);

        // Paused time never reaches the simulation
        run_frame(&mut session, &mut clock, &mut input, 60_000.0);
        assert_eq!(session.clock_ms(), 0.0);
    }
}
