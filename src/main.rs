//! Obstacle Jumper entry point
//!
//! On the web the library's `#[wasm_bindgen(start)]` hook does the setup and
//! JavaScript drives `WebGame`. Natively this runs a headless autopilot demo:
//! `obstacle-jumper [seconds] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use obstacle_jumper::consts::FRAME_MS;
    use obstacle_jumper::persistence::MemoryStorage;
    use obstacle_jumper::platform::{FrameClock, run_frame};
    use obstacle_jumper::skins;
    use obstacle_jumper::{GameEvent, GamePhase, GameSession, Profile, TickInput, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Obstacle Jumper (native) starting...");

    let mut args = std::env::args().skip(1);
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);

    let mut storage = MemoryStorage::new();
    let mut session = GameSession::new(Profile::load(&storage), Tuning::load(&storage), seed);
    let mut clock = FrameClock::new();
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    session.start_game();
    let mut runs = 1;
    let mut best_level = 1;
    let frames = seconds as u64 * 60;

    for frame in 0..=frames {
        run_frame(&mut session, &mut clock, &mut input, frame as f64 * FRAME_MS as f64);

        for event in session.drain_events() {
            match event {
                GameEvent::LevelUp { level } => best_level = best_level.max(level),
                GameEvent::GameOver { score, .. } => {
                    log::info!("Run {} ended with {} points", runs, score);
                }
                _ => {}
            }
        }

        if let Err(e) = session.persist(&mut storage) {
            log::warn!("Failed to save profile: {}", e);
        }

        if session.phase() == GamePhase::GameOver {
            runs += 1;
            session.start_game();
        }
    }

    let profile = session.profile();
    println!("\n=== {} simulated seconds, seed {} ===", seconds, seed);
    println!("Runs:          {}", runs);
    println!("High score:    {}", profile.high_score());
    println!("Total score:   {}", profile.total_score());
    println!("Best level:    {}", best_level);
    println!(
        "Skins:         {}",
        profile.unlocked_skins().collect::<Vec<_>>().join(", ")
    );
    match skins::next_unlock(profile.total_score()) {
        Some(skin) => println!("Next skin:     {} at {} points", skin.id, skin.unlock_score),
        None => println!("Next skin:     all unlocked"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
