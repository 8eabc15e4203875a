//! Column entry point
//!
//! Natively this runs a headless auto-play session: a bot reads the track and
//! jumps toward the next pillar until it dies, wins or reaches the jump limit.
//!
//! Usage: `column [settings.json] [seed] [max_jumps]`
//! The high score file defaults to `column_highscore.json`
//! (override with `COLUMN_HIGHSCORE_PATH`).
//!
//! Browser hosts use `column::platform::web::WebGame` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use column::analytics::LogAnalytics;
    use column::persistence::JsonFileStore;
    use column::{Game, GameSettings};

    column::platform::init_logging();
    log::info!("Column (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => GameSettings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);
    let max_jumps: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(40);

    let store_path = std::env::var("COLUMN_HIGHSCORE_PATH")
        .unwrap_or_else(|_| "column_highscore.json".to_string());
    let store = JsonFileStore::new(store_path);
    log::info!("High score file: {}", store.path().display());
    let mut game = match Game::new(
        &settings,
        seed,
        Box::new(store),
        Box::new(LogAnalytics),
    ) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    autoplay(&mut game, max_jumps);

    let score = game.score();
    println!(
        "Finished in phase {:?}: score {}, high score {}",
        game.phase(),
        score.current,
        score.high_score
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> Result<column::GameSettings, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(column::GameSettings::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Drive the game at 30 frames per second, ticking at the fixed sim rate
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(game: &mut column::Game, max_jumps: u32) {
    use column::consts::{MAX_SUBSTEPS, SIM_DT};
    use column::sim::PlayerPhase;

    const FRAME_DT: f32 = 1.0 / 30.0;
    let mut accumulator = 0.0;
    let mut jumps = 0;

    loop {
        match game.phase() {
            PlayerPhase::Won | PlayerPhase::Ended => break,
            PlayerPhase::Idle if jumps >= max_jumps => break,
            PlayerPhase::Idle => {
                game.jump(choose_switch(game));
                jumps += 1;
            }
            PlayerPhase::Jumping | PlayerPhase::Dying => {}
        }

        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            for intent in game.tick(SIM_DT) {
                log::debug!("{:?}", intent);
            }
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

/// Stay on the current side if the next row has a pillar there, otherwise switch
#[cfg(not(target_arch = "wasm32"))]
fn choose_switch(game: &column::Game) -> bool {
    let state = game.state();
    let next = state.player.logical_row + 1;
    state.track.row(next).is_some() && !state.track.occupied(next, state.player.side)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts construct `WebGame` directly; this just satisfies the compiler
}
