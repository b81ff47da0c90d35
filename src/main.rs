//! Panda Run entry point
//!
//! Platform setup (logging, storage backend, seed) around a headless
//! autopilot run. A rendering frontend drives `RunLoop` the same way.

use panda_run::KeyValueStore;
use panda_run::Tuning;
use panda_run::demo;
use panda_run::sim::RunLoop;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Frames in one headless session before giving up (10 minutes at 60 fps)
const MAX_FRAMES: u32 = 60 * 60 * 10;
const FRAME_MS: f32 = 1000.0 / 60.0;

fn play_session(seed: u64, store: Box<dyn KeyValueStore>, tuning: Tuning) {
    let mut run = RunLoop::new(seed, tuning, store);
    log::info!("Run started with seed {} ({})", seed, run.hud_text());

    let summary = demo::play(&mut run, FRAME_MS, MAX_FRAMES);
    if summary.finished {
        log::info!(
            "Run over after {} frames: {}",
            summary.frames,
            run.hud_text()
        );
    } else {
        log::warn!(
            "Frame cap reached with the run still going: {}",
            run.hud_text()
        );
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use panda_run::persistence::LocalStore;

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
    }

    log::info!("Panda Run starting...");
    let store = LocalStore::new();
    let tuning = Tuning::load(&store);
    let seed = js_sys::Date::now() as u64;
    play_session(seed, Box::new(store), tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use panda_run::persistence::FileStore;

    env_logger::init();
    log::info!("Panda Run (native) starting...");

    let seed = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Ignoring invalid seed argument: {}", e);
            rand::random()
        }
        None => rand::random(),
    };

    let path = std::env::var_os("PANDA_RUN_STORE")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("panda_run.json"));
    log::info!("Storage: {}", path.display());

    let store = FileStore::new(path);
    let tuning = Tuning::load(&store);
    play_session(seed, Box::new(store), tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
