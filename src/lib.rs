//! Reflex Cat core crate.
//!
//! A reaction-time minigame: tap when the screen says 今だ!, don't tap when it
//! says 押すな!. The round state machine in [`game`] is plain Rust and runs
//! natively under `cargo test`; [`web`] is the browser front end exported
//! through `start_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod game;
pub mod share;
mod web;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    // Fails only if a logger is already installed, which is fine.
    let _ = console_log::init_with_level(level);
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(config::GameConfig::default())
}

/// Start with settings from a JSON object; missing keys keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = config::GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start(cfg)
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
