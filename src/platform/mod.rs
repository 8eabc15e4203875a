//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backend (env_logger natively, browser console on wasm32)
//! - The JavaScript-facing game handle (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the logger for the current platform. Call once from the host.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the logger for the current platform. Call once from the host.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
