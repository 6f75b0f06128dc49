// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod catalog;
pub mod celebration;
pub mod config;
pub mod game;
pub mod matcher;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod ui;

/// Tick interval driving time accumulation and delayed transitions
pub const TICK_RATE_MS: u64 = 100;
