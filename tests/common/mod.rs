//! Shared helpers for the integration tests.

use galley_timer::{
    config::Config,
    engine::{EngineEvents, TimerEngine},
    store::MemoryTimerStore,
};
use std::sync::{Arc, Once};
use std::time::Duration;

/// Helper to initialize tracing for tests.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

/// A tick cadence short enough for real-time integration tests.
pub fn fast_config() -> Config {
    Config {
        tick_interval: Duration::from_millis(20),
        ..Config::default()
    }
}

/// Spawns an engine over a fresh in-memory store with the fast cadence.
pub async fn spawn_engine() -> (Arc<MemoryTimerStore>, TimerEngine, EngineEvents) {
    let store = Arc::new(MemoryTimerStore::new());
    let (engine, events) = TimerEngine::spawn(store.clone(), fast_config())
        .await
        .expect("engine should spawn over an empty store");
    (store, engine, events)
}
