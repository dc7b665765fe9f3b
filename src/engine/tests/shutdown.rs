//! Tests for deterministic engine termination.

use super::harness::setup_engine;
use crate::{
    config::Config,
    engine::TimerEngine,
    error::Error,
    store::MemoryTimerStore,
};
use std::sync::Arc;
use tokio::time::Duration;

#[tokio::test]
async fn test_shutdown_stops_the_actor() {
    let mut harness = setup_engine().await;
    let id = harness
        .engine
        .create("bread".to_string(), Duration::from_secs(60))
        .await
        .unwrap();
    harness.engine.start(id).await.unwrap();

    harness.engine.shutdown().await.unwrap();

    // The completion stream ends once the actor is gone.
    let err = harness.completions.recv().await.unwrap_err();
    assert!(matches!(err, Error::ChannelClosed));

    // Subsequent commands observe the closed channel instead of hanging.
    let err = harness.engine.start(id).await.unwrap_err();
    assert!(matches!(err, Error::ChannelClosed));
}

#[tokio::test]
async fn test_dropping_every_handle_stops_the_actor() {
    tokio::time::pause();
    let store = Arc::new(MemoryTimerStore::new());
    let (engine, mut events) = TimerEngine::spawn(store, Config::default()).await.unwrap();

    engine
        .create("broth".to_string(), Duration::from_secs(60))
        .await
        .unwrap();
    drop(engine);

    // With the last handle gone, the loop exits rather than ticking forever.
    let err = events.completions.recv().await.unwrap_err();
    assert!(matches!(err, Error::ChannelClosed));
}
