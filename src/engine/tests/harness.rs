//! 测试辅助工具
//! Test harness utilities

use crate::{
    config::Config,
    engine::{EngineEvents, TimerEngine},
    error::{Error, Result},
    event::{CompletionListener, Snapshot},
    record::{TimerId, TimerRecord},
    store::{MemoryTimerStore, TimerStore},
};
use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::watch;
use tokio::time::{self, Duration};

/// A harness for driving an engine against a paused virtual clock.
///
/// Commands are issued through `engine`, virtual time is moved with
/// [`advance`], and the store is kept around so tests can assert on what
/// was actually persisted.
pub struct EngineHarness {
    pub engine: TimerEngine,
    pub snapshots: watch::Receiver<Snapshot>,
    pub completions: CompletionListener,
    pub store: Arc<MemoryTimerStore>,
}

impl EngineHarness {
    /// Reads one tracked record back from the engine's mirror.
    pub async fn record(&self, id: TimerId) -> TimerRecord {
        self.engine
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|record| record.id == id)
            .unwrap()
    }

    /// Reads the latest published remaining time for one timer.
    pub fn remaining(&self, id: TimerId) -> Option<Duration> {
        self.snapshots.borrow().get(&id).copied()
    }
}

/// Spawns an engine over a fresh in-memory store, with time paused.
pub async fn setup_engine() -> EngineHarness {
    time::pause();
    let store = Arc::new(MemoryTimerStore::new());
    let (engine, events) = TimerEngine::spawn(store.clone(), Config::default())
        .await
        .unwrap();
    EngineHarness {
        engine,
        snapshots: events.snapshots,
        completions: events.completions,
        store,
    }
}

/// Spawns an engine over a store the test brings itself, with time paused.
/// The caller keeps its own handle on the store to inject failures or
/// inspect persisted state.
pub async fn setup_engine_with_store<S: TimerStore>(store: Arc<S>) -> (TimerEngine, EngineEvents) {
    time::pause();
    TimerEngine::spawn(store, Config::default()).await.unwrap()
}

/// Advances virtual time and lets the actor drain the resulting ticks.
pub async fn advance(duration: Duration) {
    time::advance(duration).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// A store wrapper that can be told to fail or hang its writes, for testing
/// command-failure surfacing and reconciliation retry.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryTimerStore,
    fail_writes: AtomicBool,
    hang_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn hang_writes(&self, hang: bool) {
        self.hang_writes.store(hang, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryTimerStore {
        &self.inner
    }

    async fn gate(&self) -> Result<()> {
        if self.hang_writes.load(Ordering::SeqCst) {
            // Simulates a wedged store; the engine's bounded store calls
            // must cut this off.
            std::future::pending::<()>().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TimerStore for FlakyStore {
    async fn insert(&self, record: TimerRecord) -> Result<()> {
        self.gate().await?;
        self.inner.insert(record).await
    }

    async fn update(&self, record: TimerRecord) -> Result<()> {
        self.gate().await?;
        self.inner.update(record).await
    }

    async fn get_all(&self) -> Result<Vec<TimerRecord>> {
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: TimerId) -> Result<Option<TimerRecord>> {
        self.inner.get_by_id(id).await
    }

    async fn delete(&self, id: TimerId) -> Result<()> {
        self.gate().await?;
        self.inner.delete(id).await
    }

    async fn get_for_recipe(&self, recipe_id: u64) -> Result<Vec<TimerRecord>> {
        self.inner.get_for_recipe(recipe_id).await
    }

    async fn get_for_step(&self, step_id: u64) -> Result<Vec<TimerRecord>> {
        self.inner.get_for_step(step_id).await
    }

    async fn delete_for_recipe(&self, recipe_id: u64) -> Result<()> {
        self.gate().await?;
        self.inner.delete_for_recipe(recipe_id).await
    }
}
