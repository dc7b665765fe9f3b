//! The implementation of the `EngineActor` and its reconciliation loop.
//!
//! `EngineActor` 及其对账循环的实现。

use super::command::EngineCommand;
use crate::{
    config::Config,
    error::{Error, Result},
    event::{CompletionEvent, Snapshot},
    record::{NotificationConfig, TimerId, TimerRecord},
    store::TimerStore,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// The actor that owns the authoritative in-memory mirror of all timers.
///
/// This actor runs in a dedicated task and processes commands from the
/// public `TimerEngine` handle interleaved with reconciliation ticks. Being
/// the only owner of the mirror, it needs no per-timer locking: a command
/// and a tick can never observe each other half-applied.
///
/// 拥有所有定时器权威内存镜像的 actor。
///
/// 此 actor 在专用任务中运行，交替处理来自公共 `TimerEngine` 句柄的命令与对账节拍。
/// 作为镜像的唯一所有者，它不需要按定时器加锁：命令和节拍永远不会观察到对方的中间状态。
pub(crate) struct EngineActor<S: TimerStore> {
    pub(crate) store: Arc<S>,
    pub(crate) config: Config,
    /// The in-memory mirror. Only updated after a store write succeeds.
    /// 内存镜像。仅在存储写入成功后更新。
    pub(crate) timers: HashMap<TimerId, TimerRecord>,
    /// Records whose latest state could not be persisted during a tick.
    /// Retried on every subsequent tick until the store recovers.
    ///
    /// 在某个节拍中未能持久化最新状态的记录。之后每个节拍重试，直到存储恢复。
    pub(crate) dirty: HashSet<TimerId>,
    pub(crate) command_rx: mpsc::Receiver<EngineCommand>,
    pub(crate) snapshot_tx: watch::Sender<Snapshot>,
    pub(crate) completion_tx: mpsc::Sender<CompletionEvent>,
}

impl<S: TimerStore> EngineActor<S> {
    /// Seeds the in-memory mirror from the store before the loop starts.
    ///
    /// 在循环开始前，用存储内容填充内存镜像。
    pub(crate) async fn hydrate(&mut self) -> Result<()> {
        let records = self.bounded(self.store.get_all()).await?;
        for record in records {
            self.timers.insert(record.id, record);
        }
        info!(timers = self.timers.len(), "Hydrated timer mirror from store");
        Ok(())
    }

    /// Runs the actor's main event loop.
    ///
    /// The loop ends deterministically on a `Shutdown` command or once every
    /// handle has been dropped; there is no implicit cancellation.
    ///
    /// 运行 actor 的主事件循环。
    ///
    /// 循环在收到 `Shutdown` 命令或所有句柄被丢弃后确定性地结束；不存在隐式取消。
    pub(crate) async fn run(&mut self) {
        let mut tick_interval = tokio::time::interval(self.config.tick_interval);
        // Anchored remaining-time computation self-corrects across missed
        // ticks, so there is nothing to catch up on after a stall.
        // 锚定的剩余时间计算会跨越错过的节拍自我修正，停顿后无需补拍。
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(EngineCommand::Shutdown) => {
                            info!("Engine shutdown requested");
                            break;
                        }
                        Some(command) => self.handle_command(command).await,
                        None => {
                            debug!("All engine handles dropped, stopping");
                            break;
                        }
                    }
                }
                _ = tick_interval.tick() => {
                    self.reconcile(Instant::now()).await;
                }
            }
        }
    }

    /// Handles a command sent to the actor.
    ///
    /// 处理发送给 actor 的命令。
    async fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Create {
                name,
                total_duration,
                linked_recipe_id,
                linked_step_id,
                notification,
                response_tx,
            } => {
                let result = self
                    .create_timer(name, total_duration, linked_recipe_id, linked_step_id, notification)
                    .await;
                let _ = response_tx.send(result);
            }
            EngineCommand::Start { id, response_tx } => {
                let _ = response_tx.send(self.start_timer(id).await);
            }
            EngineCommand::Pause { id, response_tx } => {
                let _ = response_tx.send(self.pause_timer(id).await);
            }
            EngineCommand::Reset { id, response_tx } => {
                let _ = response_tx.send(self.reset_timer(id).await);
            }
            EngineCommand::Delete { id, response_tx } => {
                let _ = response_tx.send(self.delete_timer(id).await);
            }
            EngineCommand::StopAll { response_tx } => {
                let _ = response_tx.send(self.stop_all().await);
            }
            EngineCommand::List { response_tx } => {
                let mut records: Vec<TimerRecord> = self.timers.values().cloned().collect();
                records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let _ = response_tx.send(records);
            }
            // Handled by the run loop before dispatch.
            // 在分发之前由运行循环处理。
            EngineCommand::Shutdown => {}
        }
    }

    async fn create_timer(
        &mut self,
        name: String,
        total_duration: Duration,
        linked_recipe_id: Option<u64>,
        linked_step_id: Option<u64>,
        notification: NotificationConfig,
    ) -> Result<TimerId> {
        let mut id: TimerId = rand::random();
        while self.timers.contains_key(&id) {
            id = rand::random();
        }
        let record = TimerRecord::new(
            id,
            name,
            total_duration,
            linked_recipe_id,
            linked_step_id,
            notification,
        )?;

        self.bounded(self.store.insert(record.clone())).await?;
        self.timers.insert(id, record);
        info!(timer_id = id, total_ms = total_duration.as_millis() as u64, "Created timer");
        Ok(id)
    }

    async fn start_timer(&mut self, id: TimerId) -> Result<()> {
        let record = self.timers.get(&id).ok_or(Error::NotFound)?;
        if record.is_running {
            // Start is idempotent for a timer that is already counting down.
            // 对已在倒计时的定时器，start 为幂等操作。
            debug!(timer_id = id, "Start ignored, timer already running");
            return Ok(());
        }

        let mut updated = record.clone();
        updated.start(Instant::now());
        self.bounded(self.store.update(updated.clone())).await?;
        self.timers.insert(id, updated);
        info!(timer_id = id, "Started timer");
        Ok(())
    }

    async fn pause_timer(&mut self, id: TimerId) -> Result<()> {
        let record = self.timers.get(&id).ok_or(Error::NotFound)?;
        if !record.is_running {
            return Err(Error::NotRunning);
        }

        let mut updated = record.clone();
        updated.pause(Instant::now());
        self.bounded(self.store.update(updated.clone())).await?;
        let remaining_ms = updated
            .remaining_at_pause
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;
        self.timers.insert(id, updated);
        info!(timer_id = id, remaining_ms, "Paused timer");
        Ok(())
    }

    async fn reset_timer(&mut self, id: TimerId) -> Result<()> {
        let record = self.timers.get(&id).ok_or(Error::NotFound)?;

        let mut updated = record.clone();
        updated.reset();
        self.bounded(self.store.update(updated.clone())).await?;
        self.timers.insert(id, updated);
        self.dirty.remove(&id);
        info!(timer_id = id, "Reset timer");
        Ok(())
    }

    async fn delete_timer(&mut self, id: TimerId) -> Result<()> {
        if !self.timers.contains_key(&id) {
            return Err(Error::NotFound);
        }

        self.bounded(self.store.delete(id)).await?;
        self.timers.remove(&id);
        // Deleting also abandons any deferred persistence and, because the
        // mirror entry is gone before the next tick, any pending completion.
        // 删除同时放弃所有延迟的持久化，并且由于镜像条目在下个节拍前已消失，
        // 也放弃任何待发的完成事件。
        self.dirty.remove(&id);
        info!(timer_id = id, "Deleted timer");
        Ok(())
    }

    /// Pauses every running timer at the same instant.
    ///
    /// Each timer's remaining time is computed and persisted exactly as an
    /// individual pause would; a store failure for one timer never discards
    /// another timer's progress. The first error is reported after every
    /// timer has been processed.
    ///
    /// 在同一时刻暂停所有运行中的定时器。
    ///
    /// 每个定时器的剩余时间都按单独暂停的方式计算并持久化；某个定时器的存储失败
    /// 永远不会丢弃其他定时器的进度。所有定时器处理完后报告第一个错误。
    async fn stop_all(&mut self) -> Result<()> {
        let now = Instant::now();
        let running: Vec<TimerId> = self
            .timers
            .values()
            .filter(|record| record.is_running)
            .map(|record| record.id)
            .collect();

        let mut first_error = None;
        for id in running {
            let Some(record) = self.timers.get(&id) else {
                continue;
            };
            let mut updated = record.clone();
            updated.pause(now);
            match self.bounded(self.store.update(updated.clone())).await {
                Ok(()) => {
                    self.timers.insert(id, updated);
                }
                Err(err) => {
                    warn!(timer_id = id, error = %err, "Failed to persist pause during stop-all");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        info!("Stopped all running timers");
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// One pass of the reconciliation loop.
    ///
    /// Recomputes every running timer's remaining time from its anchor,
    /// publishes one complete snapshot, then fires and persists any
    /// zero-crossings. A failure for one timer never blocks the others.
    ///
    /// 对账循环的一次遍历。
    ///
    /// 从锚点重新计算每个运行中定时器的剩余时间，发布一份完整快照，
    /// 然后触发并持久化所有零点穿越。单个定时器的失败永远不会阻塞其他定时器。
    pub(crate) async fn reconcile(&mut self, now: Instant) {
        self.retry_dirty().await;

        let mut snapshot = Snapshot::with_capacity(self.timers.len());
        let mut completed = Vec::new();
        for record in self.timers.values() {
            let remaining = record.remaining(now);
            snapshot.insert(record.id, remaining);
            if record.is_running && remaining.is_zero() {
                completed.push(record.id);
            }
        }

        // Latest-value-wins: a slow display consumer only ever reads the
        // newest snapshot, and the send never blocks this loop.
        // 最新值胜出：缓慢的显示层消费者只会读到最新快照，发送也从不阻塞本循环。
        let _ = self.snapshot_tx.send(snapshot);

        for id in completed {
            self.finish_timer(id).await;
        }
    }

    /// Emits the completion event for a zero-crossing and transitions the
    /// timer back to stopped-at-full-duration, as a single step.
    ///
    /// After this returns, the record can no longer be observed running with
    /// zero remaining, so the crossing can never fire twice -- even if
    /// persisting the transition has to be retried on later ticks.
    ///
    /// 为零点穿越发出完成事件，并将定时器转换回完整时长的已停止状态，作为单一步骤。
    ///
    /// 此函数返回后，该记录不可能再被观察到“运行中且剩余为零”，
    /// 因此穿越永远不会触发两次——即使转换的持久化需要在之后的节拍中重试。
    async fn finish_timer(&mut self, id: TimerId) {
        let Some(record) = self.timers.get_mut(&id) else {
            return;
        };
        record.reset();
        let event = CompletionEvent {
            timer_id: id,
            notification: record.notification.clone(),
        };
        let updated = record.clone();

        if let Err(err) = self.completion_tx.try_send(event) {
            warn!(timer_id = id, error = %err, "Completion channel full or closed, dropping event");
        }
        info!(timer_id = id, "Timer completed");

        if let Err(err) = self.bounded(self.store.update(updated)).await {
            warn!(timer_id = id, error = %err, "Failed to persist completion, will retry next tick");
            self.dirty.insert(id);
        }
    }

    /// Retries store writes deferred by earlier tick failures.
    ///
    /// 重试此前节拍失败而被推迟的存储写入。
    async fn retry_dirty(&mut self) {
        if self.dirty.is_empty() {
            return;
        }
        let ids: Vec<TimerId> = self.dirty.iter().copied().collect();
        for id in ids {
            let Some(record) = self.timers.get(&id).cloned() else {
                self.dirty.remove(&id);
                continue;
            };
            match self.bounded(self.store.update(record)).await {
                Ok(()) => {
                    debug!(timer_id = id, "Persisted deferred state");
                    self.dirty.remove(&id);
                }
                Err(err) => {
                    warn!(timer_id = id, error = %err, "Deferred store write failed again");
                }
            }
        }
    }

    /// Bounds a store operation so it can never block the actor forever.
    ///
    /// 为存储操作设置时限，使其永远不会无限期阻塞 actor。
    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.config.store_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(Error::StoreUnavailable("store operation timed out".to_string())),
        }
    }
}
