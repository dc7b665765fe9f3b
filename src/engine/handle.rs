//! The user-facing API of the timer engine.

use super::{actor::EngineActor, command::EngineCommand};
use crate::{
    config::Config,
    error::{Error, Result},
    event::{CompletionListener, Snapshot},
    record::{NotificationConfig, TimerId, TimerRecord},
    store::TimerStore,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

/// The event streams produced by a spawned engine.
///
/// 已启动引擎产生的事件流。
#[derive(Debug)]
pub struct EngineEvents {
    /// The latest remaining-time snapshot, refreshed once per tick.
    /// 最新的剩余时间快照，每个节拍刷新一次。
    pub snapshots: watch::Receiver<Snapshot>,
    /// The completion event stream. One listener per engine.
    /// 完成事件流。每个引擎一个监听器。
    pub completions: CompletionListener,
}

/// A handle to the timer engine actor.
///
/// The handle is cheap to clone; every clone talks to the same actor task
/// over the same command channel, so commands from any number of callers
/// serialize against the reconciliation loop.
///
/// 定时器引擎 actor 的句柄。
///
/// 句柄可廉价克隆；每个克隆都通过同一命令通道与同一 actor 任务通信，
/// 因此任意数量调用方的命令都会与对账循环串行化。
#[derive(Debug, Clone)]
pub struct TimerEngine {
    command_tx: mpsc::Sender<EngineCommand>,
    snapshot_rx: watch::Receiver<Snapshot>,
}

impl TimerEngine {
    /// Creates the engine actor, hydrates it from the store, and spawns its
    /// task. Returns the command handle and the event streams.
    ///
    /// Hydration failure is surfaced here, before the actor starts, so a
    /// host never runs against a mirror it could not seed.
    ///
    /// 创建引擎 actor，从存储中填充它，并启动其任务。返回命令句柄和事件流。
    ///
    /// 填充失败在 actor 启动前于此处暴露，宿主永远不会运行在一个未能填充的镜像之上。
    pub async fn spawn<S: TimerStore>(store: Arc<S>, config: Config) -> Result<(Self, EngineEvents)> {
        let (command_tx, command_rx) = mpsc::channel(config.command_channel_capacity);
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::new());
        let (completion_tx, completion_rx) = mpsc::channel(config.completion_channel_capacity);

        let mut actor = EngineActor {
            store,
            config,
            timers: HashMap::new(),
            dirty: HashSet::new(),
            command_rx,
            snapshot_tx,
            completion_tx,
        };
        actor.hydrate().await?;

        info!("Timer engine actor created and running");
        tokio::spawn(async move {
            actor.run().await;
        });

        let handle = Self {
            command_tx,
            snapshot_rx: snapshot_rx.clone(),
        };
        let events = EngineEvents {
            snapshots: snapshot_rx,
            completions: CompletionListener { completion_rx },
        };
        Ok((handle, events))
    }

    /// Creates a standalone timer with default notification settings.
    ///
    /// 创建一个使用默认通知设置的独立定时器。
    pub async fn create(&self, name: String, total_duration: Duration) -> Result<TimerId> {
        self.create_with(name, total_duration, None, None, NotificationConfig::default())
            .await
    }

    /// Creates a timer derived from a recipe step's suggested duration.
    ///
    /// 创建一个由菜谱步骤建议时长派生的定时器。
    pub async fn create_for_step(
        &self,
        name: String,
        total_duration: Duration,
        recipe_id: u64,
        step_id: u64,
    ) -> Result<TimerId> {
        self.create_with(
            name,
            total_duration,
            Some(recipe_id),
            Some(step_id),
            NotificationConfig::default(),
        )
        .await
    }

    /// Creates a timer with full control over links and notification payload.
    ///
    /// 创建一个可完全控制关联与通知载荷的定时器。
    pub async fn create_with(
        &self,
        name: String,
        total_duration: Duration,
        linked_recipe_id: Option<u64>,
        linked_step_id: Option<u64>,
        notification: NotificationConfig,
    ) -> Result<TimerId> {
        let (response_tx, response_rx) = oneshot::channel();
        let cmd = EngineCommand::Create {
            name,
            total_duration,
            linked_recipe_id,
            linked_step_id,
            notification,
            response_tx,
        };
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Begins (or resumes) a timer's countdown.
    ///
    /// 开始（或恢复）一个定时器的倒计时。
    pub async fn start(&self, id: TimerId) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Start { id, response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Pauses a running timer, preserving its remaining time.
    ///
    /// 暂停一个运行中的定时器，保留其剩余时间。
    pub async fn pause(&self, id: TimerId) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Pause { id, response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Returns a timer to the stopped state at full duration.
    ///
    /// 将一个定时器恢复到完整时长的已停止状态。
    pub async fn reset(&self, id: TimerId) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Reset { id, response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Deletes a timer, cancelling any pending completion for it.
    ///
    /// 删除一个定时器，并取消其所有待发的完成事件。
    pub async fn delete(&self, id: TimerId) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Delete { id, response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Pauses every running timer without discarding progress.
    ///
    /// 暂停所有运行中的定时器而不丢弃进度。
    pub async fn stop_all(&self) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::StopAll { response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Reads back the tracked records, newest first.
    ///
    /// 读取被跟踪的记录，最新的在前。
    pub async fn list(&self) -> Result<Vec<TimerRecord>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::List { response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Returns an additional snapshot receiver for another display consumer.
    ///
    /// 为另一个显示层消费者返回一个额外的快照接收端。
    pub fn subscribe_snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Stops the engine task deterministically.
    ///
    /// 确定性地停止引擎任务。
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| Error::ChannelClosed)
    }
}
