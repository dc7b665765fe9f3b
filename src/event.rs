//! Snapshot and completion event types published by the engine.
//! 引擎发布的快照与完成事件类型。

use crate::error::{Error, Result};
use crate::record::{NotificationConfig, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

/// A point-in-time mapping from timer id to remaining duration, covering
/// every timer the engine tracks. Published once per reconciliation tick
/// over a watch channel, so a display consumer always reads the latest
/// complete view and a slow consumer never backs the engine up.
///
/// 某一时刻从定时器ID到剩余时长的映射，覆盖引擎跟踪的每个定时器。
/// 每个对账节拍通过 watch 通道发布一次，显示层消费者总能读到最新的完整视图，
/// 缓慢的消费者也不会让引擎积压。
pub type Snapshot = HashMap<TimerId, Duration>;

/// Emitted exactly once per timer run when the remaining time reaches zero.
/// 当剩余时间到零时，每次运行恰好发出一次。
#[derive(Debug, Clone)]
pub struct CompletionEvent {
    /// The timer whose countdown completed.
    /// 倒计时完成的定时器。
    pub timer_id: TimerId,
    /// The notification payload the completed timer was created with.
    /// 完成的定时器创建时携带的通知载荷。
    pub notification: NotificationConfig,
}

/// The receiving side of the completion event stream.
///
/// There is exactly one listener per engine; the engine guarantees one event
/// per zero-crossing at the source, and handing the stream to a single
/// consumer keeps that guarantee end to end.
///
/// 完成事件流的接收端。
///
/// 每个引擎恰有一个监听器；引擎在源头保证每次零点穿越只产生一个事件，
/// 将事件流交给单一消费者使该保证端到端成立。
#[derive(Debug)]
pub struct CompletionListener {
    pub(crate) completion_rx: mpsc::Receiver<CompletionEvent>,
}

impl CompletionListener {
    /// Waits for the next completion event.
    ///
    /// 等待下一个完成事件。
    pub async fn recv(&mut self) -> Result<CompletionEvent> {
        self.completion_rx.recv().await.ok_or(Error::ChannelClosed)
    }

    /// Returns a pending completion event without waiting, if one is queued.
    /// 如果队列中有待处理的完成事件，则立即返回而不等待。
    pub fn try_recv(&mut self) -> Option<CompletionEvent> {
        self.completion_rx.try_recv().ok()
    }
}
