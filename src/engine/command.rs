//! Commands used by the engine actor.

use crate::error::Result;
use crate::record::{NotificationConfig, TimerId, TimerRecord};
use std::time::Duration;
use tokio::sync::oneshot;

/// Commands sent to the `EngineActor`.
///
/// This enum encapsulates every operation a handle can perform on the
/// engine. Each variant that produces a result carries a oneshot sender, so
/// callers observe success or failure synchronously while all state changes
/// still happen on the single actor task.
///
/// 发送到 `EngineActor` 的命令。
///
/// 此枚举封装了句柄可对引擎执行的所有操作。每个会产生结果的变体都携带一个
/// oneshot 发送端，调用方同步观察成功或失败，而所有状态变更仍发生在单一 actor 任务上。
#[derive(Debug)]
pub enum EngineCommand {
    /// Create a new timer in the stopped state at full duration.
    /// 创建一个处于完整时长已停止状态的新定时器。
    Create {
        name: String,
        total_duration: Duration,
        linked_recipe_id: Option<u64>,
        linked_step_id: Option<u64>,
        notification: NotificationConfig,
        response_tx: oneshot::Sender<Result<TimerId>>,
    },
    /// Begin (or resume) a timer's countdown. Idempotent while running.
    /// 开始（或恢复）一个定时器的倒计时。运行中时为幂等操作。
    Start {
        id: TimerId,
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Pause a running timer, capturing its remaining time.
    /// 暂停一个运行中的定时器，捕获其剩余时间。
    Pause {
        id: TimerId,
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Return a timer to the stopped state at full duration.
    /// 将一个定时器恢复到完整时长的已停止状态。
    Reset {
        id: TimerId,
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Remove a timer from the store and from in-memory tracking.
    /// 从存储和内存跟踪中移除一个定时器。
    Delete {
        id: TimerId,
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Pause every running timer, persisting each one's remaining time.
    /// 暂停每个运行中的定时器，并持久化各自的剩余时间。
    StopAll {
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Read back the tracked records, newest first.
    /// 读取被跟踪的记录，最新的在前。
    List {
        response_tx: oneshot::Sender<Vec<TimerRecord>>,
    },
    /// Stop the engine task deterministically.
    /// 确定性地停止引擎任务。
    Shutdown,
}
