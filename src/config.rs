//! 定义了引擎的可配置参数。
//! Defines configurable parameters for the engine.

use std::time::Duration;

/// A structure containing all configurable parameters for the timer engine.
///
/// 包含定时器引擎所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// The cadence of the reconciliation loop. Remaining time is computed
    /// from each timer's anchor timestamp, so the cadence only affects how
    /// often snapshots are published and zero-crossings are observed, never
    /// the accuracy of the accounting.
    ///
    /// 对账循环的节拍。剩余时间由每个定时器的锚点时间戳计算得出，
    /// 因此节拍只影响快照发布和零点穿越被观测的频率，从不影响计时的准确性。
    pub tick_interval: Duration,

    /// The maximum time a single store operation may block the engine task.
    /// A store call that exceeds this is treated as a store failure.
    ///
    /// 单次存储操作可阻塞引擎任务的最长时间。超过该时间的存储调用被视为存储失败。
    pub store_timeout: Duration,

    /// The capacity of the command channel between handles and the engine task.
    /// 句柄与引擎任务之间命令通道的容量。
    pub command_channel_capacity: usize,

    /// The capacity of the completion event channel. The engine never blocks
    /// on a slow completion consumer; events beyond this capacity are dropped.
    ///
    /// 完成事件通道的容量。引擎从不因完成事件消费者的缓慢而阻塞；
    /// 超出该容量的事件会被丢弃。
    pub completion_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            store_timeout: Duration::from_secs(5),
            command_channel_capacity: 128,
            completion_channel_capacity: 64,
        }
    }
}
