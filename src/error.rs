//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the countdown-timer engine.
/// 倒计时引擎的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// The requested timer id is not known to the engine.
    /// 引擎不认识所请求的定时器ID。
    #[error("timer not found")]
    NotFound,

    /// A timer cannot be created with a zero total duration.
    /// 不能创建总时长为零的定时器。
    #[error("timer duration must be greater than zero")]
    InvalidDuration,

    /// A timer cannot be created with an empty display name.
    /// 不能创建显示名称为空的定时器。
    #[error("timer name must not be empty")]
    InvalidName,

    /// Pause was requested for a timer that is not currently running.
    /// 请求暂停一个当前未在运行的定时器。
    #[error("timer is not running")]
    NotRunning,

    /// Start was requested for a timer that is already running.
    ///
    /// The engine itself treats `start` as idempotent and never returns this
    /// variant; it exists for hosts that enforce a stricter precondition
    /// policy at their own boundary.
    ///
    /// 请求启动一个已在运行的定时器。
    /// 引擎本身将 `start` 视为幂等操作，不会返回该变体；
    /// 它是为在自身边界施加更严格前置条件策略的宿主准备的。
    #[error("timer is already running")]
    AlreadyRunning,

    /// The durable store failed, or timed out, while handling an operation.
    /// 持久存储在处理操作时失败或超时。
    #[error("timer store unavailable: {0}")]
    StoreUnavailable(String),

    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::NotFound => ErrorKind::NotFound.into(),
            Error::InvalidDuration => ErrorKind::InvalidInput.into(),
            Error::InvalidName => ErrorKind::InvalidInput.into(),
            Error::NotRunning => ErrorKind::InvalidInput.into(),
            Error::AlreadyRunning => ErrorKind::InvalidInput.into(),
            Error::StoreUnavailable(msg) => std::io::Error::new(ErrorKind::Other, msg),
            Error::ChannelClosed => ErrorKind::BrokenPipe.into(),
        }
    }
}
