//! 定时器记录实体及其 运行/暂停/重置 生命周期。
//! The timer record entity and its run/pause/reset lifecycle.

use crate::error::{Error, Result};
use std::time::Duration;
use tokio::time::Instant;


/// Timer ID, uniquely identifies one countdown for its whole lifetime.
/// 定时器ID，在整个生命周期内唯一标识一个倒计时。
pub type TimerId = u64;

/// Completion notification settings. The engine carries this payload
/// opaquely and hands it to the completion consumer untouched.
///
/// 完成通知设置。引擎不解释该载荷，原样交给完成事件的消费者。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Reference to the sound to play when the timer completes.
    /// 定时器完成时播放的声音的引用。
    pub sound: Option<String>,
    /// Whether the consumer should vibrate when the timer completes.
    /// 定时器完成时消费者是否应该震动。
    pub vibration: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            sound: None,
            vibration: true,
        }
    }
}

/// One user-created countdown.
///
/// `total_duration` and `created_at` never change after creation; only
/// `is_running`, `anchor_start` and `remaining_at_pause` move across the
/// run/pause/reset lifecycle. While running the anchor is set; while not
/// running the paused remaining is set.
///
/// 一个由用户创建的倒计时。
///
/// `total_duration` 和 `created_at` 在创建后不再改变；只有 `is_running`、
/// `anchor_start` 和 `remaining_at_pause` 会随 运行/暂停/重置 生命周期变化。
/// 运行时锚点被设置；非运行时暂停剩余值被设置。
#[derive(Debug, Clone)]
pub struct TimerRecord {
    /// Unique identifier, assigned on creation.
    /// 唯一标识符，创建时分配。
    pub id: TimerId,
    /// Display label, non-empty.
    /// 显示名称，非空。
    pub name: String,
    /// Total countdown length. Immutable after creation.
    /// 倒计时总长度。创建后不可变。
    pub total_duration: Duration,
    /// Weak back-reference to a recipe, used only for lookup by the host.
    /// 指向菜谱的弱反向引用，仅供宿主查询使用。
    pub linked_recipe_id: Option<u64>,
    /// Weak back-reference to a recipe step, used only for lookup by the host.
    /// 指向菜谱步骤的弱反向引用，仅供宿主查询使用。
    pub linked_step_id: Option<u64>,
    /// True while the timer is actively counting down.
    /// 定时器正在倒计时时为 true。
    pub is_running: bool,
    /// The instant from which elapsed running time is measured. Set on every
    /// transition into the running state.
    ///
    /// 测量已运行时间的起始时刻。每次进入运行状态时都会被设置。
    pub anchor_start: Option<Instant>,
    /// Remaining time captured when the timer last left the running state
    /// without completing. Also holds the full duration for a timer that has
    /// never been started or was just reset.
    ///
    /// 定时器上次未完成而离开运行状态时捕获的剩余时间。
    /// 对于从未启动或刚被重置的定时器，它持有完整时长。
    pub remaining_at_pause: Option<Duration>,
    /// Opaque completion notification payload.
    /// 不透明的完成通知载荷。
    pub notification: NotificationConfig,
    /// Creation instant. Immutable.
    /// 创建时刻。不可变。
    pub created_at: Instant,
}

impl TimerRecord {
    /// Creates a new stopped record at full duration.
    ///
    /// Fails with [`Error::InvalidDuration`] for a zero duration and with
    /// [`Error::InvalidName`] for an empty (or whitespace-only) name.
    ///
    /// 创建一个处于完整时长的已停止记录。
    /// 时长为零时返回 [`Error::InvalidDuration`]，
    /// 名称为空（或仅含空白）时返回 [`Error::InvalidName`]。
    pub fn new(
        id: TimerId,
        name: String,
        total_duration: Duration,
        linked_recipe_id: Option<u64>,
        linked_step_id: Option<u64>,
        notification: NotificationConfig,
    ) -> Result<Self> {
        if total_duration.is_zero() {
            return Err(Error::InvalidDuration);
        }
        if name.trim().is_empty() {
            return Err(Error::InvalidName);
        }
        Ok(Self {
            id,
            name,
            total_duration,
            linked_recipe_id,
            linked_step_id,
            is_running: false,
            anchor_start: None,
            remaining_at_pause: Some(total_duration),
            notification,
            created_at: Instant::now(),
        })
    }

    /// Computes the remaining time as of `now`.
    ///
    /// For a running timer this is anchored to `anchor_start`, never
    /// decremented tick by tick, so the value self-corrects no matter how
    /// long the caller went without asking. For a non-running timer the
    /// stored paused remaining is returned unchanged.
    ///
    /// 计算截至 `now` 的剩余时间。
    ///
    /// 对运行中的定时器，该值锚定在 `anchor_start` 上，而不是逐拍递减，
    /// 因此无论调用方隔了多久没有询问，结果都会自我修正。
    /// 对非运行中的定时器，原样返回存储的暂停剩余值。
    pub fn remaining(&self, now: Instant) -> Duration {
        match (self.is_running, self.anchor_start) {
            (true, Some(anchor)) => {
                let elapsed = now.saturating_duration_since(anchor);
                self.total_duration.saturating_sub(elapsed)
            }
            _ => self.remaining_at_pause.unwrap_or(self.total_duration),
        }
    }

    /// Transitions into the running state. A no-op if already running.
    ///
    /// The anchor is back-dated by the time already consumed, so a resumed
    /// timer continues from its paused remaining instead of restarting the
    /// full duration.
    ///
    /// 转入运行状态。已在运行则为空操作。
    ///
    /// 锚点会按已消耗的时间向前回拨，因此恢复的定时器从暂停时的剩余值继续，
    /// 而不是重新走完整时长。
    pub fn start(&mut self, now: Instant) {
        if self.is_running {
            return;
        }
        let effective_remaining = self.remaining_at_pause.unwrap_or(self.total_duration);
        let consumed = self.total_duration.saturating_sub(effective_remaining);
        self.anchor_start = Some(now.checked_sub(consumed).unwrap_or(now));
        self.is_running = true;
        self.remaining_at_pause = None;
    }

    /// Leaves the running state, capturing the remaining time as of `now`.
    /// The captured value is clamped to zero for an overrun timer.
    ///
    /// 离开运行状态，捕获截至 `now` 的剩余时间。对已超时的定时器钳制为零。
    pub fn pause(&mut self, now: Instant) {
        let remaining = self.remaining(now);
        self.is_running = false;
        self.anchor_start = None;
        self.remaining_at_pause = Some(remaining);
    }

    /// Returns to the stopped state at full duration, from any state.
    /// 从任意状态回到完整时长的已停止状态。
    pub fn reset(&mut self) {
        self.is_running = false;
        self.anchor_start = None;
        self.remaining_at_pause = Some(self.total_duration);
    }
}
