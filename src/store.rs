//! Traits for abstracting over durable timer storage.
//!
//! The engine is the authority on timer state while the process lives; the
//! store is the authority across process lifetimes. Every state transition
//! the engine applies is persisted through this seam before it is reflected
//! in the engine's in-memory mirror.
//!
//! 用于抽象定时器持久存储的 trait。
//!
//! 进程存活期间引擎是定时器状态的权威；跨进程生命周期时存储是权威。
//! 引擎应用的每个状态转换都会先通过该接口持久化，然后才反映到引擎的内存镜像中。

use crate::error::Result;
use crate::record::{TimerId, TimerRecord};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryTimerStore;

#[cfg(test)]
mod tests;

/// A durable key-value store of timer records.
///
/// Implementations must make `update` atomic per record: a reader never
/// observes a half-written record. I/O failure is reported as
/// [`crate::error::Error::StoreUnavailable`].
///
/// 定时器记录的持久键值存储。
///
/// 实现必须保证 `update` 按记录原子：读取方永远不会观察到写了一半的记录。
/// I/O 失败报告为 [`crate::error::Error::StoreUnavailable`]。
#[async_trait]
pub trait TimerStore: Send + Sync + 'static {
    /// Persists a newly created record.
    /// 持久化一条新创建的记录。
    async fn insert(&self, record: TimerRecord) -> Result<()>;

    /// Replaces the stored state of an existing record. Atomic per record.
    /// 替换一条已存在记录的存储状态。按记录原子。
    async fn update(&self, record: TimerRecord) -> Result<()>;

    /// Returns all persisted records, newest first.
    /// 返回所有已持久化的记录，最新的在前。
    async fn get_all(&self) -> Result<Vec<TimerRecord>>;

    /// Looks up a single record by id.
    /// 按ID查找单条记录。
    async fn get_by_id(&self, id: TimerId) -> Result<Option<TimerRecord>>;

    /// Removes a record. Removing an unknown id is a no-op.
    /// 删除一条记录。删除未知ID是空操作。
    async fn delete(&self, id: TimerId) -> Result<()>;

    /// Returns the records linked to a recipe, for host-side filtering.
    /// 返回关联到某菜谱的记录，供宿主侧过滤使用。
    async fn get_for_recipe(&self, recipe_id: u64) -> Result<Vec<TimerRecord>>;

    /// Returns the records linked to a recipe step, for host-side filtering.
    /// 返回关联到某菜谱步骤的记录，供宿主侧过滤使用。
    async fn get_for_step(&self, step_id: u64) -> Result<Vec<TimerRecord>>;

    /// Removes every record linked to a recipe.
    /// 删除关联到某菜谱的所有记录。
    async fn delete_for_recipe(&self, recipe_id: u64) -> Result<()>;
}
