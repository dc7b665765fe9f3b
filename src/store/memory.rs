//! An in-memory timer store backed by a concurrent map.
//! 基于并发映射的内存定时器存储。

use super::TimerStore;
use crate::error::Result;
use crate::record::{TimerId, TimerRecord};
use async_trait::async_trait;
use dashmap::DashMap;

/// A process-local [`TimerStore`] over a [`DashMap`].
///
/// Per-record atomicity comes from the map's entry operations. This is the
/// store used by the test suites and by hosts that do not need durability
/// across restarts; durable hosts bring their own implementation.
///
/// 基于 [`DashMap`] 的进程内 [`TimerStore`]。
///
/// 按记录的原子性来自映射的条目操作。测试套件以及不需要跨重启持久化的宿主
/// 使用该存储；需要持久化的宿主提供自己的实现。
#[derive(Debug, Default)]
pub struct MemoryTimerStore {
    records: DashMap<TimerId, TimerRecord>,
}

impl MemoryTimerStore {
    /// Creates an empty store.
    /// 创建一个空存储。
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    /// 返回已存储记录的数量。
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the store holds no records.
    /// 返回存储是否为空。
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TimerStore for MemoryTimerStore {
    async fn insert(&self, record: TimerRecord) -> Result<()> {
        self.records.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, record: TimerRecord) -> Result<()> {
        // `DashMap::insert` replaces the whole value under the shard lock,
        // which gives the per-record atomicity the trait requires.
        // `DashMap::insert` 在分片锁下整体替换值，满足 trait 要求的按记录原子性。
        self.records.insert(record.id, record);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<TimerRecord>> {
        let mut records: Vec<TimerRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn get_by_id(&self, id: TimerId) -> Result<Option<TimerRecord>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: TimerId) -> Result<()> {
        self.records.remove(&id);
        Ok(())
    }

    async fn get_for_recipe(&self, recipe_id: u64) -> Result<Vec<TimerRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().linked_recipe_id == Some(recipe_id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get_for_step(&self, step_id: u64) -> Result<Vec<TimerRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().linked_step_id == Some(step_id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn delete_for_recipe(&self, recipe_id: u64) -> Result<()> {
        self.records
            .retain(|_, record| record.linked_recipe_id != Some(recipe_id));
        Ok(())
    }
}
