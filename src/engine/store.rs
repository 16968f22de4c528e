// ==========================================
// 课程排课系统 - 落位持久化接口
// ==========================================
// 职责: 引擎层定义 trait, 仓储层提供实现（依赖倒置）
// 说明: 排课引擎不拼 SQL, 通过此接口清空与写入落位
// ==========================================

use crate::domain::timetable::{NewPlacement, PlacementRecord};
use crate::repository::{RepositoryResult, TimetableRepository};
use async_trait::async_trait;

/// 落位持久化接口
///
/// 调用方必须按程序顺序 await 每次调用
#[async_trait]
pub trait PlacementStore: Send + Sync {
    /// 删除全部已有落位，返回删除条数
    async fn clear_all(&self) -> RepositoryResult<usize>;

    /// 写入一条落位
    async fn insert(&self, placement: &NewPlacement) -> RepositoryResult<PlacementRecord>;
}

#[async_trait]
impl PlacementStore for TimetableRepository {
    async fn clear_all(&self) -> RepositoryResult<usize> {
        self.delete_all()
    }

    async fn insert(&self, placement: &NewPlacement) -> RepositoryResult<PlacementRecord> {
        TimetableRepository::insert(self, placement)
    }
}

// ==========================================
// InMemoryPlacementStore - 内存实现
// ==========================================
// 用于不需要数据库的场景（如单元测试、预演排课）
#[derive(Debug, Default)]
pub struct InMemoryPlacementStore {
    records: std::sync::Mutex<Vec<PlacementRecord>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl InMemoryPlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前全部落位（按写入顺序）
    pub fn records(&self) -> Vec<PlacementRecord> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PlacementStore for InMemoryPlacementStore {
    async fn clear_all(&self) -> RepositoryResult<usize> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| crate::repository::RepositoryError::LockError(e.to_string()))?;
        let n = guard.len();
        guard.clear();
        Ok(n)
    }

    async fn insert(&self, placement: &NewPlacement) -> RepositoryResult<PlacementRecord> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        let record = placement.clone().into_record(id);
        self.records
            .lock()
            .map_err(|e| crate::repository::RepositoryError::LockError(e.to_string()))?
            .push(record.clone());
        Ok(record)
    }
}
