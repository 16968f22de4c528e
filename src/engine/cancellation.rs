// ==========================================
// 课程排课系统 - 排课取消信号
// ==========================================
// 在每个持久化 await 边界检查; 已写入记录不回滚
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 复位（新一轮排课开始前调用）
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
