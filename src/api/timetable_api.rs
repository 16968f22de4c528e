// ==========================================
// 课程排课系统 - 课表 API
// ==========================================
// 职责: 触发排课 / 取消排课 / 查询课表
// 红线: 同一时刻只允许一次排课（单写者）
// 单写者两层:
// - 进程内: generation_guard (快速路径)
// - 跨进程: generation_lock 表令牌 (共享同一数据库文件)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, SchedulerConfigReader};
use crate::domain::timetable::{GenerationSummary, TimetableEntry, TimetableFilter};
use crate::engine::{audit_placements, CancellationFlag, PlacementStore, TimetableScheduler};
use crate::repository::{
    AssignmentRepository, GenerationLockRepository, RoomRepository, TimetableRepository,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// TimetableApi - 课表 API
// ==========================================
pub struct TimetableApi {
    assignment_repo: Arc<AssignmentRepository>,
    room_repo: Arc<RoomRepository>,
    timetable_repo: Arc<TimetableRepository>,
    config_manager: Arc<ConfigManager>,
    lock_repo: Arc<GenerationLockRepository>,
    generation_guard: AsyncMutex<()>,
    running: AtomicBool,
    cancel: CancellationFlag,
}

impl TimetableApi {
    pub fn new(
        assignment_repo: Arc<AssignmentRepository>,
        room_repo: Arc<RoomRepository>,
        timetable_repo: Arc<TimetableRepository>,
        config_manager: Arc<ConfigManager>,
        lock_repo: Arc<GenerationLockRepository>,
    ) -> Self {
        Self {
            assignment_repo,
            room_repo,
            timetable_repo,
            config_manager,
            lock_repo,
            generation_guard: AsyncMutex::new(()),
            running: AtomicBool::new(false),
            cancel: CancellationFlag::new(),
        }
    }

    /// 立即执行一次完整排课（全量替换旧课表）
    ///
    /// # 返回
    /// - Ok(GenerationSummary): 已排入与未排入的请求
    /// - Err(GenerationInProgress): 本进程或共享同一数据库的其他进程已有排课在进行
    /// - Err(BusinessRuleViolation): 有请求但没有教室
    /// - Err(GenerationCancelled): 排课被取消, 已写入记录保留
    #[instrument(skip(self))]
    pub async fn generate_timetable(&self) -> ApiResult<GenerationSummary> {
        let _guard = self.generation_guard.try_lock().map_err(|_| {
            warn!("已有排课在进行, 拒绝本次触发");
            ApiError::GenerationInProgress
        })?;

        let holder = Uuid::new_v4().to_string();
        if !self.lock_repo.try_acquire(&holder)? {
            warn!("数据库排课令牌被占用, 拒绝本次触发");
            return Err(ApiError::GenerationInProgress);
        }

        self.cancel.reset();
        self.running.store(true, Ordering::SeqCst);
        let result = self.run_pass().await;
        self.running.store(false, Ordering::SeqCst);

        // 任何退出路径都释放令牌
        if let Err(e) = self.lock_repo.release(&holder) {
            error!(holder = %holder, error = %e, "排课令牌释放失败");
        }

        result
    }

    /// 持有单写者令牌后执行的一次完整排课
    async fn run_pass(&self) -> ApiResult<GenerationSummary> {
        let config = self
            .config_manager
            .load_scheduler_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        match self.config_manager.get_config_snapshot() {
            Ok(snapshot) => info!(config = %snapshot, "排课配置快照"),
            Err(e) => warn!(error = %e, "配置快照读取失败"),
        }

        let requests = self.assignment_repo.list_requests()?;
        let rooms = self.room_repo.list_all()?;

        let store: Arc<dyn PlacementStore> = self.timetable_repo.clone();
        let scheduler =
            TimetableScheduler::from_config(store, &config).with_cancellation(self.cancel.clone());
        let summary = scheduler.generate(&requests, &rooms).await?;

        // 落库结果自检
        let records = self.timetable_repo.list_records()?;
        let violations = audit_placements(&records, config.faculty_slot_exclusive);
        for violation in &violations {
            error!(pass_id = %summary.pass_id, violation = %violation, "课表审计发现违规");
        }
        if violations.is_empty() {
            info!(pass_id = %summary.pass_id, records = records.len(), "课表审计通过");
        }

        Ok(summary)
    }

    /// 请求取消正在进行的排课
    ///
    /// 返回 false 表示当前没有排课在进行
    pub fn cancel_generation(&self) -> bool {
        if !self.is_generating() {
            return false;
        }
        self.cancel.cancel();
        info!("已请求取消排课");
        true
    }

    /// 是否有排课在进行
    pub fn is_generating(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 查询课表（按 day, slot 排序）
    pub fn list_timetable(&self, filter: TimetableFilter) -> ApiResult<Vec<TimetableEntry>> {
        match filter {
            TimetableFilter::Batch(id) | TimetableFilter::Faculty(id) if id <= 0 => {
                return Err(ApiError::InvalidInput(format!("无效的ID: {}", id)));
            }
            _ => {}
        }
        Ok(self.timetable_repo.list_entries(filter)?)
    }
}
