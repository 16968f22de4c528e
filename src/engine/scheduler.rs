// ==========================================
// 课程排课系统 - 排课驱动器
// ==========================================
// 主流程:
// 1) 前置校验: 有请求但无教室 → 拒绝（不删除任何记录）
// 2) 清空全部旧落位（全量替换，非增量）
// 3) 按接收顺序逐个请求随机探测, 最多 100 次
// 4) 首个通过校验的 (day, slot) 立即提交, 不回溯
// 5) 探测耗尽 → 记入未排入列表（warn），继续下一个请求
// ==========================================
// 红线: 单次排课串行执行, 持久化调用按程序顺序 await
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::catalog::Room;
use crate::domain::timetable::{
    AssignmentRequest, GenerationSummary, PlacementRecord, RejectionTally, UnplacedRequest,
};
use crate::domain::types::MAX_PROBE_ATTEMPTS;
use crate::engine::cancellation::CancellationFlag;
use crate::engine::committer::PlacementCommitter;
use crate::engine::constraint::ConstraintChecker;
use crate::engine::error::{SchedulerError, SchedulerResult};
use crate::engine::probe::{ProbeSource, RandomProbeSource};
use crate::engine::room_selector::{selector_for, FirstRoomSelector, RoomSelector};
use crate::engine::state::SchedulingState;
use crate::engine::store::PlacementStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 未找到合适教室时的原因文本
pub const REASON_NO_SUITABLE_ROOM: &str = "NO_SUITABLE_ROOM";

/// 探测次数耗尽时的原因文本
pub const REASON_PROBES_EXHAUSTED: &str = "PROBES_EXHAUSTED";

// ==========================================
// TimetableScheduler - 排课驱动器
// ==========================================
pub struct TimetableScheduler {
    committer: PlacementCommitter,
    checker: ConstraintChecker,
    room_selector: Box<dyn RoomSelector>,
    cancel: CancellationFlag,
    random_seed: Option<u64>,
}

/// 单个请求的探测结果
enum ProbeOutcome {
    Placed(PlacementRecord, u32),
    Exhausted(u32, RejectionTally),
}

impl TimetableScheduler {
    /// 默认规则集 + 第一间教室策略
    pub fn new(store: Arc<dyn PlacementStore>) -> Self {
        Self {
            committer: PlacementCommitter::new(store),
            checker: ConstraintChecker::new(),
            room_selector: Box::new(FirstRoomSelector),
            cancel: CancellationFlag::new(),
            random_seed: None,
        }
    }

    /// 按配置快照构造
    pub fn from_config(store: Arc<dyn PlacementStore>, config: &SchedulerConfig) -> Self {
        Self {
            committer: PlacementCommitter::new(store),
            checker: ConstraintChecker::new()
                .with_faculty_slot_exclusive(config.faculty_slot_exclusive),
            room_selector: selector_for(config.room_strategy),
            cancel: CancellationFlag::new(),
            random_seed: config.random_seed,
        }
    }

    pub fn with_room_selector(mut self, selector: Box<dyn RoomSelector>) -> Self {
        self.room_selector = selector;
        self
    }

    /// 共享外部取消信号
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// 使用随机探测执行一次完整排课
    pub async fn generate(
        &self,
        requests: &[AssignmentRequest],
        rooms: &[Room],
    ) -> SchedulerResult<GenerationSummary> {
        let mut probes = RandomProbeSource::from_seed(self.random_seed);
        self.generate_with(requests, rooms, &mut probes).await
    }

    /// 使用指定探测来源执行一次完整排课
    #[instrument(skip_all, fields(
        requests = requests.len(),
        rooms = rooms.len(),
        room_strategy = self.room_selector.name(),
        faculty_slot_exclusive = self.checker.faculty_slot_exclusive()
    ))]
    pub async fn generate_with(
        &self,
        requests: &[AssignmentRequest],
        rooms: &[Room],
        probes: &mut dyn ProbeSource,
    ) -> SchedulerResult<GenerationSummary> {
        // 1) 前置校验
        if !requests.is_empty() && rooms.is_empty() {
            return Err(SchedulerError::EmptyRoomInventory {
                request_count: requests.len(),
            });
        }

        let pass_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();

        // 2) 清空旧落位
        self.ensure_not_cancelled(0)?;
        let cleared = self.committer.store().clear_all().await?;
        info!(pass_id = %pass_id, cleared, "开始排课: 已清空旧课表");

        // 3) 逐个请求探测
        let mut state = SchedulingState::new();
        let mut placed = Vec::new();
        let mut unplaced = Vec::new();
        let mut total_probes: u64 = 0;

        for request in requests {
            let Some(room) = self.room_selector.select(request, rooms) else {
                warn!(
                    request_id = request.id,
                    subject = %request.subject_name,
                    batch = %request.batch_name,
                    "无法排课: 没有合适教室"
                );
                unplaced.push(Self::unplaced(
                    request,
                    0,
                    REASON_NO_SUITABLE_ROOM,
                    RejectionTally::default(),
                ));
                continue;
            };

            match self
                .probe_request(request, room, &mut state, probes, placed.len())
                .await?
            {
                ProbeOutcome::Placed(record, attempts) => {
                    total_probes += u64::from(attempts);
                    placed.push(record);
                    // 每次落位后让出执行权
                    tokio::task::yield_now().await;
                }
                ProbeOutcome::Exhausted(attempts, tally) => {
                    total_probes += u64::from(attempts);
                    warn!(
                        request_id = request.id,
                        subject = %request.subject_name,
                        batch = %request.batch_name,
                        attempts,
                        batch_daily_cap = tally.batch_daily_cap,
                        faculty_rest = tally.faculty_rest,
                        faculty_slot_taken = tally.faculty_slot_taken,
                        batch_slot_taken = tally.batch_slot_taken,
                        lab_contiguity = tally.lab_contiguity,
                        "无法排课: 探测次数耗尽"
                    );
                    unplaced.push(Self::unplaced(
                        request,
                        attempts,
                        REASON_PROBES_EXHAUSTED,
                        tally,
                    ));
                }
            }
        }

        let summary = GenerationSummary {
            pass_id,
            started_at,
            finished_at: Utc::now(),
            requests_attempted: requests.len(),
            placed,
            unplaced,
            total_probes,
        };

        info!(
            pass_id = %summary.pass_id,
            placed = summary.placed_count(),
            unplaced = summary.unplaced_count(),
            total_probes = summary.total_probes,
            "排课完成"
        );

        Ok(summary)
    }

    /// 单个请求的探测循环
    async fn probe_request(
        &self,
        request: &AssignmentRequest,
        room: &Room,
        state: &mut SchedulingState,
        probes: &mut dyn ProbeSource,
        placed_so_far: usize,
    ) -> SchedulerResult<ProbeOutcome> {
        let mut tally = RejectionTally::default();
        let mut attempts = 0;

        while attempts < MAX_PROBE_ATTEMPTS {
            attempts += 1;
            let (day, slot) = probes.next_probe();

            match self.checker.check(request, day, slot, state) {
                Ok(()) => {
                    self.ensure_not_cancelled(placed_so_far)?;
                    let record = self.committer.commit(request, day, slot, room, state).await?;
                    return Ok(ProbeOutcome::Placed(record, attempts));
                }
                Err(reason) => tally.record(reason),
            }
        }

        Ok(ProbeOutcome::Exhausted(attempts, tally))
    }

    fn ensure_not_cancelled(&self, placed_so_far: usize) -> SchedulerResult<()> {
        if self.cancel.is_cancelled() {
            warn!(placed_so_far, "排课被取消");
            return Err(SchedulerError::Cancelled { placed_so_far });
        }
        Ok(())
    }

    fn unplaced(
        request: &AssignmentRequest,
        attempts: u32,
        reason: &str,
        rejections: RejectionTally,
    ) -> UnplacedRequest {
        UnplacedRequest {
            request_id: request.id,
            subject_id: request.subject_id,
            batch_id: request.batch_id,
            faculty_id: request.faculty_id,
            subject_name: request.subject_name.clone(),
            batch_name: request.batch_name.clone(),
            attempts,
            reason: reason.to_string(),
            rejections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timetable::NewPlacement;
    use crate::domain::types::{Day, RoomKind, SlotNumber, SubjectKind};
    use crate::engine::room_selector::KindAwareRoomSelector;
    use crate::engine::store::InMemoryPlacementStore;
    use crate::repository::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==========================================
    // 测试数据准备
    // ==========================================

    /// 按脚本返回探测, 脚本用尽后重复最后一项
    struct ScriptedProbes {
        script: VecDeque<(Day, SlotNumber)>,
        last: (Day, SlotNumber),
        drawn: u32,
    }

    impl ScriptedProbes {
        fn new(script: &[(Day, SlotNumber)]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                last: *script.last().unwrap(),
                drawn: 0,
            }
        }
    }

    impl ProbeSource for ScriptedProbes {
        fn next_probe(&mut self) -> (Day, SlotNumber) {
            self.drawn += 1;
            if let Some(p) = self.script.pop_front() {
                self.last = p;
            }
            self.last
        }
    }

    /// 写入第 N 次时失败的存储
    struct FailingStore {
        inner: InMemoryPlacementStore,
        fail_on_insert: usize,
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl PlacementStore for FailingStore {
        async fn clear_all(&self) -> RepositoryResult<usize> {
            self.inner.clear_all().await
        }

        async fn insert(&self, placement: &NewPlacement) -> RepositoryResult<PlacementRecord> {
            let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_on_insert {
                return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
            }
            self.inner.insert(placement).await
        }
    }

    fn request(id: i64, batch_id: i64, faculty_id: i64, kind: SubjectKind) -> AssignmentRequest {
        AssignmentRequest {
            id,
            subject_id: id,
            batch_id,
            faculty_id,
            subject_kind: kind,
            subject_credits: 3,
            subject_name: format!("Subject-{}", id),
            batch_name: format!("Batch-{}", batch_id),
            faculty_name: format!("Faculty-{}", faculty_id),
            batch_student_count: 40,
        }
    }

    fn rooms() -> Vec<Room> {
        vec![
            Room {
                id: 11,
                name: "LH-1".to_string(),
                capacity: 60,
                kind: RoomKind::Theory,
                building: None,
            },
            Room {
                id: 12,
                name: "LAB-1".to_string(),
                capacity: 60,
                kind: RoomKind::Lab,
                building: None,
            },
        ]
    }

    // ==========================================
    // 测试用例
    // ==========================================

    #[tokio::test]
    async fn test_single_theory_request_is_placed() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone());

        let summary = scheduler
            .generate(&[request(1, 1, 1, SubjectKind::Theory)], &rooms())
            .await
            .unwrap();

        assert!(summary.is_complete());
        assert_eq!(summary.placed.len(), 1);
        let record = &summary.placed[0];
        assert_eq!(record.duration, 1);
        assert_eq!(record.room_id, 11);
        assert!((1..=6).contains(&record.day));
        assert!((1..=6).contains(&record.slot_number));
        assert_eq!(store.records(), summary.placed);
    }

    #[tokio::test]
    async fn test_empty_room_inventory_is_rejected_before_clearing() {
        let store = Arc::new(InMemoryPlacementStore::new());
        store
            .insert(&NewPlacement {
                batch_id: 1,
                subject_id: 1,
                faculty_id: 1,
                room_id: 1,
                day: 1,
                slot_number: 1,
                duration: 1,
            })
            .await
            .unwrap();

        let scheduler = TimetableScheduler::new(store.clone());
        let err = scheduler
            .generate(&[request(1, 1, 1, SubjectKind::Theory)], &[])
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulerError::EmptyRoomInventory { request_count: 1 }));
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_requests_clear_and_succeed() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone());
        scheduler
            .generate(&[request(1, 1, 1, SubjectKind::Theory)], &rooms())
            .await
            .unwrap();

        let summary = scheduler.generate(&[], &[]).await.unwrap();
        assert!(summary.is_complete());
        assert_eq!(summary.requests_attempted, 0);
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_lab_drawn_at_last_slot_exhausts_probes() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone());
        let mut probes = ScriptedProbes::new(&[(3, 6)]);

        let summary = scheduler
            .generate_with(&[request(1, 1, 1, SubjectKind::Lab)], &rooms(), &mut probes)
            .await
            .unwrap();

        assert!(summary.placed.is_empty());
        assert_eq!(summary.unplaced.len(), 1);
        let unplaced = &summary.unplaced[0];
        assert_eq!(unplaced.attempts, MAX_PROBE_ATTEMPTS);
        assert_eq!(unplaced.reason, REASON_PROBES_EXHAUSTED);
        assert_eq!(unplaced.rejections.lab_contiguity, MAX_PROBE_ATTEMPTS);
        assert_eq!(probes.drawn, MAX_PROBE_ATTEMPTS);
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_first_accepted_probe_is_committed() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone());
        let mut probes = ScriptedProbes::new(&[(2, 6), (2, 6), (2, 4)]);

        let summary = scheduler
            .generate_with(&[request(1, 1, 1, SubjectKind::Lab)], &rooms(), &mut probes)
            .await
            .unwrap();

        assert_eq!(summary.placed.len(), 1);
        assert_eq!((summary.placed[0].day, summary.placed[0].slot_number), (2, 4));
        assert_eq!(summary.placed[0].duration, 2);
        assert_eq!(summary.total_probes, 3);
        assert_eq!(probes.drawn, 3);
    }

    #[tokio::test]
    async fn test_requests_are_processed_in_order_without_backtracking() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone());
        // 第一个请求占据 (1,1); 第二个请求同班级被同一格拒绝后落到 (1,3)
        let mut probes = ScriptedProbes::new(&[(1, 1), (1, 1), (1, 3)]);

        let summary = scheduler
            .generate_with(
                &[request(1, 1, 1, SubjectKind::Theory), request(2, 1, 2, SubjectKind::Theory)],
                &rooms(),
                &mut probes,
            )
            .await
            .unwrap();

        let slots: Vec<(i64, u8)> = summary
            .placed
            .iter()
            .map(|r| (r.subject_id, r.slot_number))
            .collect();
        assert_eq!(slots, vec![(1, 1), (2, 3)]);
    }

    #[tokio::test]
    async fn test_persistence_failure_aborts_pass_and_keeps_prior_inserts() {
        let store = Arc::new(FailingStore {
            inner: InMemoryPlacementStore::new(),
            fail_on_insert: 2,
            inserts: AtomicUsize::new(0),
        });
        let scheduler = TimetableScheduler::new(store.clone());
        let requests = vec![
            request(1, 1, 1, SubjectKind::Theory),
            request(2, 2, 2, SubjectKind::Theory),
            request(3, 3, 3, SubjectKind::Theory),
        ];

        let err = scheduler.generate(&requests, &rooms()).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Persistence(_)));
        assert_eq!(store.inner.records().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_pass_stops_before_clearing() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone());
        scheduler.cancellation().cancel();

        let err = scheduler
            .generate(&[request(1, 1, 1, SubjectKind::Theory)], &rooms())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Cancelled { placed_so_far: 0 }));
    }

    #[tokio::test]
    async fn test_kind_aware_selector_reports_missing_room() {
        let store = Arc::new(InMemoryPlacementStore::new());
        let scheduler = TimetableScheduler::new(store.clone())
            .with_room_selector(Box::new(KindAwareRoomSelector));
        let mut big = request(1, 1, 1, SubjectKind::Lab);
        big.batch_student_count = 400;

        let summary = scheduler
            .generate(&[big, request(2, 2, 2, SubjectKind::Lab)], &rooms())
            .await
            .unwrap();

        assert_eq!(summary.unplaced.len(), 1);
        assert_eq!(summary.unplaced[0].reason, REASON_NO_SUITABLE_ROOM);
        assert_eq!(summary.unplaced[0].attempts, 0);
        assert_eq!(summary.placed.len(), 1);
        assert_eq!(summary.placed[0].room_id, 12);
    }

    #[tokio::test]
    async fn test_from_config_seed_is_reproducible() {
        let config = SchedulerConfig {
            random_seed: Some(99),
            ..SchedulerConfig::default()
        };
        let requests: Vec<AssignmentRequest> = (1..=8)
            .map(|i| request(i, (i % 3) + 1, (i % 4) + 1, SubjectKind::Theory))
            .collect();

        let a = TimetableScheduler::from_config(Arc::new(InMemoryPlacementStore::new()), &config)
            .generate(&requests, &rooms())
            .await
            .unwrap();
        let b = TimetableScheduler::from_config(Arc::new(InMemoryPlacementStore::new()), &config)
            .generate(&requests, &rooms())
            .await
            .unwrap();

        let key = |s: &GenerationSummary| -> Vec<(i64, u8, u8)> {
            s.placed.iter().map(|r| (r.subject_id, r.day, r.slot_number)).collect()
        };
        assert_eq!(key(&a), key(&b));
        assert_ne!(a.pass_id, b.pass_id);
    }
}
