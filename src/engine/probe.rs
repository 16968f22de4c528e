// ==========================================
// 课程排课系统 - 探测来源
// ==========================================
// 每次探测独立均匀抽取 day ∈ 1..=6, slot ∈ 1..=6（有放回）
// ==========================================

use crate::domain::types::{Day, SlotNumber, DAYS_PER_WEEK, SLOTS_PER_DAY};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 候选 (day, slot) 来源
pub trait ProbeSource: Send {
    fn next_probe(&mut self) -> (Day, SlotNumber);
}

/// 随机探测
pub struct RandomProbeSource<R: Rng + Send> {
    rng: R,
}

impl<R: Rng + Send> RandomProbeSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomProbeSource<StdRng> {
    /// 按配置构造: 有种子时可复现, 否则使用系统熵源
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self::new(rng)
    }
}

impl<R: Rng + Send> ProbeSource for RandomProbeSource<R> {
    fn next_probe(&mut self) -> (Day, SlotNumber) {
        let day = self.rng.random_range(1..=DAYS_PER_WEEK);
        let slot = self.rng.random_range(1..=SLOTS_PER_DAY);
        (day, slot)
    }
}
