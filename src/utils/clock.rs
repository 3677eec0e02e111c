use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// 时钟抽象：答题计时用，测试里可以手动拨动
#[derive(Debug, Clone, Default)]
pub enum Clock {
    #[default]
    System,
    Manual(Arc<Mutex<DateTime<Utc>>>),
}

impl Clock {
    /// 固定在给定时刻的手动时钟；克隆出来的时钟共享同一时刻
    pub fn manual(at: DateTime<Utc>) -> Self {
        Clock::Manual(Arc::new(Mutex::new(at)))
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Manual(at) => match at.lock() {
                Ok(guard) => *guard,
                Err(poisoned) => *poisoned.into_inner(),
            },
        }
    }

    /// 手动时钟向前拨动；对系统时钟无效
    pub fn advance(&self, delta: Duration) {
        if let Clock::Manual(at) = self {
            if let Ok(mut guard) = at.lock() {
                *guard += delta;
            }
        }
    }
}

/// 从 `start` 到 `now` 经过的毫秒数，时钟回拨时记为 0
pub fn elapsed_ms(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - start).num_milliseconds()).unwrap_or(0)
}
