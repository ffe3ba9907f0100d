//! 時刻ソース
//!
//! freshness判定とキャッシュ期限判定はどちらも「UNIXエポック秒（f64）」で行う。
//! テストでは`ManualClock`を注入して時刻を固定する。

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 現在時刻を返すソース
pub trait Clock: Send + Sync {
    /// UNIXエポックからの秒数
    fn now(&self) -> f64;
}

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// 手動で進める時計（テスト用）
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    /// 指定時刻で作成
    pub fn new(now: f64) -> Self {
        Self {
            bits: AtomicU64::new(now.to_bits()),
        }
    }

    /// 時刻を設定
    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    /// 時刻を進める
    pub fn advance(&self, secs: f64) {
        self.set(self.now() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
