//! Anti-farming diminishing returns.
//!
//! Encounters are counted per (content kind, content id, player level rounded
//! to the nearest 5) inside a rolling window. Old timestamps are pruned
//! lazily on access; there is no background sweep.
//!
//! Penalty bands:
//! - 1-5 encounters: none
//! - 6-10: linear 5% → 15%
//! - 11-20: linear 15% → 35%
//! - 21+: exponential approach toward `max_penalty`

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::constants::{DEFAULT_FARMING_WINDOW_SECS, DEFAULT_MAX_FARMING_PENALTY, FARMING_LEVEL_BUCKET};

/// Monotonic millisecond time source
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock, counted from construction
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// What kind of content an encounter was with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Monster,
    Area,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarmingKey {
    pub kind: ContentKind,
    pub content_id: String,
    pub level_bucket: u32,
}

impl FarmingKey {
    pub fn new(kind: ContentKind, content_id: &str, player_level: u32) -> Self {
        Self {
            kind,
            content_id: content_id.to_string(),
            level_bucket: level_bucket(player_level),
        }
    }
}

/// Player level rounded to the nearest bucket boundary
pub fn level_bucket(player_level: u32) -> u32 {
    let half = FARMING_LEVEL_BUCKET / 2;
    (player_level + half) / FARMING_LEVEL_BUCKET * FARMING_LEVEL_BUCKET
}

/// Encounter timestamps for one key, in recording order. A clock moved
/// backwards can leave them unsorted, so nothing here relies on order.
#[derive(Debug, Default, Clone)]
pub struct FarmingRecord {
    timestamps: Vec<u64>,
}

/// Whether a timestamp is still inside the window ending at `now_ms`
fn in_window(t: u64, now_ms: u64, window_ms: u64) -> bool {
    now_ms < window_ms || t > now_ms - window_ms
}

impl FarmingRecord {
    fn prune(&mut self, now_ms: u64, window_ms: u64) {
        self.timestamps.retain(|t| in_window(*t, now_ms, window_ms));
    }

    fn count_in_window(&self, now_ms: u64, window_ms: u64) -> usize {
        self.timestamps
            .iter()
            .filter(|t| in_window(**t, now_ms, window_ms))
            .count()
    }

    /// Oldest timestamp still counting toward the window
    fn oldest_in_window(&self, now_ms: u64, window_ms: u64) -> Option<u64> {
        self.timestamps
            .iter()
            .copied()
            .filter(|t| in_window(*t, now_ms, window_ms))
            .min()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Tunables for the penalty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmingPolicy {
    pub window_secs: u64,
    pub max_penalty: f64,
    pub free_encounters: usize,
    pub moderate_limit: usize,
    pub heavy_limit: usize,
    pub moderate_range: (f64, f64),
    pub heavy_range: (f64, f64),
    pub decay_rate: f64,
}

impl Default for FarmingPolicy {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_FARMING_WINDOW_SECS,
            max_penalty: DEFAULT_MAX_FARMING_PENALTY,
            free_encounters: 5,
            moderate_limit: 10,
            heavy_limit: 20,
            moderate_range: (0.05, 0.15),
            heavy_range: (0.15, 0.35),
            decay_rate: 0.1,
        }
    }
}

impl FarmingPolicy {
    pub fn window_ms(&self) -> u64 {
        self.window_secs.saturating_mul(1000)
    }

    /// Penalty (0.0 = none) for an encounter count
    pub fn penalty_for_count(&self, count: usize) -> f64 {
        let penalty = match self.band_for_count(count) {
            PenaltyBand::None => 0.0,
            PenaltyBand::Moderate => lerp_band(
                count,
                self.free_encounters + 1,
                self.moderate_limit,
                self.moderate_range,
            ),
            PenaltyBand::Heavy => lerp_band(
                count,
                self.moderate_limit + 1,
                self.heavy_limit,
                self.heavy_range,
            ),
            PenaltyBand::Severe => {
                let excess = (count - self.heavy_limit) as f64;
                let base = self.heavy_range.1;
                base + (1.0 - (-excess * self.decay_rate).exp()) * (self.max_penalty - base)
            }
        };
        penalty.clamp(0.0, self.max_penalty)
    }

    pub fn multiplier_for_count(&self, count: usize) -> f64 {
        1.0 - self.penalty_for_count(count)
    }

    pub fn band_for_count(&self, count: usize) -> PenaltyBand {
        if count <= self.free_encounters {
            PenaltyBand::None
        } else if count <= self.moderate_limit {
            PenaltyBand::Moderate
        } else if count <= self.heavy_limit {
            PenaltyBand::Heavy
        } else {
            PenaltyBand::Severe
        }
    }
}

fn lerp_band(count: usize, first: usize, last: usize, (lo, hi): (f64, f64)) -> f64 {
    if last <= first {
        return hi;
    }
    let t = (count.saturating_sub(first)) as f64 / (last - first) as f64;
    lo + t.clamp(0.0, 1.0) * (hi - lo)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyBand {
    None,
    Moderate,
    Heavy,
    Severe,
}

/// Read-only view of one key's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiminishingReturnsInfo {
    pub key: FarmingKey,
    pub encounters_in_window: usize,
    pub multiplier: f64,
    pub band: PenaltyBand,
    pub window_secs: u64,
    /// Seconds until the oldest in-window encounter ages out
    pub next_expiry_secs: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmingStats {
    pub tracked_keys: usize,
    pub encounters_in_window: usize,
    pub penalised_keys: usize,
}

/// Per-engine encounter tracker. Each key's list is locked on its own.
pub struct FarmingTracker {
    policy: FarmingPolicy,
    clock: Arc<dyn Clock>,
    records: RwLock<HashMap<FarmingKey, Arc<Mutex<FarmingRecord>>>>,
    recorded_total: AtomicU64,
}

impl FarmingTracker {
    pub fn new(policy: FarmingPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            records: RwLock::new(HashMap::new()),
            recorded_total: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> &FarmingPolicy {
        &self.policy
    }

    fn record_for(&self, key: &FarmingKey) -> Arc<Mutex<FarmingRecord>> {
        if let Some(rec) = self.records.read().get(key) {
            return Arc::clone(rec);
        }
        let mut map = self.records.write();
        Arc::clone(map.entry(key.clone()).or_default())
    }

    /// Append an encounter and return the in-window count including it
    pub fn record_encounter(&self, kind: ContentKind, content_id: &str, player_level: u32) -> usize {
        let key = FarmingKey::new(kind, content_id, player_level);
        let now = self.clock.now_ms();
        let window = self.policy.window_ms();

        let count = {
            let record = self.record_for(&key);
            let mut rec = record.lock();
            rec.prune(now, window);
            rec.timestamps.push(now);
            rec.timestamps.len()
        };

        let total = self.recorded_total.fetch_add(1, Ordering::Relaxed) + 1;
        if total % 256 == 0 {
            self.compact();
        }

        debug!(
            content = content_id,
            bucket = key.level_bucket,
            count,
            "Encounter recorded"
        );
        count
    }

    /// Multiplier in [1 - max_penalty, 1.0] for the key's current history
    pub fn diminishing_multiplier(&self, kind: ContentKind, content_id: &str, player_level: u32) -> f64 {
        let key = FarmingKey::new(kind, content_id, player_level);
        let now = self.clock.now_ms();
        let window = self.policy.window_ms();

        let existing = self.records.read().get(&key).cloned();
        let count = match existing {
            Some(record) => {
                let mut rec = record.lock();
                rec.prune(now, window);
                rec.len()
            }
            None => 0,
        };
        self.policy.multiplier_for_count(count)
    }

    /// Introspection without pruning
    pub fn info(&self, kind: ContentKind, content_id: &str, player_level: u32) -> DiminishingReturnsInfo {
        let key = FarmingKey::new(kind, content_id, player_level);
        let now = self.clock.now_ms();
        let window = self.policy.window_ms();

        let (count, next_expiry_secs) = match self.records.read().get(&key) {
            Some(record) => {
                let rec = record.lock();
                let count = rec.count_in_window(now, window);
                let oldest = rec.oldest_in_window(now, window);
                let expiry = oldest.map(|t| (t + window).saturating_sub(now) as f64 / 1000.0);
                (count, expiry)
            }
            None => (0, None),
        };

        DiminishingReturnsInfo {
            key,
            encounters_in_window: count,
            multiplier: self.policy.multiplier_for_count(count),
            band: self.policy.band_for_count(count),
            window_secs: self.policy.window_secs,
            next_expiry_secs,
        }
    }

    /// Aggregate counts without pruning
    pub fn stats(&self) -> FarmingStats {
        let now = self.clock.now_ms();
        let window = self.policy.window_ms();
        let map = self.records.read();

        let mut stats = FarmingStats {
            tracked_keys: map.len(),
            ..Default::default()
        };
        for record in map.values() {
            let count = record.lock().count_in_window(now, window);
            stats.encounters_in_window += count;
            if self.policy.band_for_count(count) != PenaltyBand::None {
                stats.penalised_keys += 1;
            }
        }
        stats
    }

    /// Drop keys whose whole history has aged out
    pub fn compact(&self) {
        let now = self.clock.now_ms();
        let window = self.policy.window_ms();
        let mut map = self.records.write();
        let before = map.len();
        map.retain(|_, record| {
            let mut rec = record.lock();
            rec.prune(now, window);
            !rec.is_empty()
        });
        let removed = before - map.len();
        if removed > 0 {
            debug!(removed, "Compacted farming records");
        }
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }
}
