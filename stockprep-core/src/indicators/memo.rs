//! Shared-computation cache for multi-output indicator families.
//!
//! Bollinger upper/middle/lower, MACD line/signal/histogram and the two
//! stochastic lines are each requested as separate columns. The first
//! request computes the whole family and stores it here; the rest read it
//! back. Keys hash the input values, so a memo can never hand back results
//! computed from different data.

use super::bollinger::{bollinger_of_series, BollingerBands};
use super::macd::{macd_of_series, MacdLines};
use super::stochastic::{stochastic_of_series, StochasticLines};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// BLAKE3 digest of an indicator kind, its parameters and its input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoKey([u8; 32]);

impl MemoKey {
    pub fn new(kind: &str, params: &[u64], columns: &[&[f64]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(kind.as_bytes());
        hasher.update(&[0]);
        for p in params {
            hasher.update(&p.to_le_bytes());
        }
        for column in columns {
            hasher.update(&(column.len() as u64).to_le_bytes());
            for v in column.iter() {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct IndicatorMemo {
    bollinger: HashMap<MemoKey, Arc<BollingerBands>>,
    macd: HashMap<MemoKey, Arc<MacdLines>>,
    stochastic: HashMap<MemoKey, Arc<StochasticLines>>,
    hits: u64,
    misses: u64,
}

impl IndicatorMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bollinger(&mut self, close: &[f64], period: usize, nbdev: f64) -> Arc<BollingerBands> {
        let key = MemoKey::new("bollinger", &[period as u64, nbdev.to_bits()], &[close]);
        get_or_insert(&mut self.bollinger, &mut self.hits, &mut self.misses, key, || {
            bollinger_of_series(close, period, nbdev)
        })
    }

    pub fn macd(&mut self, close: &[f64], fast: usize, slow: usize, signal: usize) -> Arc<MacdLines> {
        let key = MemoKey::new("macd", &[fast as u64, slow as u64, signal as u64], &[close]);
        get_or_insert(&mut self.macd, &mut self.hits, &mut self.misses, key, || {
            macd_of_series(close, fast, slow, signal)
        })
    }

    pub fn stochastic(
        &mut self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        fastk: usize,
        slowk: usize,
        slowd: usize,
    ) -> Arc<StochasticLines> {
        let key = MemoKey::new(
            "stochastic",
            &[fastk as u64, slowk as u64, slowd as u64],
            &[high, low, close],
        );
        get_or_insert(&mut self.stochastic, &mut self.hits, &mut self.misses, key, || {
            stochastic_of_series(high, low, close, fastk, slowk, slowd)
        })
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of cached families.
    pub fn len(&self) -> usize {
        self.bollinger.len() + self.macd.len() + self.stochastic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.bollinger.clear();
        self.macd.clear();
        self.stochastic.clear();
    }
}

fn get_or_insert<K, V, F>(
    map: &mut HashMap<K, Arc<V>>,
    hits: &mut u64,
    misses: &mut u64,
    key: K,
    compute: F,
) -> Arc<V>
where
    K: Eq + Hash,
    F: FnOnce() -> V,
{
    if let Some(v) = map.get(&key) {
        *hits += 1;
        tracing::debug!(hits = *hits, "indicator memo hit");
        return Arc::clone(v);
    }
    *misses += 1;
    let value = Arc::new(compute());
    map.insert(key, Arc::clone(&value));
    value
}
