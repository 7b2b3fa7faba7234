/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Usage-weighted choice of the next pattern.
//!
//! Each pattern gets weight `(avg / (count + 1))^3`, where `avg` is the
//! mean number of runs per pattern. Rarely used patterns dominate the
//! distribution without ever being certain, and heavily used ones keep
//! a small chance.

use crate::prng::Xorshift32;
use log::{debug, trace};

const BIAS_EXPONENT: i32 = 3;

/// How often each pattern has run, indexed like the pattern table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageStats {
    counts: Vec<u64>,
    total: u64,
}

impl UsageStats {
    pub fn new(pattern_count: usize) -> Self {
        Self {
            counts: vec![0; pattern_count],
            total: 0,
        }
    }

    pub fn from_counts(counts: Vec<u64>, total: u64) -> Self {
        Self { counts, total }
    }

    pub fn record(&mut self, index: usize) {
        self.counts[index] += 1;
        self.total += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `sqrt(total² / Σcount² / n)`: 1.0 when usage is perfectly even,
    /// smaller the more it is skewed. `None` until something has run.
    pub fn balance(&self) -> Option<f64> {
        let sum_of_squares: f64 = self.counts.iter().map(|&count| (count as f64).powi(2)).sum();
        if sum_of_squares == 0.0 {
            return None;
        }
        let total = self.total as f64;
        Some((total * total / sum_of_squares / self.len() as f64).sqrt())
    }
}

/// Selection weight of each pattern.
pub fn weights(usage: &UsageStats) -> Vec<f64> {
    let average = usage.total() as f64 / usage.len() as f64;
    usage
        .counts()
        .iter()
        .map(|&count| (average / (count as f64 + 1.0)).powi(BIAS_EXPONENT))
        .collect()
}

/// Running sums of the weights.
pub fn cumulative(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0, |sum, weight| {
            *sum += weight;
            Some(*sum)
        })
        .collect()
}

/// Lowest index whose running sum reaches `r`.
pub fn select(cumulative: &[f64], r: f64) -> Option<usize> {
    cumulative.iter().position(|&p| r <= p)
}

/// Choose the next pattern index.
///
/// On a cold start every weight is zero, the draw is zero, and the
/// first pattern in the table is chosen.
///
/// # Panics
///
/// If the table is empty or no running sum reaches the draw. Both mean the
/// weights are broken, and carrying on would give an unknown distribution.
pub fn pick_next(usage: &UsageStats, prng: &mut Xorshift32) -> usize {
    assert!(!usage.is_empty(), "cannot pick from an empty pattern table");
    let weights = weights(usage);
    let sums = cumulative(&weights);
    for (index, ((count, weight), p)) in usage.counts().iter().zip(&weights).zip(&sums).enumerate() {
        trace!("  nr={index}, count={count}, chance={weight:.3}, p={p:.3}");
    }
    let total_weight = sums.last().copied().unwrap_or_default();
    let r = prng.next_float_bounded(total_weight);
    debug!("p={total_weight:.3}, r={r:.3}");
    let Some(index) = select(&sums, r) else {
        panic!("no pattern reaches r={r} (total weight {total_weight})");
    };
    if let Some(balance) = usage.balance() {
        debug!("picked {index}, balance={balance:.3} after {} runs", usage.total());
    }
    index
}
