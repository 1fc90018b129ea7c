//! Summary statistics over a sample set.
//!
//! All functions expect finite input. Percentile helpers take an
//! already sorted slice so a run sorts its samples exactly once.

use serde::{Deserialize, Serialize};

/// Linear-interpolated percentile of an ascending slice. `p` is in [0, 100].
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let w = rank - lower as f64;
        sorted[lower] * (1.0 - w) + sorted[upper] * w
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n).
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub range_label: String,
    pub count: u64,
    pub midpoint: f64,
}

/// Equal-width bins spanning [min, max] of the samples.
///
/// The last bin is closed on the right so the maximum is counted.
/// A zero-width range puts every sample into the first bin.
pub fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<HistogramBin> {
    if bins == 0 {
        return Vec::new();
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];

    for &x in values {
        let idx = if width > 0.0 {
            (((x - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + i as f64 * width;
            let hi = lo + width;
            HistogramBin {
                range_label: format!("{lo:.1}-{hi:.1}"),
                count,
                midpoint: lo + width / 2.0,
            }
        })
        .collect()
}
