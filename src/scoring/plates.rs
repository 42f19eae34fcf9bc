//! Barbell plate calculator
//!
//! Greedy selection over a descending list of plate denominations. The
//! standard set is canonical, so greedy matches the expected loading and
//! must not be swapped for an exact subset-sum search.

use serde::{Deserialize, Serialize};

use super::round2;

/// Standard plate denominations in kilograms, heaviest first
pub const STANDARD_PLATES: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

const EPSILON: f64 = 1e-9;

/// Count of one plate denomination on each side of the bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateCount {
    pub plate: f64,
    pub count: u32,
}

/// Result of loading a bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateBreakdown {
    pub total: f64,
    pub bar: f64,
    /// Plates to load on each side, heaviest first
    pub per_side: Vec<PlateCount>,
    /// Weight per side that no plate could match, rounded to 2 decimals
    pub remainder: f64,
}

impl PlateBreakdown {
    /// Weight of the plates on one side
    pub fn side_weight(&self) -> f64 {
        self.per_side
            .iter()
            .map(|p| p.plate * f64::from(p.count))
            .sum()
    }

    /// Weight actually on the bar once loaded
    pub fn loaded_weight(&self) -> f64 {
        self.bar + 2.0 * self.side_weight()
    }

    /// `total - bar - 2 * side`, rounded to 2 decimals
    pub fn unloaded_weight(&self) -> f64 {
        round2(self.total - self.loaded_weight()).max(0.0)
    }

    /// True when the target was matched exactly
    pub fn is_exact(&self) -> bool {
        self.remainder == 0.0
    }
}

/// Compute the per-side plates for `total` on a bar weighing `bar`.
///
/// Denominations are tried heaviest first whatever order `plates` is in;
/// non-positive entries are ignored. A target at or below the bar weight,
/// or a non-finite weight, loads nothing and has no remainder.
pub fn calculate_plates(total: f64, bar: f64, plates: &[f64]) -> PlateBreakdown {
    let mut per_side = Vec::new();
    if !total.is_finite() || !bar.is_finite() {
        return PlateBreakdown {
            total,
            bar,
            per_side,
            remainder: 0.0,
        };
    }

    let mut denominations: Vec<f64> = plates
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    denominations.sort_by(|a, b| b.total_cmp(a));

    let mut remaining = ((total - bar) / 2.0).max(0.0);
    for plate in denominations {
        let count = ((remaining + EPSILON) / plate).floor().min(f64::from(u32::MAX));
        if count >= 1.0 {
            remaining -= count * plate;
            per_side.push(PlateCount {
                plate,
                count: count as u32,
            });
        }
    }

    PlateBreakdown {
        total,
        bar,
        per_side,
        remainder: round2(remaining).max(0.0),
    }
}
