//! Pure strength scoring functions
//!
//! Estimated one-rep-max, per-set volume and the barbell plate calculator.
//! Nothing in here holds state; the session engine and the CLI both call
//! straight into these.

mod plates;
mod strength;

pub use plates::{calculate_plates, PlateBreakdown, PlateCount, STANDARD_PLATES};
pub use strength::{estimate_one_rep_max, is_personal_record, set_volume, total_volume};

/// Round a value to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
