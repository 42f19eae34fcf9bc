//! Estimated 1RM, volume and PR comparison

/// Epley estimate of the one-rep-max for a single weight/rep pair.
///
/// A single rep is its own max. Non-positive weight or reps carry no
/// information and yield `0.0` instead of being fed to the formula.
pub fn estimate_one_rep_max(weight: f64, reps: i32) -> f64 {
    if weight <= 0.0 || reps <= 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    weight * (1.0 + f64::from(reps) / 30.0)
}

/// Volume of one set (weight x reps), missing values count as zero
pub fn set_volume(weight: Option<f64>, reps: Option<i32>) -> f64 {
    weight.unwrap_or(0.0) * f64::from(reps.unwrap_or(0))
}

/// Sum of per-set volumes
pub fn total_volume<I>(sets: I) -> f64
where
    I: IntoIterator<Item = (Option<f64>, Option<i32>)>,
{
    sets.into_iter()
        .map(|(weight, reps)| set_volume(weight, reps))
        .sum()
}

/// A set is a PR when its estimate is positive and strictly beats the
/// previous estimate. No history means a previous estimate of zero.
pub fn is_personal_record(current_estimate: f64, previous_estimate: Option<f64>) -> bool {
    let previous = previous_estimate.unwrap_or(0.0);
    current_estimate > 0.0 && current_estimate > previous
}
