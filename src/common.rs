//! Small shared helpers used by more than one sensor channel.

use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a vec of domain values which are linearly spaced between `start` and `end`
/// and which have a count of `count`. The first value will be `start` and the last
/// value will be `end`.
///
/// # Arguments
///
/// * `start`: the starting value of the domain, inclusive
/// * `end`: the ending value of the domain, inclusive
/// * `count`: the total number of discrete, evenly spaced values in the domain
///
/// returns: Vec<f64, Global>
///
/// # Examples
///
/// ```
/// use sensim::common::linear_space;
/// let domain = linear_space(0.0, 1.0, 3);
/// assert_eq!(domain, vec![0.0, 0.5, 1.0]);
/// ```
pub fn linear_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(count);
    let step = (end - start) / (count - 1) as f64;
    for i in 0..count {
        result.push(start + i as f64 * step);
    }
    result
}

/// The current wall-clock time as fractional seconds since the Unix epoch, which is
/// the timestamp convention used by every frame type in this crate. A clock set
/// before the epoch reads as 0.0 rather than failing the capture.
pub fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_space_spans_the_domain() {
        let d = linear_space(-30.0, 30.0, 100);
        assert_eq!(d.len(), 100);
        assert_eq!(d[0], -30.0);
        assert_eq!(d[99], 30.0);
    }

    #[test]
    fn epoch_seconds_is_monotonic_enough() {
        let a = epoch_seconds();
        let b = epoch_seconds();
        assert!(b >= a);
        assert!(a > 0.0);
    }
}
