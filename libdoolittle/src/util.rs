#[cfg(test)]
#[ctor::ctor]
fn init_backtrace() {
    color_backtrace::install();
}

/// Averages two scores, weighting each by a count.
pub fn weighted_mean(a: f64, a_weight: usize, b: f64, b_weight: usize) -> f64 {
    (a * a_weight as f64 + b * b_weight as f64) / (a_weight + b_weight) as f64
}

#[macro_export]
macro_rules! max_f64 {
    // Base case:
    ($x:expr) => ($x);
    // `$x` followed by at least one `$y,`
    ($x:expr, $($y:expr),+) => (
        // Call `max_f64!` on the tail `$y`
        f64::max($x, $crate::max_f64!($($y),+))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_f64() {
        assert_eq!(max_f64!(1.0), 1.0);
        assert_eq!(max_f64!(1.0, -2.0, 3.5), 3.5);
        assert_eq!(max_f64!(-f64::INFINITY, -4.0), -4.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert_eq!(weighted_mean(2.0, 1, 4.0, 1), 3.0);
        assert_eq!(weighted_mean(2.0, 3, 6.0, 1), 3.0);
    }
}
