// Robust population summaries: median and median absolute deviation.

use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("cannot summarize an empty population")]
    EmptyPopulation,
}

// ---------------------------------------------------------------------------
// Reduction primitive
// ---------------------------------------------------------------------------

/// Median of a possibly empty list of values.
///
/// Returns `None` for an empty slice. For an even number of values the mean
/// of the two middle values is returned.
pub fn reduce(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

// ---------------------------------------------------------------------------
// RobustSummary
// ---------------------------------------------------------------------------

/// Robust center and spread of a fixed population.
///
/// `mad` is the median of the absolute deviations from `median`. It is zero
/// when more than half of the population shares the median value, in which
/// case every normalization against this summary is neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustSummary {
    pub size: usize,
    pub median: f64,
    pub mad: f64,
}

impl RobustSummary {
    pub fn new<I>(population: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = population.into_iter().collect();
        let median = reduce(&values).ok_or(StatsError::EmptyPopulation)?;
        let deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
        let mad = reduce(&deviations).ok_or(StatsError::EmptyPopulation)?;
        Ok(Self {
            size: values.len(),
            median,
            mad,
        })
    }

    /// Express `value` in deviation units relative to this population.
    ///
    /// Returns 0.0 when the population has no spread.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.mad == 0.0 {
            return 0.0;
        }
        (value - self.median) / self.mad
    }

    /// Display adapter that rounds median and MAD to `decimals` places.
    pub fn rounded(&self, decimals: usize) -> Rounded<'_> {
        Rounded {
            summary: self,
            decimals,
        }
    }
}

pub struct Rounded<'a> {
    summary: &'a RobustSummary,
    decimals: usize,
}

impl fmt::Display for Rounded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "median {:.*}\tmedian deviation {:.*}",
            self.decimals, self.summary.median, self.decimals, self.summary.mad
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn reduce_empty_is_none() {
        assert_eq!(reduce(&[]), None);
    }

    #[test]
    fn reduce_odd_and_even() {
        assert_eq!(reduce(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(reduce(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(reduce(&[7.0]), Some(7.0));
    }

    #[test]
    fn summary_with_outlier() {
        // |x - 3| = [2, 1, 0, 1, 97] -> median 1
        let s = RobustSummary::new([1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(s.size, 5);
        assert!(approx_eq(s.median, 3.0, 1e-12));
        assert!(approx_eq(s.mad, 1.0, 1e-12));
        assert!(approx_eq(s.normalize(3.0), 0.0, 1e-12));
        assert!(approx_eq(s.normalize(4.0), 1.0, 1e-12));
        assert!(approx_eq(s.normalize(1.0), -2.0, 1e-12));
    }

    #[test]
    fn empty_population_is_an_error() {
        let err = RobustSummary::new(Vec::<f64>::new()).unwrap_err();
        assert_eq!(err, StatsError::EmptyPopulation);
    }

    #[test]
    fn identical_population_normalizes_to_zero() {
        let s = RobustSummary::new([42.0; 6]).unwrap();
        assert_eq!(s.mad, 0.0);
        assert_eq!(s.normalize(42.0), 0.0);
        assert_eq!(s.normalize(-1000.0), 0.0);
        assert_eq!(s.normalize(f64::MAX), 0.0);
    }

    #[test]
    fn median_normalizes_to_zero() {
        let populations: [&[f64]; 3] = [
            &[0.5, -2.0, 9.0, 14.0],
            &[300.0, 410.0, 520.0, 380.0, 611.0, 295.0, 700.0],
            &[-3.5, -3.5, 1.0],
        ];
        for p in populations {
            let s = RobustSummary::new(p.iter().copied()).unwrap();
            assert_eq!(s.normalize(s.median), 0.0);
        }
    }

    #[test]
    fn normalize_is_monotonic() {
        let s = RobustSummary::new([310.0, 402.0, 455.0, 520.0, 640.0, 385.0]).unwrap();
        assert!(s.mad > 0.0);
        let mut previous = f64::NEG_INFINITY;
        for step in 0..50 {
            let x = 200.0 + f64::from(step) * 12.5;
            let z = s.normalize(x);
            assert!(z > previous);
            previous = z;
        }
    }

    #[test]
    fn rounded_display() {
        let s = RobustSummary::new([1.0, 2.0, 4.0]).unwrap();
        assert_eq!(s.rounded(1).to_string(), "median 2.0\tmedian deviation 1.0");
        assert_eq!(s.rounded(0).to_string(), "median 2\tmedian deviation 1");
    }
}
