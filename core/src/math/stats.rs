use crate::prelude::EwmaWeighting;

/// Column statistics that skip missing (`NaN`) samples.
pub struct StatsHelper;

impl StatsHelper {
    pub fn count(samples: &[f64]) -> usize {
        samples.iter().filter(|v| !v.is_nan()).count()
    }

    pub fn mean(samples: &[f64]) -> f64 {
        let n = Self::count(samples);
        if n == 0 {
            return f64::NAN;
        }
        samples.iter().filter(|v| !v.is_nan()).sum::<f64>() / n as f64
    }

    /// Population variance (divides by `n`).
    pub fn variance(samples: &[f64]) -> f64 {
        let n = Self::count(samples);
        if n == 0 {
            return f64::NAN;
        }
        let mean = Self::mean(samples);
        samples
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / n as f64
    }

    pub fn std_dev(samples: &[f64]) -> f64 {
        Self::variance(samples).sqrt()
    }

    pub fn min(samples: &[f64]) -> f64 {
        samples
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NAN, f64::min)
    }

    pub fn max(samples: &[f64]) -> f64 {
        samples
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NAN, f64::max)
    }

    /// Whether a column's variance is indistinguishable from rounding noise.
    pub fn is_constant(samples: &[f64]) -> bool {
        let n = Self::count(samples) as f64;
        let mean = Self::mean(samples);
        let variance = Self::variance(samples);
        if variance.is_nan() {
            return true;
        }
        let eps = f64::EPSILON;
        let bound = n * eps * variance + (n * mean * eps).powi(2);
        variance <= bound
    }

    /// Causal exponentially weighted moving average.
    ///
    /// Missing samples never contribute: leading gaps stay `NaN`, later gaps
    /// repeat the running value while older observations keep decaying.
    pub fn ewma(samples: &[f64], alpha: f64, weighting: EwmaWeighting) -> Vec<f64> {
        let decay = 1.0 - alpha;
        let new_weight = match weighting {
            EwmaWeighting::Adjusted => 1.0,
            EwmaWeighting::Recursive => alpha,
        };

        let mut output = Vec::with_capacity(samples.len());
        let mut running = f64::NAN;
        let mut old_weight = 1.0;

        for &value in samples {
            if running.is_nan() {
                running = value;
                old_weight = 1.0;
            } else {
                old_weight *= decay;
                if !value.is_nan() {
                    if running != value {
                        running =
                            (old_weight * running + new_weight * value) / (old_weight + new_weight);
                    }
                    match weighting {
                        EwmaWeighting::Adjusted => old_weight += new_weight,
                        EwmaWeighting::Recursive => old_weight = 1.0,
                    }
                }
            }
            output.push(running);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn statistics_skip_missing_values() {
        let samples = [1.0, f64::NAN, 3.0];
        assert_eq!(StatsHelper::count(&samples), 2);
        assert_eq!(StatsHelper::mean(&samples), 2.0);
        assert_eq!(StatsHelper::variance(&samples), 1.0);
        assert_eq!(StatsHelper::min(&samples), 1.0);
        assert_eq!(StatsHelper::max(&samples), 3.0);
    }

    #[test]
    fn empty_column_statistics_are_nan() {
        assert!(StatsHelper::mean(&[]).is_nan());
        assert!(StatsHelper::min(&[f64::NAN]).is_nan());
        assert!(StatsHelper::is_constant(&[f64::NAN]));
    }

    #[test]
    fn constant_detection() {
        assert!(StatsHelper::is_constant(&[5.0, 5.0, 5.0]));
        assert!(StatsHelper::is_constant(&[0.1, 0.1, 0.1, 0.1]));
        assert!(!StatsHelper::is_constant(&[5.0, 5.0, 5.000001]));
    }

    #[test]
    fn ewma_constant_sequence_is_unchanged() {
        let samples = vec![2.5; 7];
        for weighting in [EwmaWeighting::Adjusted, EwmaWeighting::Recursive] {
            assert_eq!(StatsHelper::ewma(&samples, 0.6, weighting), samples);
        }
    }

    #[test]
    fn ewma_adjusted_weights_history() {
        let out = StatsHelper::ewma(&[1.0, 2.0, 3.0], 0.6, EwmaWeighting::Adjusted);
        assert_eq!(out[0], 1.0);
        assert!(close(out[1], 2.4 / 1.4));
        assert!(close(out[2], 3.96 / 1.56));
    }

    #[test]
    fn ewma_recursive_form() {
        let out = StatsHelper::ewma(&[1.0, 2.0, 3.0], 0.6, EwmaWeighting::Recursive);
        assert_eq!(out[0], 1.0);
        assert!(close(out[1], 1.6));
        assert!(close(out[2], 0.6 * 3.0 + 0.4 * 1.6));
    }

    #[test]
    fn ewma_single_value_and_alpha_one() {
        assert_eq!(
            StatsHelper::ewma(&[4.0], 0.6, EwmaWeighting::Adjusted),
            vec![4.0]
        );
        assert_eq!(
            StatsHelper::ewma(&[1.0, 7.0, 3.0], 1.0, EwmaWeighting::Adjusted),
            vec![1.0, 7.0, 3.0]
        );
    }

    #[test]
    fn ewma_handles_gaps() {
        let out = StatsHelper::ewma(&[f64::NAN, 1.0, f64::NAN, 2.0], 0.6, EwmaWeighting::Adjusted);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], 1.0);
        // the gap decays the old weight twice: 0.4^2 = 0.16
        assert!(close(out[3], (0.16 * 1.0 + 2.0) / 1.16));
    }
}
