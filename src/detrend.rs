use crate::error::{Result, SignalError};
use log::debug;

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares fit of `values` against x = 0, 1, 2, ...
///
/// Needs at least two points. Sums are taken around the means to keep the
/// result stable for long traces with a large offset.
pub fn linear_fit(values: &[f64]) -> Result<LinearFit> {
    if values.len() < 2 {
        return Err(SignalError::invalid(format!(
            "a linear fit needs at least 2 points, got {}",
            values.len()
        )));
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Fills `sequence[..cutoff]` with `replacement` and removes the linear trend
/// from `sequence[cutoff..]`.
///
/// The line is fitted on positions relative to the cut-off, so the tail
/// behaves as if it started at x = 0. The tail must hold at least two
/// samples.
pub fn detrend(sequence: &[f64], cutoff: usize, replacement: f64) -> Result<Vec<f64>> {
    if cutoff > sequence.len() {
        return Err(SignalError::invalid(format!(
            "cutoff {} is past the end of a sequence of length {}",
            cutoff,
            sequence.len()
        )));
    }

    let tail = &sequence[cutoff..];
    let fit = linear_fit(tail)?;
    debug!(
        "Detrending {} samples after cutoff {}: slope {:.6}, intercept {:.6}",
        tail.len(),
        cutoff,
        fit.slope,
        fit.intercept
    );

    let mut result = vec![replacement; cutoff];
    result.extend(
        tail.iter()
            .enumerate()
            .map(|(i, &y)| y - fit.at(i as f64)),
    );
    Ok(result)
}

pub fn detrend_default(sequence: &[f64], cutoff: usize) -> Result<Vec<f64>> {
    detrend(sequence, cutoff, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() <= tol,
                "index {}: got {}, expected {}",
                i,
                a,
                e
            );
        }
    }

    /// Textbook n*sum(xy) - sum(x)sum(y) form, used as the reference.
    fn closed_form_ols(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let sx: f64 = (0..values.len()).map(|i| i as f64).sum();
        let sy: f64 = values.iter().sum();
        let sxy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
        let sxx: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();
        let slope = (n * sxy - sx * sy) / (n * sxx - sx * sx);
        (slope, (sy - slope * sx) / n)
    }

    fn noisy_ramp(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let x = i as f64;
                2048.0 + 0.75 * x + 30.0 * (x * 0.37).sin() + 5.0 * (x * 1.9).cos()
            })
            .collect()
    }

    #[test]
    fn exact_line_after_flat_head() {
        let out = detrend(&[5.0, 5.0, 5.0, 0.0, 1.0, 2.0, 3.0], 3, 0.0).unwrap();
        assert_close(&out, &[0.0; 7], 1e-12);
    }

    #[test]
    fn noisy_tail_matches_ols() {
        let out = detrend(&[0.0, 0.0, 10.0, 8.0, 12.0, 9.0, 11.0], 2, 0.0).unwrap();
        // tail fit: slope 0.3, intercept 9.4
        let expected = [0.0, 0.0, 0.6, -1.7, 2.0, -1.3, 0.4];
        assert_close(&out, &expected, 1e-6);
    }

    #[test]
    fn fit_agrees_with_closed_form() {
        let values = noisy_ramp(257);
        let fit = linear_fit(&values).unwrap();
        let (slope, intercept) = closed_form_ols(&values);
        assert!(((fit.slope - slope) / slope).abs() < 1e-9);
        assert!(((fit.intercept - intercept) / intercept).abs() < 1e-9);
    }

    #[test]
    fn length_is_preserved_and_head_is_replaced() {
        let values = noisy_ramp(100);
        for cutoff in [0, 1, 37, 98] {
            let out = detrend(&values, cutoff, -1.5).unwrap();
            assert_eq!(out.len(), values.len());
            assert!(out[..cutoff].iter().all(|&v| v == -1.5));
        }
    }

    #[test]
    fn residual_has_no_trend() {
        let values = noisy_ramp(400);
        let out = detrend_default(&values, 120).unwrap();
        let residual = linear_fit(&out[120..]).unwrap();
        assert!(residual.slope.abs() < 1e-9, "slope {}", residual.slope);
        assert!(residual.intercept.abs() < 1e-6, "intercept {}", residual.intercept);
    }

    #[test]
    fn linear_tail_becomes_zero() {
        let mut values = vec![7.0, -3.0, 11.0];
        values.extend((0..20).map(|i| -0.25 * i as f64 + 42.0));
        let out = detrend(&values, 3, 9.0).unwrap();
        assert_close(&out[..3], &[9.0; 3], 0.0);
        assert_close(&out[3..], &[0.0; 20], 1e-10);
    }

    #[test]
    fn zero_cutoff_detrends_everything() {
        let values: Vec<f64> = (0..10).map(|i| 3.0 * i as f64 + 1.0).collect();
        let out = detrend_default(&values, 0).unwrap();
        assert_close(&out, &[0.0; 10], 1e-10);
    }

    #[test]
    fn cutoff_at_end_is_rejected() {
        let values = [1.0, 2.0, 3.0];
        assert!(matches!(
            detrend_default(&values, 3),
            Err(SignalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn single_point_tail_is_rejected() {
        assert!(matches!(
            detrend_default(&[1.0, 2.0, 3.0], 2),
            Err(SignalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn cutoff_past_end_is_rejected() {
        assert!(matches!(
            detrend_default(&[1.0, 2.0, 3.0], 4),
            Err(SignalError::InvalidArgument(_))
        ));
    }
}
