use crate::error::{Result, SignalError};
use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;

#[derive(Debug, Serialize, Copy, Clone, PartialEq)]
pub struct SpectrumBin {
    pub frequency: f64,
    pub magnitude: f64,
}

/// Frequency of FFT bin `k` for `n` samples spaced `sample_period` apart
fn bin_frequency(k: usize, n: usize, sample_period: f64) -> f64 {
    let span = n as f64 * sample_period;
    if k < (n + 1) / 2 {
        k as f64 / span
    } else {
        (k as f64 - n as f64) / span
    }
}

/// Amplitude spectrum of a real signal, ordered from the most negative
/// frequency to the most positive one.
///
/// Each bin is `|X_k| * sample_period`, the discrete transform scaled by the
/// sample spacing so it approximates the continuous Fourier transform.
pub fn fft_magnitude(samples: &[f64], sample_period: f64) -> Result<Vec<SpectrumBin>> {
    if samples.is_empty() {
        return Err(SignalError::invalid("cannot take the FFT of an empty signal"));
    }
    if !sample_period.is_finite() || sample_period <= 0.0 {
        return Err(SignalError::invalid(format!(
            "sample period must be positive, got {}",
            sample_period
        )));
    }

    let n = samples.len();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    // Rotate by n/2 so the zero-frequency bin sits in the middle
    let shift = n / 2;
    let spectrum: Vec<SpectrumBin> = (0..n)
        .map(|i| {
            let k = (i + n - shift) % n;
            SpectrumBin {
                frequency: bin_frequency(k, n, sample_period),
                magnitude: buffer[k].norm() * sample_period,
            }
        })
        .collect();

    debug!(
        "FFT of {} samples, resolution {:.4} Hz",
        n,
        1.0 / (n as f64 * sample_period)
    );
    Ok(spectrum)
}
