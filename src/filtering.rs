use crate::error::{Result, SignalError};
use log::debug;
use sci_rs::signal::filter::design::{
    butter_dyn, DigitalFilter, FilterBandType, FilterOutputType, Sos, SosFormatFilter,
};
use sci_rs::signal::filter::sosfiltfilt_dyn;

/// Cut-off used for the raw trace during analysis.
pub const DEFAULT_HIGHPASS_HZ: f64 = 0.001;
pub const DEFAULT_HIGHPASS_ORDER: usize = 4;

/// Designs a Butterworth high-pass as second-order sections
fn design_highpass(cutoff_hz: f64, order: usize, sample_rate: f64) -> Result<Vec<Sos<f64>>> {
    if order == 0 {
        return Err(SignalError::invalid("filter order must be at least 1"));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(SignalError::invalid(format!(
            "sample rate must be positive, got {}",
            sample_rate
        )));
    }
    let nyquist = sample_rate / 2.0;
    if !(cutoff_hz > 0.0 && cutoff_hz < nyquist) {
        return Err(SignalError::invalid(format!(
            "high-pass cutoff must lie in (0, {}) Hz, got {}",
            nyquist, cutoff_hz
        )));
    }

    let filter = butter_dyn(
        order,
        vec![cutoff_hz],
        Some(FilterBandType::Highpass),
        Some(false),
        Some(FilterOutputType::Sos),
        Some(sample_rate),
    );
    match filter {
        DigitalFilter::Sos(SosFormatFilter { sos }) => Ok(sos),
        _ => Err(SignalError::invalid(
            "filter design did not produce second-order sections",
        )),
    }
}

/// Zero-phase high-pass: the filter is run forwards and then backwards.
///
/// The signal must be longer than the edge padding used by the
/// forward-backward pass, `3 * (2 * sections + 1)` samples.
pub fn highpass(samples: &[f64], cutoff_hz: f64, order: usize, sample_rate: f64) -> Result<Vec<f64>> {
    let sos = design_highpass(cutoff_hz, order, sample_rate)?;

    let padlen = 3 * (2 * sos.len() + 1);
    if samples.len() <= padlen {
        return Err(SignalError::invalid(format!(
            "high-pass of order {} needs more than {} samples, got {}",
            order,
            padlen,
            samples.len()
        )));
    }

    debug!(
        "High-pass {} samples: {} Hz, order {}, {} sections at {} Hz",
        samples.len(),
        cutoff_hz,
        order,
        sos.len(),
        sample_rate
    );
    Ok(sosfiltfilt_dyn(samples.iter(), &sos))
}
