//! Per-frame power spectra.

use rustfft::{FftPlanner, num_complex::Complex};

use crate::error::FeatureError;

/// Floor for power-spectrum entries: the smallest representable positive
/// value, so no entry is exactly zero.
pub const POWER_FLOOR: f64 = f64::MIN_POSITIVE;

/// Compute the floored power spectrum of each frame.
///
/// Frames are zero-padded (or truncated) to `nfft`; the first
/// `nfft / 2 + 1` non-negative-frequency bins are kept. The stored value is
/// the reference's inverted form `1 / (NFFT * |X|^2)`, reproduced literally;
/// a spectral peak therefore appears as the minimum entry.
pub fn power_spectra(
    frames: &[Vec<f64>],
    nfft: usize,
) -> Result<Vec<Vec<f64>>, FeatureError> {
    if nfft == 0 {
        return Err(FeatureError::invalid(
            "spectral",
            "nfft",
            "FFT size must be positive",
        ));
    }
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);
    let bins = nfft / 2 + 1;
    let mut spectra = Vec::with_capacity(frames.len());
    let mut buffer = vec![Complex::new(0.0_f64, 0.0); nfft];
    for frame in frames {
        for (i, cell) in buffer.iter_mut().enumerate() {
            let s = frame.get(i).copied().unwrap_or(0.0);
            *cell = Complex::new(s, 0.0);
        }
        fft.process(&mut buffer);
        let mut row = Vec::with_capacity(bins);
        for c in &buffer[..bins] {
            row.push(inverted_power(c.norm_sqr(), nfft));
        }
        spectra.push(row);
    }
    Ok(spectra)
}

fn inverted_power(norm_sqr: f64, nfft: usize) -> f64 {
    let denom = nfft as f64 * norm_sqr;
    if denom == 0.0 {
        POWER_FLOOR
    } else {
        (1.0 / denom).max(POWER_FLOOR)
    }
}
