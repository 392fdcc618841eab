//! Per-stage configuration values.
//!
//! Every config is an explicit immutable value passed per call; there is no
//! shared default instance. `Default` carries the documented defaults.

use serde::{Deserialize, Serialize};

/// Configuration for the cepstral branch (framing through DCT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CepstralConfig {
    /// Samples per frame.
    pub frame_len: usize,
    /// Overlapping samples between adjacent frames. Must be < `frame_len`.
    pub overlap: usize,
    /// FFT size for the per-frame power spectrum.
    pub nfft: usize,
    /// Number of triangular mel filters.
    pub filter_num: usize,
    /// Lower edge of the mel anchor range, Hz.
    pub low_freq: f64,
    /// Upper edge of the mel anchor range, Hz.
    pub high_freq: f64,
    /// Retained cepstral coefficients are `0..=ncoe` (so `ncoe + 1` values).
    pub ncoe: usize,
}

impl Default for CepstralConfig {
    fn default() -> Self {
        Self {
            frame_len: 512,
            overlap: 256,
            nfft: 64,
            filter_num: 26,
            low_freq: 0.0,
            high_freq: 22_050.0,
            ncoe: 13,
        }
    }
}

/// Configuration for the modulation branch (spectrogram through log bins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulationConfig {
    /// Spectrogram frame length and FFT size.
    pub nfft: usize,
    /// Overlap between spectrogram frames.
    pub overlap: usize,
    /// Remap spectrogram rows onto this many mel bands before the
    /// modulation FFT; `None` keeps the linear Hz rows.
    pub mel_bands: Option<usize>,
    /// Modulation FFT length along the time axis; each channel's time
    /// series is zero-padded or truncated to fit. `None` uses the
    /// spectrogram frame count.
    pub nsample: Option<usize>,
    /// Number of log-spaced output bins.
    pub nbin: usize,
    /// Lowest log-bin target frequency, Hz.
    pub min_freq: f64,
    /// Highest modulation frequency, Hz; also the top log-bin target.
    pub max_freq: f64,
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            nfft: 64,
            overlap: 0,
            mel_bands: None,
            nsample: None,
            nbin: 48,
            min_freq: 1.0 / 60.0,
            max_freq: 344.0,
        }
    }
}
