//! Modulation-spectrum pipeline: how each frequency channel's energy
//! fluctuates over time, summarized and rebinned onto log-spaced bands.

pub mod logbin;
mod spectrogram;

pub use logbin::LogBinMapping;
pub use spectrogram::{Spectrogram, hz_spectrogram, mel_spectrogram};

use rustfft::{FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModulationConfig;
use crate::error::FeatureError;
use crate::signal::Signal;

/// Floor for spectrogram and modulation-spectrum entries.
pub const SPECTRUM_FLOOR: f64 = f64::EPSILON;

/// Per-channel mean, standard deviation, and max of the modulation
/// spectrum across the modulation-frequency axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulationSummary {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub max: Vec<f64>,
}

/// Outputs of the modulation branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulationFeatures {
    /// Modulation spectrum, `[modulation bin][channel]`.
    pub spectrum: Vec<Vec<f64>>,
    pub summary: ModulationSummary,
    /// Log-binned modulation spectrum, `[nbin][channel]`.
    pub log_binned: Vec<Vec<f64>>,
}

/// FFT magnitude along the time axis of a spectrogram.
///
/// Each channel's time series is zero-padded or truncated to `nsample`;
/// only the `floor(nsample / 2) + 1` non-negative-frequency bins are kept,
/// clamped at [`SPECTRUM_FLOOR`]. Returns `[modulation bin][channel]`.
pub fn modulation_spectrum(
    spec: &Spectrogram,
    nsample: usize,
) -> Result<Vec<Vec<f64>>, FeatureError> {
    if nsample == 0 {
        return Err(FeatureError::invalid(
            "modulation",
            "nsample",
            "modulation FFT length must be positive",
        ));
    }
    let keep = nsample / 2 + 1;
    let channels = spec.channels();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nsample);
    let mut out = vec![vec![0.0_f64; channels]; keep];
    let mut buffer = vec![Complex::new(0.0_f64, 0.0); nsample];
    for (ch, series) in spec.rows().iter().enumerate() {
        for (i, cell) in buffer.iter_mut().enumerate() {
            let v = series.get(i).copied().unwrap_or(0.0);
            *cell = Complex::new(v, 0.0);
        }
        fft.process(&mut buffer);
        for (k, row) in out.iter_mut().enumerate() {
            row[ch] = buffer[k].norm().max(SPECTRUM_FLOOR);
        }
    }
    Ok(out)
}

/// Per-channel mean, population standard deviation, and max across the
/// modulation-frequency axis.
pub fn summarize(modspec: &[Vec<f64>]) -> ModulationSummary {
    let channels = modspec.first().map_or(0, Vec::len);
    let n = modspec.len();
    let mut mean = vec![0.0_f64; channels];
    let mut max = vec![f64::NEG_INFINITY; channels];
    for row in modspec {
        for (ch, &v) in row.iter().enumerate() {
            mean[ch] += v;
            if v > max[ch] {
                max[ch] = v;
            }
        }
    }
    if n > 0 {
        for m in &mut mean {
            *m /= n as f64;
        }
    } else {
        max.fill(0.0);
    }
    let mut var = vec![0.0_f64; channels];
    for row in modspec {
        for (ch, &v) in row.iter().enumerate() {
            let d = v - mean[ch];
            var[ch] += d * d;
        }
    }
    let std = var
        .into_iter()
        .map(|v| if n > 0 { (v / n as f64).sqrt() } else { 0.0 })
        .collect();
    ModulationSummary { mean, std, max }
}

/// Run the whole modulation branch: spectrogram, optional mel remap,
/// modulation FFT, summary, log rebinning.
pub fn extract(
    signal: &Signal,
    config: &ModulationConfig,
) -> Result<ModulationFeatures, FeatureError> {
    let mut spec = hz_spectrogram(signal, config.nfft, config.overlap)?;
    if let Some(bands) = config.mel_bands {
        spec = mel_spectrogram(&spec, bands)?;
    }
    let nsample = config.nsample.unwrap_or_else(|| spec.frames());
    debug!(
        channels = spec.channels(),
        frames = spec.frames(),
        nsample,
        "computing modulation spectrum"
    );
    let spectrum = modulation_spectrum(&spec, nsample)?;
    let summary = summarize(&spectrum);
    let mapping = LogBinMapping::build(
        spectrum.len(),
        config.nbin,
        config.min_freq,
        config.max_freq,
    )?;
    let log_binned = mapping.apply(&spectrum);
    Ok(ModulationFeatures {
        spectrum,
        summary,
        log_binned,
    })
}
