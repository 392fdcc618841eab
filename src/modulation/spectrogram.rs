//! Time-indexed power spectrograms in Hz or mel bands.

use crate::error::FeatureError;
use crate::framing::frame_signal;
use crate::mel::{hz_to_mel, mel_to_hz};
use crate::signal::Signal;
use crate::spectral::power_spectra;

use super::SPECTRUM_FLOOR;

/// Power spectrogram with one row per frequency channel.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    rows: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl Spectrogram {
    /// Channel rows, `[channel][time frame]`.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn channels(&self) -> usize {
        self.rows.len()
    }

    /// Number of time frames.
    pub fn frames(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Compute a power spectrogram via framed spectral analysis.
///
/// Frame length equals the FFT size `nfft`; the default pipeline uses no
/// overlap and the identity window. Rows are frequency bins `0..=nfft/2`,
/// clamped at epsilon.
pub fn hz_spectrogram(
    signal: &Signal,
    nfft: usize,
    overlap: usize,
) -> Result<Spectrogram, FeatureError> {
    let frames = frame_signal(signal.samples(), nfft, overlap)?;
    let power = power_spectra(&frames, nfft)?;
    let bins = nfft / 2 + 1;
    let mut rows = vec![Vec::with_capacity(power.len()); bins];
    for frame in &power {
        for (bin, row) in rows.iter_mut().enumerate() {
            row.push(frame[bin].max(SPECTRUM_FLOOR));
        }
    }
    Ok(Spectrogram {
        rows,
        sample_rate: signal.sample_rate(),
    })
}

/// Partition a Hz spectrogram's rows into `nbin` mel-spaced bands.
///
/// Band edges are `mel_to_hz` of `nbin` evenly spaced mel points up to the
/// Nyquist mel; a band's value per time frame is the mean of the rows
/// spanned by its Hz range. The first output band is always the lowest row
/// unchanged. Row ranges are derived from floor indices so every band holds
/// at least one row.
pub fn mel_spectrogram(spec: &Spectrogram, nbin: usize) -> Result<Spectrogram, FeatureError> {
    if nbin < 2 {
        return Err(FeatureError::invalid(
            "mel_remap",
            "mel_bands",
            format!("need at least 2 mel bands, got {nbin}"),
        ));
    }
    let rows = spec.rows();
    if rows.is_empty() {
        return Err(FeatureError::invalid(
            "mel_remap",
            "spectrogram",
            "cannot remap an empty spectrogram",
        ));
    }
    let nyquist = spec.sample_rate() as f64 / 2.0;
    let high_mel = hz_to_mel(nyquist);
    let hz_edges: Vec<f64> = (1..=nbin)
        .map(|i| mel_to_hz(high_mel * i as f64 / nbin as f64))
        .collect();
    let hz_unit = nyquist / rows.len() as f64;
    let mut out = Vec::with_capacity(nbin);
    out.push(rows[0].clone());
    for i in 1..nbin {
        let start = ((hz_edges[i - 1] / hz_unit).floor() as usize).min(rows.len() - 1);
        let mut end = ((hz_edges[i] / hz_unit).floor() as usize + 1).min(rows.len());
        if end <= start {
            end = start + 1;
        }
        out.push(mean_rows(&rows[start..end]));
    }
    Ok(Spectrogram {
        rows: out,
        sample_rate: spec.sample_rate(),
    })
}

fn mean_rows(rows: &[Vec<f64>]) -> Vec<f64> {
    let frames = rows.first().map_or(0, Vec::len);
    let mut mean = vec![0.0_f64; frames];
    for row in rows {
        for (acc, &v) in mean.iter_mut().zip(row) {
            *acc += v;
        }
    }
    let n = rows.len() as f64;
    for acc in &mut mean {
        *acc /= n;
    }
    mean
}
