//! Cepstral transform: mel projection, log compression, truncated DCT.

use std::f64::consts::PI;

use crate::config::CepstralConfig;
use crate::error::FeatureError;
use crate::framing::{apply_window, frame_signal, ones_window};
use crate::mel::FilterBank;
use crate::signal::Signal;
use crate::spectral::power_spectra;

/// Natural log of a floored mel spectrum.
pub fn log_mel_spectrum(mel: &[Vec<f64>]) -> Vec<Vec<f64>> {
    mel.iter()
        .map(|row| row.iter().map(|&m| m.ln()).collect())
        .collect()
}

/// Truncated cosine transform of the log mel spectrum.
///
/// Applies an unnormalized DCT-II (scipy convention, scaled by 2) per frame
/// across the filter axis and keeps coefficients `0..=ncoe` inclusive, so
/// `ncoe + 1` values per frame.
pub fn dct_ceps(log_mel: &[Vec<f64>], ncoe: usize) -> Vec<Vec<f64>> {
    log_mel.iter().map(|row| dct_ii(row, ncoe + 1)).collect()
}

fn dct_ii(values: &[f64], count: usize) -> Vec<f64> {
    let n = values.len().max(1) as f64;
    let mut out = Vec::with_capacity(count);
    for k in 0..count {
        let mut sum = 0.0_f64;
        for (m, &v) in values.iter().enumerate() {
            let angle = PI * k as f64 * (2.0 * m as f64 + 1.0) / (2.0 * n);
            sum += v * angle.cos();
        }
        out.push(2.0 * sum);
    }
    out
}

/// Run the whole cepstral branch: framing, windowing, power spectrum, mel
/// projection, log compression, truncated DCT.
///
/// Returns `[frames][ncoe + 1]` cepstral coefficients.
pub fn extract(signal: &Signal, config: &CepstralConfig) -> Result<Vec<Vec<f64>>, FeatureError> {
    let mut frames = frame_signal(signal.samples(), config.frame_len, config.overlap)?;
    apply_window(&mut frames, ones_window);
    let power = power_spectra(&frames, config.nfft)?;
    let bank = FilterBank::new(
        signal.sample_rate(),
        config.nfft,
        config.filter_num,
        config.low_freq,
        config.high_freq,
    )?;
    let mel = bank.project(&power);
    let log_mel = log_mel_spectrum(&mel);
    Ok(dct_ceps(&log_mel, config.ncoe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_spectrum_keeps_only_the_first_coefficient() {
        let mel = vec![vec![std::f64::consts::E; 26]];
        let log_mel = log_mel_spectrum(&mel);
        let ceps = dct_ceps(&log_mel, 13);
        assert_eq!(ceps[0].len(), 14);
        // ln(e) = 1, so coefficient 0 is 2 * N and the rest vanish.
        assert!((ceps[0][0] - 52.0).abs() < 1e-9);
        for &c in &ceps[0][1..] {
            assert!(c.abs() < 1e-9);
        }
    }

    #[test]
    fn default_config_keeps_fourteen_coefficients() {
        let rate = 44_100;
        let samples: Vec<f64> = (0..rate as usize / 10)
            .map(|i| (2.0 * PI * 440.0 * i as f64 / rate as f64).sin())
            .collect();
        let signal = Signal::new(samples, rate).unwrap();
        let ceps = extract(&signal, &CepstralConfig::default()).unwrap();
        assert!(!ceps.is_empty());
        assert!(ceps.iter().all(|row| row.len() == 14));
        assert!(ceps.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn invalid_overlap_fails_at_framer_entry() {
        let signal = Signal::new(vec![0.0; 1024], 44_100).unwrap();
        let config = CepstralConfig {
            overlap: 512,
            ..CepstralConfig::default()
        };
        let err = extract(&signal, &config).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidParameter { stage: "framer", .. }
        ));
    }
}
