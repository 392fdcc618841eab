//! End-to-end pipeline properties on silence and pure tones.

use modspec::{CepstralConfig, ModulationConfig, Signal, cepstrum, modulation};
use modspec::framing::frame_signal;
use modspec::mel::{FilterBank, MEL_FLOOR};
use modspec::spectral::{POWER_FLOOR, power_spectra};

fn sine(rate: u32, freq: f64, len: usize) -> Signal {
    let samples: Vec<f64> = (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / rate as f64).sin())
        .collect();
    Signal::new(samples, rate).unwrap()
}

#[test]
fn one_second_of_silence_stays_at_the_floors() {
    let signal = Signal::new(vec![0.0; 44_100], 44_100).unwrap();
    let config = CepstralConfig::default();

    let frames = frame_signal(signal.samples(), config.frame_len, config.overlap).unwrap();
    let power = power_spectra(&frames, config.nfft).unwrap();
    assert!(power.iter().flatten().all(|&p| p == POWER_FLOOR));

    let bank = FilterBank::new(
        signal.sample_rate(),
        config.nfft,
        config.filter_num,
        config.low_freq,
        config.high_freq,
    )
    .unwrap();
    let mel = bank.project(&power);
    assert!(mel.iter().flatten().all(|&m| m == MEL_FLOOR));

    let ceps = cepstrum::extract(&signal, &config).unwrap();
    assert!(ceps.iter().flatten().all(|c| c.is_finite()));
    // A mel spectrum constant across filters keeps only the first
    // coefficient.
    for row in &ceps {
        assert!(row[0] < 0.0);
        for &c in &row[1..] {
            assert!(c.abs() < 1e-6);
        }
    }
}

#[test]
fn pure_tone_peaks_at_the_nearest_bin() {
    // f = 4 * rate / NFFT, fully contained in a single 64-sample frame.
    let rate = 44_100u32;
    let nfft = 64usize;
    let freq = 4.0 * rate as f64 / nfft as f64;
    let signal = sine(rate, freq, nfft);
    let frames = frame_signal(signal.samples(), nfft, 0).unwrap();
    assert_eq!(frames.len(), 1);
    let power = power_spectra(&frames, nfft).unwrap();
    // The stored spectrum is the reference's inverted form, so the
    // spectral peak is the minimum entry.
    let peak = power[0]
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak, 4);
}

#[test]
fn default_configs_produce_the_documented_shapes() {
    let signal = sine(44_100, 440.0, 44_100);

    let ceps = cepstrum::extract(&signal, &CepstralConfig::default()).unwrap();
    // 1 + ceil((44100 - 512) / 256) frames, ncoe + 1 coefficients each.
    assert_eq!(ceps.len(), 172);
    assert!(ceps.iter().all(|row| row.len() == 14));

    let features = modulation::extract(&signal, &ModulationConfig::default()).unwrap();
    assert_eq!(features.log_binned.len(), 48);
    assert!(features.log_binned.iter().all(|row| row.len() == 33));
    assert!(features.log_binned.iter().flatten().all(|v| v.is_finite()));
    assert_eq!(features.summary.mean.len(), 33);
}

#[test]
fn failing_stage_yields_no_partial_output() {
    let signal = sine(44_100, 440.0, 4_096);
    let config = ModulationConfig {
        min_freq: 500.0,
        max_freq: 344.0,
        ..ModulationConfig::default()
    };
    assert!(modulation::extract(&signal, &config).is_err());
}
