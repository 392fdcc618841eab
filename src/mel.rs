//! Mel scale conversions and triangular filterbank construction.

use tracing::debug;

use crate::error::FeatureError;

/// Floor for mel-spectrum entries so the subsequent log stays defined.
pub const MEL_FLOOR: f64 = f64::EPSILON;

/// Convert Hz to mel. The 2259 constant is the reference's, kept literally.
pub fn hz_to_mel(freq: f64) -> f64 {
    2259.0 * (1.0 + freq / 700.0).log10()
}

/// Convert mel to Hz; inverse of [`hz_to_mel`].
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2259.0) - 1.0)
}

/// Bank of triangular filters over frequency bins, derived from
/// monotonically increasing mel-spaced anchor frequencies.
#[derive(Debug, Clone)]
pub struct FilterBank {
    filters: Vec<Vec<f64>>,
}

impl FilterBank {
    /// Build `filter_num` filters over `nfft / 2 + 1` frequency bins.
    ///
    /// Anchors are `filter_num + 2` mel-spaced points between `low_freq`
    /// and `high_freq`, mapped to bins via `floor((NFFT + 1) * hz / rate)`.
    /// A zero-width ramp (adjacent anchors rounding to the same bin)
    /// contributes no weight; a bank whose every filter is all-zero fails
    /// with [`FeatureError::DegenerateFilter`].
    pub fn new(
        sample_rate: u32,
        nfft: usize,
        filter_num: usize,
        low_freq: f64,
        high_freq: f64,
    ) -> Result<Self, FeatureError> {
        if sample_rate == 0 {
            return Err(FeatureError::invalid(
                "filterbank",
                "sample_rate",
                "sample rate must be positive",
            ));
        }
        if nfft == 0 {
            return Err(FeatureError::invalid(
                "filterbank",
                "nfft",
                "FFT size must be positive",
            ));
        }
        if filter_num == 0 {
            return Err(FeatureError::invalid(
                "filterbank",
                "filter_num",
                "filter count must be positive",
            ));
        }
        if !(low_freq >= 0.0 && high_freq > low_freq) {
            return Err(FeatureError::invalid(
                "filterbank",
                "high_freq",
                format!("need 0 <= low_freq < high_freq, got [{low_freq}, {high_freq}]"),
            ));
        }
        let bins = nfft / 2 + 1;
        let anchors = anchor_bins(sample_rate, nfft, filter_num, low_freq, high_freq, bins);
        let mut filters = Vec::with_capacity(filter_num);
        let mut zero_filters = 0usize;
        for i in 0..filter_num {
            let row = filter_row(anchors[i], anchors[i + 1], anchors[i + 2], bins);
            if row.iter().all(|&w| w == 0.0) {
                zero_filters += 1;
            }
            filters.push(row);
        }
        if zero_filters == filter_num {
            return Err(FeatureError::DegenerateFilter {
                detail: format!(
                    "all {filter_num} filters collapsed to zero width over {bins} bins"
                ),
            });
        }
        if zero_filters > 0 {
            debug!(zero_filters, filter_num, "filterbank has zero-width filters");
        }
        Ok(Self { filters })
    }

    /// Filter weight rows, `[filter_num][nfft / 2 + 1]`.
    pub fn filters(&self) -> &[Vec<f64>] {
        &self.filters
    }

    /// Project power spectra through the bank: `power * filterbank^T`,
    /// clamped at [`MEL_FLOOR`].
    pub fn project(&self, power: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let mut mel = Vec::with_capacity(power.len());
        for row in power {
            let mut out = Vec::with_capacity(self.filters.len());
            for filter in &self.filters {
                let mut sum = 0.0_f64;
                for (&w, &p) in filter.iter().zip(row) {
                    sum += w * p;
                }
                out.push(sum.max(MEL_FLOOR));
            }
            mel.push(out);
        }
        mel
    }
}

fn anchor_bins(
    sample_rate: u32,
    nfft: usize,
    filter_num: usize,
    low_freq: f64,
    high_freq: f64,
    bins: usize,
) -> Vec<usize> {
    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);
    let count = filter_num + 2;
    let mut anchors = Vec::with_capacity(count);
    for i in 0..count {
        let mel = low_mel + (high_mel - low_mel) * i as f64 / (count - 1) as f64;
        let hz = mel_to_hz(mel);
        let bin = ((nfft + 1) as f64 * hz / sample_rate as f64).floor();
        anchors.push((bin.max(0.0) as usize).min(bins - 1));
    }
    anchors
}

fn filter_row(left: usize, center: usize, right: usize, bins: usize) -> Vec<f64> {
    let mut row = vec![0.0_f64; bins];
    // Zero-width ramps have empty index ranges, so no division occurs.
    for j in left..center {
        row[j] = (j - left) as f64 / (center - left) as f64;
    }
    for j in center..right {
        row[j] = (right - j) as f64 / (right - center) as f64;
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mel_round_trip_is_tight_across_audible_range() {
        let top = hz_to_mel(22_050.0);
        for i in 0..=100 {
            let mel = top * i as f64 / 100.0;
            assert!((hz_to_mel(mel_to_hz(mel)) - mel).abs() < 1e-6);
        }
    }

    #[test]
    fn filter_row_rises_then_falls() {
        let row = filter_row(2, 5, 9, 12);
        assert_eq!(row[0], 0.0);
        assert_eq!(row[2], 0.0);
        assert!((row[3] - 1.0 / 3.0).abs() < 1e-12);
        assert!((row[4] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(row[5], 1.0);
        assert!((row[6] - 0.75).abs() < 1e-12);
        assert!((row[8] - 0.25).abs() < 1e-12);
        assert_eq!(row[9], 0.0);
        assert_eq!(row[11], 0.0);
    }

    #[test]
    fn zero_width_ramps_yield_zero_weights_not_nan() {
        let row = filter_row(3, 3, 3, 8);
        assert!(row.iter().all(|&w| w == 0.0 && w.is_finite()));
    }

    #[test]
    fn default_style_bank_builds_with_some_zero_filters() {
        let bank = FilterBank::new(44_100, 64, 26, 0.0, 22_050.0).unwrap();
        assert_eq!(bank.filters().len(), 26);
        assert!(bank.filters().iter().all(|f| f.len() == 33));
        // Low mel anchors crowd onto bin 0 at this resolution; some filters
        // are legitimately all-zero, but not the whole bank.
        assert!(
            bank.filters()
                .iter()
                .any(|f| f.iter().any(|&w| w > 0.0))
        );
        for filter in bank.filters() {
            assert!(filter.iter().all(|&w| w.is_finite() && (0.0..=1.0).contains(&w)));
        }
    }

    #[test]
    fn collapsed_bank_is_degenerate() {
        let err = FilterBank::new(44_100, 4, 3, 0.0, 50.0).unwrap_err();
        assert!(matches!(err, FeatureError::DegenerateFilter { .. }));
    }

    #[test]
    fn projection_floors_at_epsilon() {
        let bank = FilterBank::new(44_100, 64, 26, 0.0, 22_050.0).unwrap();
        let power = vec![vec![f64::MIN_POSITIVE; 33]];
        let mel = bank.project(&power);
        assert_eq!(mel.len(), 1);
        assert_eq!(mel[0].len(), 26);
        assert!(mel[0].iter().all(|&m| m == MEL_FLOOR));
    }
}
