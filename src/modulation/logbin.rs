//! Remapping of the linear modulation-frequency axis onto log-spaced bins.

use crate::error::FeatureError;

/// Assignment of linear modulation bins to log-spaced output bins.
///
/// Output bin 0 holds linear bin 0; each later bin holds the contiguous run
/// of linear indices up to (and including) its rounded interpolated
/// position. When consecutive targets round to the same index (clamped
/// low-frequency targets), the bin holds exactly that single repeated
/// index; otherwise the bins partition `[0, mod_n)` with no gaps or
/// overlaps.
#[derive(Debug, Clone)]
pub struct LogBinMapping {
    bins: Vec<Vec<usize>>,
}

impl LogBinMapping {
    /// Build the mapping for `mod_n` linear bins spanning `[0, max_freq]`
    /// onto `nbin` output bins with `nbin - 1` log-spaced targets between
    /// `min_freq` and `max_freq`.
    pub fn build(
        mod_n: usize,
        nbin: usize,
        min_freq: f64,
        max_freq: f64,
    ) -> Result<Self, FeatureError> {
        if mod_n < 2 {
            return Err(FeatureError::invalid(
                "logbin",
                "mod_n",
                format!("need at least 2 linear bins, got {mod_n}"),
            ));
        }
        if nbin < 2 {
            return Err(FeatureError::invalid(
                "logbin",
                "nbin",
                format!("need at least 2 output bins, got {nbin}"),
            ));
        }
        if !(min_freq > 0.0 && min_freq < max_freq) {
            return Err(FeatureError::invalid(
                "logbin",
                "min_freq",
                format!("need 0 < min_freq < max_freq, got [{min_freq}, {max_freq}]"),
            ));
        }
        // Frequencies of linear bins 1..mod_n (bin 0 is DC and fixed).
        let step = max_freq / (mod_n - 1) as f64;
        let xs: Vec<f64> = (1..mod_n).map(|k| k as f64 * step).collect();
        let rounded: Vec<usize> = log_targets(nbin, min_freq, max_freq)
            .into_iter()
            .map(|t| {
                let pos = interp_index(t, &xs);
                pos.round_ties_even() as usize
            })
            .collect();
        let mut bins = Vec::with_capacity(nbin);
        bins.push(vec![0]);
        let mut prev = 0usize;
        for &this in &rounded {
            if this == prev {
                bins.push(vec![this]);
            } else {
                bins.push((prev + 1..=this).collect());
            }
            prev = this;
        }
        Ok(Self { bins })
    }

    /// Member linear indices per output bin.
    pub fn bins(&self) -> &[Vec<usize>] {
        &self.bins
    }

    /// Average a modulation spectrum `[mod_n][channels]` into
    /// `[nbin][channels]`, taking the per-channel mean over each bin's
    /// member linear indices. Output is always rectangular.
    pub fn apply(&self, modspec: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let channels = modspec.first().map_or(0, Vec::len);
        let mut out = Vec::with_capacity(self.bins.len());
        for members in &self.bins {
            let mut acc = vec![0.0_f64; channels];
            let mut n = 0usize;
            for &idx in members {
                if let Some(row) = modspec.get(idx) {
                    for (a, &v) in acc.iter_mut().zip(row) {
                        *a += v;
                    }
                    n += 1;
                }
            }
            if n > 0 {
                for a in &mut acc {
                    *a /= n as f64;
                }
            }
            out.push(acc);
        }
        out
    }
}

/// `nbin - 1` log-spaced target frequencies from `min_freq` to `max_freq`.
fn log_targets(nbin: usize, min_freq: f64, max_freq: f64) -> Vec<f64> {
    let count = nbin - 1;
    let lg_min = min_freq.log10();
    let lg_max = max_freq.log10();
    (0..count)
        .map(|j| {
            let frac = if count > 1 {
                j as f64 / (count - 1) as f64
            } else {
                0.0
            };
            10.0_f64.powf(lg_min + (lg_max - lg_min) * frac)
        })
        .collect()
}

/// Monotone piecewise-linear interpolation of a target frequency onto the
/// index space `[1, xs.len()]`, clamped at both ends like the reference's
/// interpolation.
fn interp_index(target: f64, xs: &[f64]) -> f64 {
    let last = xs.len();
    if target <= xs[0] {
        return 1.0;
    }
    if target >= xs[last - 1] {
        return last as f64;
    }
    let hi = xs.partition_point(|&x| x < target);
    let lo = hi - 1;
    let frac = (target - xs[lo]) / (xs[hi] - xs[lo]);
    (lo + 1) as f64 + frac
}
