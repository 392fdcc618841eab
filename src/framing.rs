//! Overlap framing with trailing zero padding, plus window functions.

use std::f64::consts::PI;

use crate::error::FeatureError;

/// Split a signal into overlapping fixed-length frames.
///
/// Frame `i` covers samples `[i * step, i * step + frame_len)` where
/// `step = frame_len - overlap`; the signal is padded with trailing zeros so
/// the last frame is full length. Every original sample lands in at least
/// one frame.
pub fn frame_signal(
    samples: &[f64],
    frame_len: usize,
    overlap: usize,
) -> Result<Vec<Vec<f64>>, FeatureError> {
    if frame_len == 0 {
        return Err(FeatureError::invalid(
            "framer",
            "frame_len",
            "frame length must be positive",
        ));
    }
    if overlap >= frame_len {
        return Err(FeatureError::invalid(
            "framer",
            "overlap",
            format!("overlap {overlap} leaves no step for frame length {frame_len}"),
        ));
    }
    let step = frame_len - overlap;
    let frame_num = frame_count(samples.len(), frame_len, step);
    let mut frames = Vec::with_capacity(frame_num);
    for i in 0..frame_num {
        let start = i * step;
        let mut frame = vec![0.0_f64; frame_len];
        for (j, cell) in frame.iter_mut().enumerate() {
            if let Some(&s) = samples.get(start + j) {
                *cell = s;
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

fn frame_count(sig_len: usize, frame_len: usize, step: usize) -> usize {
    if sig_len <= frame_len {
        1
    } else {
        1 + (sig_len - frame_len).div_ceil(step)
    }
}

/// Multiply each frame element-wise by `win_func(frame_len)`.
///
/// The window is evaluated once for the shared frame length.
pub fn apply_window<F>(frames: &mut [Vec<f64>], win_func: F)
where
    F: Fn(usize) -> Vec<f64>,
{
    let Some(frame_len) = frames.first().map(Vec::len) else {
        return;
    };
    let window = win_func(frame_len);
    for frame in frames.iter_mut() {
        for (cell, &w) in frame.iter_mut().zip(&window) {
            *cell *= w;
        }
    }
}

/// All-ones window; the default, leaving frames unchanged.
pub fn ones_window(length: usize) -> Vec<f64> {
    vec![1.0_f64; length]
}

/// Hann window.
pub fn hann_window(length: usize) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0_f64; length.max(1)];
    }
    let denom = (length - 1) as f64;
    (0..length)
        .map(|n| 0.5_f64 * (1.0 - (2.0 * PI * n as f64 / denom).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_equal_to_frame_len_is_rejected() {
        let err = frame_signal(&[0.0; 16], 8, 8).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidParameter {
                stage: "framer",
                param: "overlap",
                ..
            }
        ));
    }

    #[test]
    fn short_signal_yields_one_padded_frame() {
        let frames = frame_signal(&[1.0, 2.0, 3.0], 8, 4).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn frame_count_matches_ceil_formula() {
        // L = 10, F = 4, S = 2 -> 1 + ceil(6/2) = 4 frames.
        let samples: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let frames = frame_signal(&samples, 4, 2).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[3], vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn every_sample_is_covered_and_padding_is_zero() {
        let samples: Vec<f64> = (1..=11).map(|i| i as f64).collect();
        let frame_len = 4;
        let step = 3;
        let frames = frame_signal(&samples, frame_len, frame_len - step).unwrap();
        let total = frame_len + (frames.len() - 1) * step;
        assert!(total >= samples.len());
        let mut covered = vec![false; samples.len()];
        for (i, frame) in frames.iter().enumerate() {
            for (j, &v) in frame.iter().enumerate() {
                let idx = i * step + j;
                if idx < samples.len() {
                    assert_eq!(v, samples[idx]);
                    covered[idx] = true;
                } else {
                    assert_eq!(v, 0.0);
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn ones_window_is_identity() {
        let mut frames = frame_signal(&[0.25, -0.5, 0.75, 1.0], 2, 0).unwrap();
        let before = frames.clone();
        apply_window(&mut frames, ones_window);
        assert_eq!(frames, before);
    }

    #[test]
    fn hann_window_tapers_to_zero_at_edges() {
        let win = hann_window(8);
        assert_eq!(win.len(), 8);
        assert!(win[0].abs() < 1e-12);
        assert!(win[7].abs() < 1e-12);
        assert!(win[3] > 0.9);
    }
}
