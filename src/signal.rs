use crate::error::FeatureError;

/// Immutable sampled waveform: mono samples plus their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Signal {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, FeatureError> {
        if sample_rate == 0 {
            return Err(FeatureError::invalid(
                "signal",
                "sample_rate",
                "sample rate must be positive",
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
