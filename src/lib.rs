//! Acoustic feature extraction: framed cepstral features (MFCC-style) and
//! modulation-spectrum analysis with log-frequency rebinning.
//!
//! Two independent branches share the framed spectral front end:
//! signal -> frames -> window -> power spectrum -> mel filterbank -> DCT
//! (cepstral coefficients), and signal -> spectrogram -> modulation FFT ->
//! summary / log-binned modulation spectrum.

/// Cepstral transform (mel projection, log compression, DCT).
pub mod cepstrum;
/// Stage configuration values with documented defaults.
pub mod config;
/// Error types shared by all pipeline stages.
pub mod error;
/// Overlap framing and window functions.
pub mod framing;
/// Tracing subscriber setup for the CLI.
pub mod logging;
/// Mel scale conversions and triangular filterbank construction.
pub mod mel;
/// Modulation-spectrum pipeline (spectrogram, modulation FFT, rebinning).
pub mod modulation;
/// Immutable input signal.
pub mod signal;
/// Per-frame power spectra.
pub mod spectral;

pub use config::{CepstralConfig, ModulationConfig};
pub use error::FeatureError;
pub use mel::FilterBank;
pub use modulation::{ModulationFeatures, ModulationSummary};
pub use signal::Signal;
