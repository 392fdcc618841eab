//! Developer utility to extract cepstral and modulation features from a wav
//! file and print them as JSON.

use std::path::{Path, PathBuf};

use hound::SampleFormat;
use serde::Serialize;

use modspec::{CepstralConfig, ModulationConfig, ModulationFeatures, Signal, cepstrum, modulation};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    modspec::logging::init().map_err(|err| err.to_string())?;
    let signal = decode_wav(&options.path)?;
    let cepstral_config = CepstralConfig {
        nfft: options.nfft,
        ncoe: options.ncoe,
        ..CepstralConfig::default()
    };
    let modulation_config = ModulationConfig {
        nfft: options.nfft,
        mel_bands: options.mel_bands,
        nbin: options.nbin,
        ..ModulationConfig::default()
    };
    let cepstral = cepstrum::extract(&signal, &cepstral_config).map_err(|err| err.to_string())?;
    let modulation =
        modulation::extract(&signal, &modulation_config).map_err(|err| err.to_string())?;
    let json = if options.summary_only {
        let doc = SummaryDocument {
            sample_rate: signal.sample_rate(),
            summary: &modulation.summary,
        };
        serde_json::to_string_pretty(&doc)
    } else {
        let doc = FeatureDocument {
            sample_rate: signal.sample_rate(),
            cepstral: &cepstral,
            modulation: &modulation,
        };
        serde_json::to_string_pretty(&doc)
    };
    println!("{}", json.map_err(|err| format!("JSON encode failed: {err}"))?);
    Ok(())
}

#[derive(Serialize)]
struct FeatureDocument<'a> {
    sample_rate: u32,
    cepstral: &'a [Vec<f64>],
    modulation: &'a ModulationFeatures,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    sample_rate: u32,
    summary: &'a modspec::ModulationSummary,
}

#[derive(Debug, Clone)]
struct Options {
    path: PathBuf,
    nfft: usize,
    ncoe: usize,
    nbin: usize,
    mel_bands: Option<usize>,
    summary_only: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut path: Option<PathBuf> = None;
    let mut nfft = 64usize;
    let mut ncoe = 13usize;
    let mut nbin = 48usize;
    let mut mel_bands: Option<usize> = None;
    let mut summary_only = false;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--nfft" => nfft = parse_value(&mut iter, "--nfft")?,
            "--ncoe" => ncoe = parse_value(&mut iter, "--ncoe")?,
            "--nbin" => nbin = parse_value(&mut iter, "--nbin")?,
            "--mel-bands" => mel_bands = Some(parse_value(&mut iter, "--mel-bands")?),
            "--summary-only" => summary_only = true,
            other if other.starts_with('-') => {
                return Err(format!("Unknown flag {other}"));
            }
            other => {
                if path.replace(PathBuf::from(other)).is_some() {
                    return Err("Expected exactly one wav path".to_string());
                }
            }
        }
    }
    let Some(path) = path else {
        print_usage();
        return Err("Missing wav path".to_string());
    };
    Ok(Some(Options {
        path,
        nfft,
        ncoe,
        nbin,
        mel_bands,
        summary_only,
    }))
}

fn parse_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<usize, String> {
    let raw = iter
        .next()
        .ok_or_else(|| format!("Missing value for {flag}"))?;
    raw.parse::<usize>()
        .map_err(|_| format!("Invalid value for {flag}: {raw}"))
}

fn print_usage() {
    println!(
        "Usage: modspec-extract <wav path> [--nfft N] [--ncoe N] [--nbin N] \
         [--mel-bands N] [--summary-only]"
    );
}

/// Decode a wav file to a mono f64 signal, averaging channels.
fn decode_wav(path: &Path) -> Result<Signal, String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|err| format!("Failed to open {}: {err}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<_, _>>()
            .map_err(|err| format!("Sample error in {}: {err}", path.display()))?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .map_err(|err| format!("Sample error in {}: {err}", path.display()))?
        }
    };
    let mut mono = Vec::with_capacity(interleaved.len() / channels);
    for frame in interleaved.chunks(channels) {
        let sum: f64 = frame.iter().sum();
        mono.push(sum / channels as f64);
    }
    Signal::new(mono, spec.sample_rate).map_err(|err| err.to_string())
}
