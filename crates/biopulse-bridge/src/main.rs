//! Bridge binary: runs a synthetic ECG channel through the conditioning
//! pipeline and streams heart rate plus raw signal to in-memory outlets,
//! logging each accepted beat. Stands in for the hardware bridge that
//! reads a BITalino-class device and publishes LSL streams.

use std::path::PathBuf;
use std::process::ExitCode;

use biopulse_core::acquisition::{SampleSource, SyntheticEcg};
use biopulse_core::observe::{init_logging, LogConfig};
use biopulse_core::pipeline::{ChannelConfig, ChannelPipeline};
use biopulse_core::telemetry::{StreamInfo, StreamOutlet, VecOutlet};
use biopulse_core::types::{DspError, DspResult};

struct Args {
    /// Stream name announced on both outlets.
    name: String,
    /// Run length in seconds.
    seconds: u64,
    /// Simulated heart rate of the synthetic source.
    bpm: f64,
    /// Peak noise amplitude added to the synthetic source.
    noise: i32,
    /// Channel configuration file, when given.
    config_path: Option<PathBuf>,
}

fn usage(program: &str) {
    eprintln!("usage: {program} [NAME] [SECONDS] [BPM] [NOISE] [CONFIG]");
    eprintln!("  NAME     stream name for the outlets   (default echopink)");
    eprintln!("  SECONDS  run length in seconds         (default 30)");
    eprintln!("  BPM      simulated heart rate          (default 75)");
    eprintln!("  NOISE    peak source noise amplitude   (default 5)");
    eprintln!("  CONFIG   channel config YAML           (default: BIOPULSE_CONFIG, ./biopulse.yaml)");
}

fn parse_args() -> Result<Args, String> {
    let argv: Vec<String> = std::env::args().collect();
    if argv.len() > 6 {
        return Err(format!("expected at most 5 arguments, got {}", argv.len() - 1));
    }
    let mut args = Args {
        name: "echopink".to_string(),
        seconds: 30,
        bpm: 75.0,
        noise: 5,
        config_path: None,
    };
    if let Some(s) = argv.get(1) {
        if s.is_empty() {
            return Err("NAME must not be empty".to_string());
        }
        args.name = s.clone();
    }
    if let Some(s) = argv.get(2) {
        args.seconds = s.parse().map_err(|_| format!("bad SECONDS value {s:?}"))?;
    }
    if let Some(s) = argv.get(3) {
        args.bpm = s.parse().map_err(|_| format!("bad BPM value {s:?}"))?;
        if !(20.0..=250.0).contains(&args.bpm) {
            return Err(format!("BPM {} outside supported range 20..=250", args.bpm));
        }
    }
    if let Some(s) = argv.get(4) {
        args.noise = s.parse().map_err(|_| format!("bad NOISE value {s:?}"))?;
    }
    if let Some(s) = argv.get(5) {
        args.config_path = Some(PathBuf::from(s));
    }
    Ok(args)
}

fn run(args: &Args) -> DspResult<()> {
    let config = match &args.config_path {
        Some(path) => ChannelConfig::load_from(path)?,
        None => ChannelConfig::load()?,
    };
    let mut pipeline = ChannelPipeline::new(&config)?;

    let fs = config.sample_rate_hz;
    let period = (60.0 * fs / args.bpm).round() as u64;
    let total_ticks = args.seconds * fs as u64;
    let mut source = SyntheticEcg::new(period, 500, 400)
        .with_noise(args.noise)
        .with_limit(total_ticks);

    let mut rate_outlet = VecOutlet::new(StreamInfo::new(args.name.as_str(), "heartrate", fs));
    let mut raw_outlet = VecOutlet::new(StreamInfo::new(args.name.as_str(), "rawECG", fs));

    tracing::info!(
        name = args.name.as_str(),
        seconds = args.seconds,
        bpm = args.bpm,
        noise = args.noise,
        sample_rate_hz = fs,
        period_ticks = period,
        "starting synthetic bridge"
    );

    loop {
        let raw = match source.read_sample() {
            Ok(raw) => raw,
            Err(DspError::SourceExhausted(_)) => break,
            Err(err) => return Err(err),
        };
        raw_outlet.push_sample(raw as f32);
        let out = pipeline.process_sample(raw as f64);
        if let Some(beat) = out.beat {
            rate_outlet.push_sample(beat.bpm as f32);
            tracing::info!(
                tick = beat.tick,
                interval_ticks = beat.interval_ticks,
                bpm = format_args!("{:.1}", beat.bpm),
                "beat"
            );
        }
    }

    let beats = rate_outlet.samples();
    // Skip the startup transient when reporting the mean rate.
    let settled: Vec<f32> = beats.iter().copied().skip(4).collect();
    let mean_bpm = if settled.is_empty() {
        0.0
    } else {
        settled.iter().sum::<f32>() / settled.len() as f32
    };
    tracing::info!(
        ticks = total_ticks,
        beats = beats.len(),
        mean_bpm = format_args!("{mean_bpm:.1}"),
        raw_stream = raw_outlet.info().kind.as_str(),
        "bridge run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging(&LogConfig::default());

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            usage(&std::env::args().next().unwrap_or_else(|| "biopulse-bridge".into()));
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "bridge failed");
            ExitCode::FAILURE
        }
    }
}
