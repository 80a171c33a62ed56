use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use eegload::{io::write_recording, load_with, preprocess, Format, LoadOptions, PipelineConfig, Reference};

#[derive(Parser)]
#[command(name = "loadeeg", about = "Load an EEG recording (EDF, MAT, CURRY) and export it as safetensors")]
struct Args {
    /// Recording path (CURRY: base name or any of the three files)
    #[arg(long)]
    input: PathBuf,

    /// Format tag: EDF, MAT or CURRY
    #[arg(long, default_value = "EDF")]
    format: Format,

    /// safetensors output path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Re-reference: avg or Cz
    #[arg(long)]
    reference: Option<Reference>,

    /// Band-pass low cutoff in Hz (needs --h-freq)
    #[arg(long, requires = "h_freq")]
    l_freq: Option<f32>,

    /// Band-pass high cutoff in Hz (needs --l-freq)
    #[arg(long, requires = "l_freq")]
    h_freq: Option<f32>,

    /// Butterworth order (default: 5)
    #[arg(long, default_value_t = 5)]
    order: usize,

    /// Resample to this rate in Hz
    #[arg(long)]
    sfreq: Option<f32>,

    /// Fail on malformed CURRY .rs3 sections instead of warning
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let opts = LoadOptions { strict_rs3: args.strict };
    let mut rec = load_with(&args.input, args.format, &opts)
        .with_context(|| format!("loading {} as {}", args.input.display(), args.format))?;
    println!("Loaded {} samples × {} ch @ {} Hz{}",
        rec.n_times(), rec.n_channels(), rec.sfreq,
        if rec.markers.is_some() { " (+ trigger)" } else { "" });

    let cfg = PipelineConfig {
        reference: args.reference,
        bandpass: args.l_freq.zip(args.h_freq),
        filter_order: args.order,
        target_sfreq: args.sfreq,
    };
    if !cfg.is_identity() {
        preprocess(&mut rec, &cfg)?;
        println!("Conditioned → {} samples @ {} Hz", rec.n_times(), rec.sfreq);
    }

    if let Some(output) = &args.output {
        write_recording(&rec, output)?;
        println!("Written → {}", output.display());
    }

    Ok(())
}
