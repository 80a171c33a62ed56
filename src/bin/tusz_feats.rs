use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use eegload::{io::write_features, read_features};

#[derive(Parser)]
#[command(name = "tusz_feats", about = "Decode a TUSZ binary feature file to safetensors")]
struct Args {
    /// TUSZ feature file
    #[arg(long)]
    input: PathBuf,

    /// safetensors output path (default: <name>.safetensors next to the input)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let ft = read_features(&args.input)
        .with_context(|| format!("decoding {}", args.input.display()))?;
    println!("{}: {} features × {} ch × {} frames",
        ft.name, ft.n_features(), ft.n_channels(), ft.n_frames());

    let output = args.output.unwrap_or_else(|| {
        args.input.with_file_name(format!("{}.safetensors", ft.name))
    });
    write_features(&ft, &output)?;
    println!("Written → {}", output.display());
    Ok(())
}
