//! Command-line entry point for satb-split

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use satb_split::{split_satb_file, ProcessingOptions};

/// Split a closed-score SATB choral score into four single-staff voice
/// parts.
#[derive(Debug, Parser)]
#[command(name = "satb-split", version, about)]
struct Cli {
    /// Input score (.musicxml or .mscz)
    input: PathBuf,

    /// Output directory (default: <input stem>_voices next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip dynamics unification
    #[arg(long)]
    no_dynamics: bool,

    /// Skip lyrics unification
    #[arg(long)]
    no_lyrics: bool,

    /// Skip spanner unification
    #[arg(long)]
    no_spanners: bool,

    /// Skip layout and tempo unification
    #[arg(long)]
    no_layout: bool,

    /// Skip output invariant validation
    #[arg(long)]
    no_validate: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = ProcessingOptions {
        apply_dynamics_unification: !cli.no_dynamics,
        apply_lyrics_unification: !cli.no_lyrics,
        apply_spanner_unification: !cli.no_spanners,
        apply_layout_unification: !cli.no_layout,
        validate_output: !cli.no_validate,
    };

    match split_satb_file(&cli.input, cli.output_dir.as_deref(), &options) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
