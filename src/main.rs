use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};

mod config;
mod error;
mod metafile;
mod ninja;
mod util;

use config::Config;
use error::{Error, Result};
use metafile::Transformer;

/// Rewrite the compiler and linker metafiles of a vendor SDK build so another
/// build can consume them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Metafiles to process.
    #[arg(required_unless_present = "all")]
    metafiles: Vec<PathBuf>,

    /// Project relative root joined onto rewritten paths.
    #[arg(long)]
    prj_dir: Option<PathBuf>,

    /// Directory containing the input metafiles.
    #[arg(long)]
    metafiles_dir: Option<PathBuf>,

    /// Output directory for transformed files [default: metafiles dir].
    #[arg(long = "build_dir", alias = "build-dir")]
    build_dir: Option<PathBuf>,

    /// Suffix appended to each output file name [default: _mpy].
    #[arg(long)]
    suffix: Option<String>,

    /// Process every metafile found in the metafiles directory.
    #[arg(long)]
    all: bool,

    /// TOML configuration file [default: mtbflags.toml in the metafiles dir,
    /// if present].
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report each file written.
    #[arg(short, long)]
    verbose: bool,

    /// Do not print the summary line.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {}", "error".red(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    let metafiles_dir = args.metafiles_dir.or(config.metafiles_dir);
    let build_dir = args
        .build_dir
        .or(config.build_dir)
        .or_else(|| metafiles_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let suffix = args
        .suffix
        .or(config.suffix)
        .unwrap_or_else(|| config::DEFAULT_SUFFIX.to_owned());
    let transformer = Transformer::new(
        args.prj_dir.or(config.prj_dir).unwrap_or_default(),
        build_dir,
        suffix,
        std::env::current_dir().map_err(|e| Error::io(".", e))?,
    )?;

    let mut inputs: Vec<PathBuf> = args
        .metafiles
        .iter()
        .map(|p| match &metafiles_dir {
            Some(dir) => dir.join(p),
            None => p.clone(),
        })
        .collect();
    if args.all {
        let dir = metafiles_dir.as_deref().unwrap_or(Path::new("."));
        inputs.extend(util::find_metafiles(dir, &transformer.suffix)?);
    }

    let inputs = util::dedup_paths(inputs);
    let outputs = transformer.process_all(&inputs)?;
    if args.verbose {
        for (input, out) in inputs.iter().zip(&outputs) {
            eprintln!(
                "{} {} -> {}",
                "transformed".green(),
                input.display(),
                out.display()
            );
        }
    }

    if !args.quiet {
        eprintln!(
            "{} {} metafile(s) into {}",
            "done".green(),
            outputs.len(),
            transformer.build_dir.display()
        );
    }

    Ok(())
}

/// Load the configuration file named on the command line, or the default one
/// from the metafiles directory when it exists.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(path) = &args.config {
        return util::read_config(path);
    }
    let dir = args.metafiles_dir.as_deref().unwrap_or(Path::new("."));
    let path = dir.join(config::DEFAULT_CONFIG);
    if path.is_file() {
        util::read_config(&path)
    } else {
        Ok(Config::default())
    }
}
