use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
  /// Directory the bundle-internal module paths resolve against.
  #[clap(long, default_value = ".")]
  pub root_dir: PathBuf,

  /// Entry modules as bundle paths below the root (e.g. `/src/main.js`).
  #[clap(long, short = 'i', action = clap::ArgAction::Append, required = true)]
  pub input: Vec<String>,

  /// Write the bundle to this file instead of stdout.
  #[clap(long, short = 'o')]
  pub outfile: Option<PathBuf>,

  /// Keep per-module region markers and spacing in the output.
  #[clap(long)]
  pub dev: bool,

  /// Compare module paths case-insensitively.
  #[clap(long)]
  pub ignore_case: bool,
}
