mod args;

use std::process::ExitCode;
use std::sync::Arc;

use ansi_term::Colour;
use args::Args;
use clap::Parser;

use espack::{BundlerOptions, CancelToken, InputItem, ModuleBundler, ModuleBundlingResult};
use espack_fs::OsFileSource;

#[tokio::main]
async fn main() -> ExitCode {
  env_logger::init();
  let args = Args::parse();

  let source = Arc::new(OsFileSource::new(&args.root_dir));
  let items: Vec<InputItem> = args
    .input
    .iter()
    .map(|path| {
      let mut item = InputItem::new(source.clone(), path.clone());
      item.case_sensitive = !args.ignore_case;
      item
    })
    .collect();

  let options =
    BundlerOptions { development_mode: Some(args.dev), ..BundlerOptions::default() };

  match ModuleBundler::new(options).bundle(items, CancelToken::new()).await {
    Ok(ModuleBundlingResult::Success(output)) => {
      let size = format!("{:.2}", output.content.len() as f64 / 1024.0);
      match &args.outfile {
        Some(path) => {
          if let Err(error) = std::fs::write(path, &output.content) {
            eprintln!("{} {error}", Colour::Red.paint("error:"));
            return ExitCode::FAILURE;
          }
          println!(
            "{} {}{size} kB",
            Colour::Cyan.paint(path.display().to_string()),
            Colour::White.dimmed().paint("bundle │ size: "),
          );
        }
        None => println!("{}", output.content),
      }
      ExitCode::SUCCESS
    }
    Ok(ModuleBundlingResult::Failure) => {
      eprintln!("{}", Colour::Red.paint("bundling failed, see the logged diagnostic"));
      ExitCode::FAILURE
    }
    Err(_) => {
      eprintln!("{}", Colour::Yellow.paint("bundling was cancelled"));
      ExitCode::FAILURE
    }
  }
}
