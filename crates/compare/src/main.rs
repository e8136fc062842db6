use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dhtkv_compare::{CompareError, Comparison, load_pair};

#[derive(Parser, Debug)]
#[command(
    name = "dhtkv-compare",
    about = "Compara duas séries pareadas de medições inteiras"
)]
struct Args {
    /// Série de referência (Val1)
    a: PathBuf,
    /// Série comparada (Val2)
    b: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    match load_pair(&args.a, &args.b) {
        Ok(pairs) => {
            println!("{}", Comparison::from_pairs(&pairs));
            Ok(ExitCode::SUCCESS)
        }
        Err(CompareError::DatasetMismatch { line }) => {
            println!("Invalid data sets");
            tracing::warn!(line, "séries com formatos diferentes");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
