//! Headless BimDraft front end.
//!
//! ```text
//! bimdraft demo <out.json> [--settings <settings.json>]
//! bimdraft inspect <drawing.json> [--settings <settings.json>]
//! bimdraft list
//! ```

mod demo;
mod report;

use bimdraft_core::storage::{FileStorage, Storage, StorageError};
use bimdraft_core::{DraftError, DraftSettings, Drawing, WallTypeRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const USAGE: &str = "usage: bimdraft demo <out.json> [--settings <file>] | inspect <file> [--settings <file>] | list";

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), AppError> {
    let registry = WallTypeRegistry::with_defaults();
    match args {
        [cmd, out, rest @ ..] if cmd == "demo" => {
            let settings = settings_from(rest)?;
            let drawing = demo::run(settings.clone(), &registry)?;
            std::fs::write(out, drawing.to_json()?)?;
            log::info!("Wrote {} entities to {}", drawing.len(), out);
            print!("{}", report::summary(&drawing, &settings));
            Ok(())
        }
        [cmd, path, rest @ ..] if cmd == "inspect" => {
            let settings = settings_from(rest)?;
            let json = std::fs::read_to_string(PathBuf::from(path))?;
            let drawing = Drawing::from_json(&json, &registry)?;
            print!("{}", report::summary(&drawing, &settings));
            Ok(())
        }
        [cmd] if cmd == "list" => {
            let storage = FileStorage::default_location()?;
            let mut ids = storage.list()?;
            ids.sort();
            println!("{} ({} drawings)", storage.base_path().display(), ids.len());
            for id in ids {
                println!("  {}", id);
            }
            Ok(())
        }
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}

/// Optional trailing `--settings <file>`.
fn settings_from(rest: &[String]) -> Result<DraftSettings, AppError> {
    match rest {
        [] => Ok(DraftSettings::default()),
        [flag, path] if flag == "--settings" => Ok(DraftSettings::load(path)?),
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}
