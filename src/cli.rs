//! Command-line options.

use std::env;
use std::path::PathBuf;

use clap::Parser;

const DEFAULT_FPS: u32 = 60;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Seed for the piece sequence. Random when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// File holding the best score.
    #[arg(short, long, value_name = "PATH")]
    pub best_file: Option<PathBuf>,

    /// Frames per second of the game loop.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_FPS,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub fps: u32,

    /// Write logs to this file (filter with RUST_LOG). Logging is off without it.
    #[arg(short, long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Explicit `--best-file`, else the per-user data directory.
    pub fn best_file(&self) -> PathBuf {
        if let Some(path) = &self.best_file {
            return path.clone();
        }
        default_best_file(
            env::var_os("XDG_DATA_HOME").map(PathBuf::from),
            env::var_os("HOME").map(PathBuf::from),
        )
    }

    pub fn frame_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }
}

fn default_best_file(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".local").join("share")));
    match data_dir {
        Some(dir) => dir.join("blockfall").join("best.json"),
        None => PathBuf::from("blockfall-best.json"),
    }
}
