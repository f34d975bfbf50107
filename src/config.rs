use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "learning-journal", version, about = "A small journal for learning notes")]
pub struct Cli {
    /// Directory holding saved notes and the log file.
    #[arg(long, env = "LEARNING_JOURNAL_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `learning_journal=debug`. `RUST_LOG` wins when set.
    #[arg(long, env = "LEARNING_JOURNAL_LOG", default_value = "info")]
    pub log_level: String,

    /// Start in dark mode.
    #[arg(long)]
    pub dark: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub dark: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        Config {
            data_dir: cli.data_dir.unwrap_or_else(default_data_dir),
            log_level: cli.log_level,
            dark: cli.dark,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("journal.log")
    }
}

/// Platform data directory, e.g. `~/.local/share/learning-journal` on Linux.
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "learning-journal")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./.learning-journal"))
}
