mod config;
mod filter;
mod journal_entry;
mod journal_store;
mod metrics;
mod note_form;
mod persistence;
mod ui;
mod view_state;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use config::{Cli, Config};
use journal_store::JournalStore;
use persistence::FileKeyValueStore;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::UI;
use view_state::{Flow, ViewState};

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::from_cli(Cli::parse());
    init_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting learning journal");

    let mut store = JournalStore::open(FileKeyValueStore::new(&config.data_dir));
    let mut view = ViewState {
        dark_mode: config.dark,
        ..ViewState::new()
    };
    let mut ui = UI::new()?;

    loop {
        let now = Utc::now();
        ui.display(&view, store.entries(), now)?;

        if let Some(intent) = ui.next_intent(&view)? {
            if view.apply(intent, &mut store, now) == Flow::Quit {
                break;
            }
        }
    }

    info!("bye");
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file in the data directory.
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)
        .wrap_err_with(|| format!("creating {}", config.data_dir.display()))?;
    let log_path = config.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("opening {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
