use clap::Parser;
use log::info;

use cakit::{App, Cli, CollectionStore, Config, NoteManager, Result};

fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::default();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(editor) = cli.editor {
        config.editor_command = Some(editor);
    }

    info!("Using data directory: {}", config.data_dir.display());
    let store = CollectionStore::open(config.data_dir.clone())?;
    let manager = NoteManager::open(store)?;

    let mut app = App::new(manager, config, cli.verbose);
    app.run(cli.command)
}

fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
