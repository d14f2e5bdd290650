//! Binary entry point: load settings, start logging, open the library, and
//! drive the Ratatui event loop until the user exits.
use anyhow::Context;
use personal_library::config::Settings;
use personal_library::{logging, open_library, run_app, App};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    logging::init(&settings.log_level, &settings.log_file).context("failed to start logging")?;
    info!(
        database = %settings.database_path.display(),
        export_dir = %settings.export_dir.display(),
        "starting personal library"
    );

    let store = open_library(&settings.database_path)?;
    let mut app = App::new(store, settings.export_dir.clone())?;
    run_app(&mut app)
}
