//! One-shot import binary: `msrswdb <document.xml> [database]`.
//!
//! The database path defaults to the document path with its extension
//! replaced by `.msrswdb`. Settings come from an optional `msrswdb`
//! config file and `MSRSWDB_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use msrswdb::catalog;
use msrswdb::error::Result;
use msrswdb::persist::{DB_EXTENSION, PersistenceMode, Persistor};
use msrswdb::settings::Settings;
use msrswdb::walker::Importer;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: msrswdb <document.xml> [database]");
        return ExitCode::FAILURE;
    };
    let database = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&input).with_extension(DB_EXTENSION));

    match run(Path::new(&input), &database) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "import failed");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, database: &Path) -> Result<()> {
    let settings = Settings::load()?;
    let mut persistor = Persistor::new(
        PersistenceMode::File(database.display().to_string()),
        &settings.connection,
    )?;
    let importer = Importer::new(catalog::msrsw(), settings.import);
    info!(input = %input.display(), database = %database.display(), "importing");
    let outcome = importer.import_file(input, &mut persistor)?;
    info!(
        root_rid = outcome.root_rid,
        skipped_elements = outcome.report.skipped_elements,
        dropped_attributes = outcome.report.dropped_attributes,
        unplaced_children = outcome.report.unplaced_children,
        discarded_extras = outcome.report.discarded_extras,
        "import finished"
    );
    Ok(())
}
