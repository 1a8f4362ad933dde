use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app_dirs::AppDirs;

const DEFAULT_FILTER: &str = "quizr=info";

/// Where tracing output goes, if anywhere.
///
/// The terminal belongs to the UI, so logs only ever go to a file. Logging is
/// off unless `RUST_LOG` is set or a file was asked for explicitly.
pub fn log_target(explicit: Option<&Path>, rust_log_set: bool) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if rust_log_set => AppDirs::log_path(),
        None => None,
    }
}

/// Install the file subscriber. Later calls are no-ops.
pub fn init_file_logging(path: &Path) -> std::io::Result<()> {
    static INIT: Once = Once::new();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .compact()
            .with_writer(Mutex::new(file));

        let filter_layer =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });

    Ok(())
}
