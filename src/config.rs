//! Runtime configuration and logger setup for the CLI.

use std::path::PathBuf;

use log::LevelFilter;

/// Environment variable naming the data store snapshot.
pub const DATA_ENV: &str = "ANNOEXPORT_DATA";

/// Environment variable naming the scratch root for exports.
pub const SCRATCH_DIR_ENV: &str = "ANNOEXPORT_SCRATCH_DIR";

/// Resolved settings shared by the subcommands.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Data store snapshot (JSON) to read projects from.
    pub data: PathBuf,
    /// Where export scratch directories are created. `None` uses the
    /// system temporary directory.
    pub scratch_dir: Option<PathBuf>,
    /// Number of `-v` flags given.
    pub verbosity: u8,
}

impl Settings {
    /// Log level implied by the verbosity count.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Installs `env_logger`. `RUST_LOG`, when set, overrides `default_level`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(default_level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(default_level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
