use env_logger::Env;
use log::LevelFilter;

pub const LOG_ENV: &str = "SKILLMATCH_LOG";

pub struct Logger;

impl Logger {
    /// Installs the global logger at `level`; `SKILLMATCH_LOG` takes precedence when set.
    pub fn init(level: LevelFilter) {
        let mut builder = colog::default_builder();
        builder.filter_level(level);
        builder.parse_env(Env::new().filter(LOG_ENV));

        // A second init (e.g. from tests) keeps the first logger.
        let _ = builder.try_init();
    }
}
