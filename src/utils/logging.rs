use log::LevelFilter;

pub const LOG_ENV: &str = "DONORCAST_LOG";
pub const DEFAULT_FILTER: &str = "warn,donorcast=info";

/// Route `log` output to stderr, filtered by `DONORCAST_LOG`.
pub fn init_logging() {
    let _ = env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or(LOG_ENV, DEFAULT_FILTER))
        .format_timestamp(None)
        .try_init();
}
