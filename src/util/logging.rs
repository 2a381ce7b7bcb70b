use log::LevelFilter;

/// Initialize the logging system with env_logger.
///
/// The `verbose` flag controls whether debug logs are shown for this crate.
/// `RUST_LOG` still overrides both levels. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("judgeline", level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
