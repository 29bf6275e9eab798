//! Minimal stderr backend for the `log` facade.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger at `level`.
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("installing logger: {e}"))?;
    log::set_max_level(level);
    Ok(())
}

/// Change the level of the installed logger.
pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

/// `-v` flags win over the configured level; the default is `warn`.
pub fn level(verbose: u8, configured: Option<LevelFilter>) -> LevelFilter {
    match verbose {
        0 => configured.unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config() {
        assert_eq!(level(0, None), LevelFilter::Warn);
        assert_eq!(level(0, Some(LevelFilter::Error)), LevelFilter::Error);
        assert_eq!(level(1, Some(LevelFilter::Error)), LevelFilter::Info);
        assert_eq!(level(2, None), LevelFilter::Debug);
        assert_eq!(level(5, None), LevelFilter::Trace);
    }

    #[test]
    fn installed_logger_sees_records_before_and_after_reconfiguring() {
        let debug = log::MetadataBuilder::new()
            .level(log::Level::Debug)
            .target("ferry_harness::config")
            .build();

        init(level(2, None)).unwrap();
        assert!(log::logger().enabled(&debug));

        set_level(level(0, Some(LevelFilter::Error)));
        assert!(!log::logger().enabled(&debug));
        set_level(level(2, Some(LevelFilter::Error)));
        assert!(log::logger().enabled(&debug));
    }
}
