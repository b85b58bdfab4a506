//! Process logger for the command-line driver.

use core::fmt;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Add escape sequence to print with color in Linux console
macro_rules! with_color {
    ($args: ident, $color_code: ident) => {
        format_args!("\u{1B}[{}m{}\u{1B}[0m", $color_code as u8, $args)
    };
}

fn print_in_color(args: fmt::Arguments, color_code: u8) {
    eprint!("{}", with_color!(args, color_code));
}

struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = match record.level() {
            Level::Error => 31, // Red
            Level::Warn => 93,  // BrightYellow
            Level::Info => 34,  // Blue
            Level::Debug => 32, // Green
            Level::Trace => 90, // BrightBlack
        };
        print_in_color(
            format_args!(
                "[{:>5}][{}] {}\n",
                record.level(),
                record.module_path().unwrap_or("imgfs"),
                record.args()
            ),
            color,
        );
    }

    fn flush(&self) {}
}

fn level_from(value: Option<&str>) -> LevelFilter {
    match value {
        Some("ERROR") => LevelFilter::Error,
        Some("WARN") => LevelFilter::Warn,
        Some("INFO") => LevelFilter::Info,
        Some("DEBUG") => LevelFilter::Debug,
        Some("TRACE") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Installs the logger, taking the level from `LOG`.
/// Calling it twice keeps the first logger.
pub fn init() {
    static LOGGER: SimpleLogger = SimpleLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_from(std::env::var("LOG").ok().as_deref()));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_from() {
        assert_eq!(level_from(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(level_from(Some("ERROR")), LevelFilter::Error);
        assert_eq!(level_from(Some("nonsense")), LevelFilter::Warn);
        assert_eq!(level_from(None), LevelFilter::Warn);
    }

    #[test]
    fn test_log_record() {
        print_in_color(format_args!("plain {}\n", 1), 32);
        let logger = SimpleLogger;
        logger.log(
            &Record::builder()
                .args(format_args!("colored record"))
                .level(Level::Error)
                .module_path(Some("imgfs::logging"))
                .build(),
        );
        logger.flush();
    }
}
