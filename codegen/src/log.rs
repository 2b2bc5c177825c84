use slog::{o, Discard, Drain, Level, Logger};

/// Build the root terminal logger.
///
/// Records are formatted compactly and written from a background thread.
/// Anything below `Debug` is dropped unless `debug` is set.
pub fn logger(debug: bool) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let level = if debug { Level::Debug } else { Level::Info };
    let drain = drain.filter_level(level).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!())
}

/// A logger that swallows every record.
pub fn discard() -> Logger {
    Logger::root(Discard, o!())
}
