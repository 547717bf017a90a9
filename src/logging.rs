//! Diagnostic logging to standard error.
//!
//! Standard output carries the transcript and nothing else, so every
//! diagnostic line goes to stderr as `INFO:` / `WARNING:` / `ERROR:`.

/// Level prefix for a log record. `log` renders Warn as "WARN"; callers of
/// this worker expect the full word.
fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARNING",
        log::Level::Info => "INFO",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

/// Install the stderr logger. Info by default; set WHISPER_WORKER_LOG to
/// `debug` or `trace` for more.
pub fn init_logger() -> Result<(), fern::InitError> {
    let level = match std::env::var("WHISPER_WORKER_LOG").as_deref() {
        Ok("trace") => log::LevelFilter::Trace,
        Ok("debug") => log::LevelFilter::Debug,
        _ => log::LevelFilter::Info,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{}: {}", level_tag(record.level()), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
