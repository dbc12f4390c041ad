/// Conditional logging module for development builds
///
/// The `log!` macro provides informational progress logging that is compiled
/// out in production (release) builds by default. Hard failures should
/// continue to surface through `Err` return values, not the log.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
/// Conditionally log to stderr in development builds
///
/// This macro expands to an `eprintln!` in debug builds or when the
/// `console_logging` feature is enabled. In production release builds,
/// it compiles to nothing (zero overhead).
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            eprintln!($($arg),+);
        }
    };
}

pub use log;
