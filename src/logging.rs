/// Conditional logging module for development builds
///
/// The `log!` macro provides informational console logging that is compiled
/// out in production (release) builds by default. Errors and warnings should
/// keep using `leptos::logging::warn!` / `web_sys::console::error_*` directly.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
/// Conditionally log to console in development builds
///
/// Expands to `web_sys::console::log_1()` in debug builds or when the
/// `console_logging` feature is enabled. In production release builds it
/// compiles to nothing.
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            web_sys::console::log_1(&format!($($arg),+).into());
        }
    };
}

pub use log;
