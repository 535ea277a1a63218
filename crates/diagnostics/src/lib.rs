//! Console diagnostics shared by the pipeline crates.
//!
//! The level comes from the `E911_LOG` environment variable:
//! - `off` - no logs
//! - `error`, `warn`, `info`, `debug` - minimum level written to stderr
//!
//! Libraries only log through the macros below; the binary decides
//! whether anything is written by calling [`init_diagnostics`].

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

pub const LOG_ENV: &str = "E911_LOG";

static INIT: Once = Once::new();

/// Minimum level written to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl Verbosity {
    /// Parse an `E911_LOG` value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Some(Verbosity::Off),
            "error" => Some(Verbosity::Error),
            "warn" | "warning" => Some(Verbosity::Warn),
            "info" => Some(Verbosity::Info),
            "debug" | "trace" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    fn level(self) -> Option<emit::Level> {
        match self {
            Verbosity::Off => None,
            Verbosity::Error => Some(emit::Level::Error),
            Verbosity::Warn => Some(emit::Level::Warn),
            Verbosity::Info => Some(emit::Level::Info),
            Verbosity::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Initialize diagnostics from `E911_LOG`, falling back to `default`
/// when the variable is unset.
///
/// Safe to call multiple times; only the first call has an effect.
pub fn init_diagnostics_with(default: Verbosity) {
    INIT.call_once(|| {
        let (verbosity, unknown) = match std::env::var(LOG_ENV) {
            Ok(value) => match Verbosity::parse(&value) {
                Some(v) => (v, None),
                None => (Verbosity::Info, Some(value)),
            },
            Err(_) => (default, None),
        };

        let Some(level) = verbosity.level() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if let Some(value) = unknown {
            emit::warn!("Unknown {var} value '{value}', using 'info'", var: LOG_ENV, value: value);
        }

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Initialize diagnostics from `E911_LOG`; logging stays off when unset.
pub fn init_diagnostics() {
    init_diagnostics_with(Verbosity::Off)
}

/// Progress of a pipeline step: "Created session", "Indexed document".
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Detail useful while debugging: poll states, request URLs, page sizes.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Recoverable problems: skipped payloads, failed cleanup, retries.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Failures that abort a pipeline or lose a record.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
        init_diagnostics_with(Verbosity::Debug);
    }

    #[test]
    fn test_parse_verbosity() {
        assert_eq!(Verbosity::parse("off"), Some(Verbosity::Off));
        assert_eq!(Verbosity::parse(" INFO "), Some(Verbosity::Info));
        assert_eq!(Verbosity::parse("warning"), Some(Verbosity::Warn));
        assert_eq!(Verbosity::parse("chatty"), None);
    }

    #[test]
    fn test_macros_compile() {
        info!("Test message");
        debug!("Debug message with {value}", value: 42);
        warn!("Warning message");
        error!("Error message");
    }
}
