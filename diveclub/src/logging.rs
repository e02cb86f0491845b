//! `tracing` subscriber setup for the `diveclub` binary.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    #[default]
    Normal,
    /// Debug events, including SQL statements.
    Verbose,
    Trace,
}

impl Verbosity {
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Default filter directives when `RUST_LOG` is not set.
    ///
    /// Request spans from `tower_http` follow the crate level; `sqlx` and
    /// `sea_orm` statement logging only shows up from `-v` onwards.
    #[must_use]
    pub fn directives(self) -> String {
        let level = self.level();
        let sql = match self {
            Self::Quiet | Self::Normal => Level::WARN,
            Self::Verbose | Self::Trace => level,
        };
        format!("diveclub={level},tower_http={level},sea_orm={sql},sqlx={sql}")
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `verbosity`; calling this twice is harmless.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::default().level(), Level::INFO);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_sql_logging_needs_verbose() {
        assert!(Verbosity::Normal.directives().contains("sqlx=WARN"));
        assert!(Verbosity::Verbose.directives().contains("sqlx=DEBUG"));
        assert!(Verbosity::Quiet.directives().starts_with("diveclub=ERROR"));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Verbose);
    }
}
