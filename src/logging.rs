use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    /// `-q` wins over any number of `-v`.
    pub fn from_flags(quiet: bool, verbose: u8) -> Verbosity {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Trace,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the verbosity flags.
/// Logs go to stderr so they never mix into tables on stdout.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tripflights={}", verbosity.level())));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::Normal, Verbosity::from_flags(false, 0));
        assert_eq!(Verbosity::Verbose, Verbosity::from_flags(false, 1));
        assert_eq!(Verbosity::Trace, Verbosity::from_flags(false, 3));
        assert_eq!(Verbosity::Quiet, Verbosity::from_flags(true, 2));
    }

    #[test]
    fn test_levels() {
        assert_eq!(Level::ERROR, Verbosity::Quiet.level());
        assert_eq!(Level::WARN, Verbosity::default().level());
        assert_eq!(Level::TRACE, Verbosity::Trace.level());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Trace);
    }
}
