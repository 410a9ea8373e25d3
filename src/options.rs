// Reporter configuration - explicit option structs with documented defaults

use tracing::Level;

use crate::logging::LogTarget;
use crate::model::Collection;

/// Merged logging configuration handed to the sink
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Severity threshold; records below it are dropped
    pub level: Level,
    /// Output targets, all of them receive every record
    pub targets: Vec<LogTarget>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: default_level(),
            targets: default_targets(),
        }
    }
}

/// Reporter-specific overrides supplied by the caller
///
/// Unset logging fields fall back to the defaults; the merge is
/// field-by-field, so the option surface stays closed.
#[derive(Debug, Clone, Default)]
pub struct ReporterOptions {
    /// Disable the reporter entirely; nothing is registered
    pub silent: bool,
    /// Do not subscribe to assertion events at all
    pub no_assertions: bool,
    /// Suppress passed/skipped assertion lines; failures still log
    pub no_success_assertions: bool,
    /// Severity threshold override for the sink
    pub level: Option<Level>,
    /// Output target override for the sink
    pub targets: Option<Vec<LogTarget>>,
}

impl ReporterOptions {
    /// Merge the logging overrides onto the defaults
    pub fn log_options(&self) -> LogOptions {
        let defaults = LogOptions::default();
        LogOptions {
            level: self.level.unwrap_or(defaults.level),
            targets: self.targets.clone().unwrap_or(defaults.targets),
        }
    }
}

/// Run-level options owned by the engine
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The collection being executed
    pub collection: Collection,
    /// Global silence flag; wins over any reporter option
    pub silent: bool,
}

impl RunOptions {
    pub fn for_collection(collection: Collection) -> Self {
        Self {
            collection,
            silent: false,
        }
    }
}

// Default values

fn default_level() -> Level {
    Level::INFO
}

fn default_targets() -> Vec<LogTarget> {
    vec![LogTarget::Console]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_options_defaults() {
        let options = LogOptions::default();
        assert_eq!(options.level, Level::INFO);
        assert_eq!(options.targets.len(), 1);
        assert!(matches!(options.targets[0], LogTarget::Console));
    }

    #[test]
    fn test_reporter_options_defaults() {
        let options = ReporterOptions::default();
        assert!(!options.silent);
        assert!(!options.no_assertions);
        assert!(!options.no_success_assertions);
        assert!(options.level.is_none());
        assert!(options.targets.is_none());
    }

    #[test]
    fn test_merge_keeps_unset_fields_at_default() {
        let options = ReporterOptions {
            level: Some(Level::ERROR),
            ..Default::default()
        };

        let merged = options.log_options();

        assert_eq!(merged.level, Level::ERROR);
        // Targets were not overridden, so the default console target stays
        assert!(matches!(merged.targets[0], LogTarget::Console));
    }

    #[test]
    fn test_merge_applies_target_override() {
        let (target, _buffer) = LogTarget::memory();
        let options = ReporterOptions {
            targets: Some(vec![target]),
            ..Default::default()
        };

        let merged = options.log_options();

        assert_eq!(merged.level, Level::INFO);
        assert!(matches!(merged.targets[0], LogTarget::Memory(_)));
    }
}
