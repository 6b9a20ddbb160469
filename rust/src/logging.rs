//! Verbosity-gated logging for the CPM engine and project facade.
//!
//! Nothing is formatted when the verbosity is below the macro's level.
//! Levels:
//! - 0: SILENT (errors are returned, never logged)
//! - 1: CHANGES (schedule mutations, project finish, critical path)
//! - 2: CHECKS (topological order, dangling-task decisions)
//! - 3: DEBUG (per-task ES/EF/LS/LF values)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_silent_does_not_evaluate_format_args() {
        let verbosity = VERBOSITY_SILENT;
        let mut evaluated = false;
        let mut touch = || {
            evaluated = true;
            "x"
        };
        log_changes!(verbosity, "{}", touch());
        log_checks!(verbosity, "{}", 2);
        log_debug!(verbosity, "{}", 3);
        assert!(!evaluated);
    }
}
