use routelog_core::Level;

use crate::STATIC_MIN_LEVEL;

/// Compile-time settings shared by a group of call sites.
///
/// Declare one as a `const` and pass it to the macros with `scope:`.
/// Calls below the scope's static minimum compile to nothing and never
/// reach the logger.
///
/// ```rust
/// use routelog::{Level, Scope};
///
/// const HTTP: Scope = Scope::new().module("HTTP Module").min_level(Level::Info);
///
/// let status = routelog::debug!(scope: HTTP, "never compiled in");
/// assert!(status.is_filtered());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    module: Option<&'static str>,
    min_level: Level,
    filenames: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Scope {
    /// No module name, every level allowed, file names included.
    pub const DEFAULT: Scope = Scope {
        module: None,
        min_level: Level::Trace,
        filenames: true,
    };

    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Module name attached to records from this scope instead of the writer's.
    pub const fn module(self, name: &'static str) -> Self {
        Self {
            module: Some(name),
            ..self
        }
    }

    /// Static minimum level for this scope.
    pub const fn min_level(self, level: Level) -> Self {
        Self {
            min_level: level,
            ..self
        }
    }

    /// Records from this scope carry `""` as file name.
    pub const fn without_filenames(self) -> Self {
        Self {
            filenames: false,
            ..self
        }
    }

    pub const fn module_name(&self) -> Option<&'static str> {
        self.module
    }

    /// Whether a call at `level` survives both the scope's and the crate-wide
    /// static threshold.
    pub const fn allows(&self, level: Level) -> bool {
        !matches!(level, Level::Disabled)
            && level.at_least(self.min_level)
            && level.at_least(STATIC_MIN_LEVEL)
    }

    pub const fn file(&self, file: &'static str) -> &'static str {
        if self.filenames && !cfg!(feature = "no_filenames") {
            file
        } else {
            ""
        }
    }
}
