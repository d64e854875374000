use std::sync::LazyLock;

use colored::Colorize;
use derive_from_env::FromEnv;

#[derive(FromEnv)]
#[from_env(prefix = "ROUTELOG")]
#[allow(non_snake_case)]
pub struct RoutelogConfig {
    /// Capacity in bytes of one socket frame.
    #[from_env(default = "1024")]
    pub FRAME_CAPACITY: usize,
    /// Emit the library's own diagnostics on stderr.
    #[from_env(default = "true")]
    pub DIAGNOSTICS: bool,
}

impl Default for RoutelogConfig {
    fn default() -> Self {
        Self {
            FRAME_CAPACITY: 1024,
            DIAGNOSTICS: true,
        }
    }
}

pub static ROUTELOG_CONFIG: LazyLock<RoutelogConfig> = LazyLock::new(|| {
    RoutelogConfig::from_env().unwrap_or_else(|err| {
        eprintln!(
            "{} invalid ROUTELOG_* environment ({err:?}), using defaults",
            "[routelog]".yellow()
        );
        RoutelogConfig::default()
    })
});
