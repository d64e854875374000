//! Forwards records from the [`log`] facade to the process-wide logger.
//!
//! ```rust
//! routelog::bridge::init_log_bridge().unwrap();
//! log::info!("Hello from the log facade!");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use log::{LevelFilter, Log};
use routelog_core::Location;

use crate::global;

/// `log` backend writing through [`global`].
struct LogBridge;

static LOG_BRIDGE: LogBridge = LogBridge;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// `log` max level matching the global writer's minimum. Before any writer
/// is active the lazy console writer accepts everything.
fn max_level() -> LevelFilter {
    global()
        .min_level()
        .map_or(LevelFilter::Trace, LevelFilter::from)
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &log::Record) {
        let location = record.file().zip(record.line()).map(|(file, line)| Location {
            file,
            func: record.module_path().unwrap_or_default(),
            line,
        });
        // Failures were already reported on stderr by the writer.
        global()
            .dispatch(
                record.level().into(),
                Some(record.target()),
                location,
                *record.args(),
            )
            .ok();
    }

    fn flush(&self) {}
}

/// Installs the bridge as the `log` backend. Fails if another backend is set.
///
/// [`init_logger`](crate::init_logger) and [`deinit_logger`](crate::deinit_logger)
/// keep the facade's max level in line with the global writer afterwards.
pub fn init_log_bridge() -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOG_BRIDGE)?;
    INSTALLED.store(true, Ordering::Release);
    sync_max_level();
    Ok(())
}

pub(crate) fn sync_max_level() {
    if INSTALLED.load(Ordering::Acquire) {
        log::set_max_level(max_level());
    }
}
