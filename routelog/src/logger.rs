use std::{
    fmt, io,
    sync::{Mutex, MutexGuard, PoisonError},
};

#[cfg(feature = "socket")]
use routelog_core::SocketWriter;
use routelog_core::{
    ConsoleParams, FileParams, Level, Location, LogError, LogRecord, LogWriter, Outcome,
    SocketParams, StreamWriter, diag,
};

/// Where an initialized logger sends its records.
#[derive(Debug, Clone)]
pub enum Destination {
    File(FileParams),
    Console(ConsoleParams),
    Socket(SocketParams),
}

impl Destination {
    fn kind(&self) -> &'static str {
        match self {
            Destination::File(_) => "file",
            Destination::Console(_) => "console",
            Destination::Socket(_) => "socket",
        }
    }

    /// Checks the required fields without touching any resource.
    pub fn validate(&self) -> Result<(), LogError> {
        match self {
            Destination::File(params) => params.validate().map(|_| ()),
            Destination::Console(_) => Ok(()),
            Destination::Socket(params) => {
                params.validate()?;
                if cfg!(feature = "socket") {
                    Ok(())
                } else {
                    Err(LogError::Unsupported("socket logger not enabled in this build"))
                }
            }
        }
    }

    fn open(&self) -> Result<Box<dyn LogWriter>, LogError> {
        Ok(match self {
            Destination::File(params) => Box::new(StreamWriter::open(params)?),
            Destination::Console(params) => Box::new(StreamWriter::console(params)?),
            #[cfg(feature = "socket")]
            Destination::Socket(params) => Box::new(SocketWriter::connect(params)?),
            #[cfg(not(feature = "socket"))]
            Destination::Socket(_) => {
                return Err(LogError::Unsupported("socket logger not enabled in this build"));
            }
        })
    }
}

impl From<FileParams> for Destination {
    fn from(params: FileParams) -> Self {
        Destination::File(params)
    }
}

impl From<ConsoleParams> for Destination {
    fn from(params: ConsoleParams) -> Self {
        Destination::Console(params)
    }
}

impl From<SocketParams> for Destination {
    fn from(params: SocketParams) -> Self {
        Destination::Socket(params)
    }
}

type ActiveWriter = Option<Box<dyn LogWriter>>;

/// Builds the writer installed when a record arrives before any `init`.
pub type Fallback = Box<dyn Fn() -> Result<Box<dyn LogWriter>, LogError> + Send + Sync>;

/// Holds the single active writer and serializes every access to it.
///
/// Initialization, shutdown and dispatch all take the same lock, so each
/// record reaches the destination in one piece. Logging from inside a
/// writer on the same thread deadlocks: the lock is not reentrant.
pub struct Logger {
    writer: Mutex<ActiveWriter>,
    fallback: Option<Fallback>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// A logger with no active writer. The first record installs the default console writer.
    pub const fn new() -> Self {
        Self {
            writer: Mutex::new(None),
            fallback: None,
        }
    }

    /// A logger with no active writer whose first record installs the writer built by `fallback`.
    pub fn with_fallback<F>(fallback: F) -> Self
    where
        F: Fn() -> Result<Box<dyn LogWriter>, LogError> + Send + Sync + 'static,
    {
        Self {
            writer: Mutex::new(None),
            fallback: Some(Box::new(fallback)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ActiveWriter> {
        // A writer that panicked must not take logging down with it.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shuts down the current writer, if any, and opens `destination`.
    ///
    /// On failure no writer is left active.
    pub fn init(&self, destination: impl Into<Destination>) -> Result<(), LogError> {
        let destination = destination.into();
        destination.validate().inspect_err(|err| {
            diag::error(format_args!("could not initialize the logger: {err}"));
        })?;
        let mut active = self.lock();
        retire(&mut active);
        let writer = destination.open().inspect_err(|err| {
            diag::error(format_args!(
                "could not initialize the {} logger: {err}",
                destination.kind()
            ));
        })?;
        *active = Some(writer);
        Ok(())
    }

    /// Installs a custom writer, shutting down the current one.
    pub fn install(&self, writer: Box<dyn LogWriter>) {
        let mut active = self.lock();
        retire(&mut active);
        *active = Some(writer);
    }

    /// Shuts down and removes the active writer. A no-op when none is active.
    pub fn deinit(&self) -> Result<(), LogError> {
        match self.lock().take() {
            Some(mut writer) => writer.shutdown(),
            None => Ok(()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Minimum level of the active writer.
    pub fn min_level(&self) -> Option<Level> {
        self.lock().as_ref().map(|writer| writer.min_level())
    }

    /// Routes one record to the active writer if its level passes the writer's minimum.
    ///
    /// `module` overrides the writer's module name for this record.
    pub fn dispatch(
        &self,
        level: Level,
        module: Option<&str>,
        location: Option<Location<'_>>,
        message: fmt::Arguments<'_>,
    ) -> Result<Outcome, LogError> {
        let mut active = self.lock();
        let writer = self.ensure_writer(&mut active)?;
        if level == Level::Disabled || !level.at_least(writer.min_level()) {
            return Ok(Outcome::Filtered);
        }
        writer
            .write(&LogRecord::new(level, module, location, message))
            .map(Outcome::Written)
    }

    /// Logs entry into `func`, at trace priority.
    pub fn func_entry(&self, func: &str) -> Result<Outcome, LogError> {
        let mut active = self.lock();
        let writer = self.ensure_writer(&mut active)?;
        if !Level::Trace.at_least(writer.min_level()) {
            return Ok(Outcome::Filtered);
        }
        writer.write_func_entry(func).map(Outcome::Written)
    }

    /// Logs the return from `func` at `line`, at trace priority.
    pub fn func_exit(&self, func: &str, line: u32) -> Result<Outcome, LogError> {
        let mut active = self.lock();
        let writer = self.ensure_writer(&mut active)?;
        if !Level::Trace.at_least(writer.min_level()) {
            return Ok(Outcome::Filtered);
        }
        writer.write_func_exit(func, line).map(Outcome::Written)
    }

    fn ensure_writer<'a>(
        &self,
        active: &'a mut ActiveWriter,
    ) -> Result<&'a mut Box<dyn LogWriter>, LogError> {
        if active.is_none() {
            let writer = match &self.fallback {
                Some(fallback) => {
                    diag::notice(format_args!(
                        "logger not initialized, installing the fallback writer"
                    ));
                    fallback()
                }
                None => {
                    diag::notice(format_args!(
                        "logger not initialized, logging will be done to console (stdout)"
                    ));
                    StreamWriter::console(&ConsoleParams::stdout())
                        .map(|writer| Box::new(writer) as Box<dyn LogWriter>)
                }
            };
            let writer = writer.map_err(|err| {
                LogError::unavailable("default log writer", io::Error::other(err))
            })?;
            *active = Some(writer);
        }
        active
            .as_mut()
            .ok_or_else(|| LogError::unavailable("log writer", io::ErrorKind::NotFound.into()))
    }
}

fn retire(active: &mut ActiveWriter) {
    if let Some(mut previous) = active.take() {
        diag::notice(format_args!("deinitializing the current log writer"));
        previous.shutdown().ok();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write as _,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use super::*;
    use uuid::Uuid;

    /// Counts calls and records what it was asked to write.
    #[derive(Clone, Default)]
    struct Recorder {
        min_level: Level,
        lines: Arc<Mutex<Vec<String>>>,
        shutdowns: Arc<AtomicUsize>,
    }

    impl LogWriter for Recorder {
        fn min_level(&self) -> Level {
            self.min_level
        }
        fn module_name(&self) -> &str {
            "recorder"
        }
        fn write(&mut self, record: &LogRecord<'_>) -> Result<usize, LogError> {
            let line = format!("{} {}", record.level, record.message);
            let len = line.len();
            self.lines.lock().unwrap().push(line);
            Ok(len)
        }
        fn write_func_entry(&mut self, func: &str) -> Result<usize, LogError> {
            self.lines.lock().unwrap().push(format!("{{ {func}"));
            Ok(1)
        }
        fn write_func_exit(&mut self, func: &str, line: u32) -> Result<usize, LogError> {
            self.lines.lock().unwrap().push(format!("{func} : {line} }}"));
            Ok(1)
        }
        fn shutdown(&mut self) -> Result<(), LogError> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn emit_all(logger: &Logger) -> Vec<Outcome> {
        Level::EMITTING
            .iter()
            .map(|&level| {
                logger
                    .dispatch(level, None, None, format_args!("at {level}"))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_filtering_by_min_level() {
        let logger = Logger::new();
        let recorder = Recorder {
            min_level: Level::Warn,
            ..Default::default()
        };
        logger.install(Box::new(recorder.clone()));
        let outcomes = emit_all(&logger);
        assert!(outcomes[..3].iter().all(Outcome::is_filtered));
        assert!(outcomes[3..].iter().all(|o| !o.is_filtered()));
        assert_eq!(
            *recorder.lines.lock().unwrap(),
            ["WARN at WARN", "ERROR at ERROR", "FATAL at FATAL"]
        );
    }

    #[test]
    fn test_disabled_suppresses_everything() {
        let logger = Logger::new();
        let recorder = Recorder {
            min_level: Level::Disabled,
            ..Default::default()
        };
        logger.install(Box::new(recorder.clone()));
        assert!(emit_all(&logger).iter().all(Outcome::is_filtered));
        assert!(logger.func_entry("f").unwrap().is_filtered());
        assert!(recorder.lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_func_entry_exit_are_trace() {
        let logger = Logger::new();
        let recorder = Recorder::default();
        logger.install(Box::new(recorder.clone()));
        logger.func_entry("parse").unwrap();
        logger.func_exit("parse", 12).unwrap();
        assert_eq!(*recorder.lines.lock().unwrap(), ["{ parse", "parse : 12 }"]);

        let quiet = Recorder {
            min_level: Level::Debug,
            ..Default::default()
        };
        logger.install(Box::new(quiet.clone()));
        assert!(logger.func_entry("parse").unwrap().is_filtered());
        assert!(logger.func_exit("parse", 12).unwrap().is_filtered());
        assert!(quiet.lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_replacing_shuts_down_previous_once() {
        let logger = Logger::new();
        let first = Recorder::default();
        logger.install(Box::new(first.clone()));
        let second = Recorder::default();
        logger.install(Box::new(second.clone()));
        assert_eq!(first.shutdowns.load(Ordering::SeqCst), 1);
        assert_eq!(second.shutdowns.load(Ordering::SeqCst), 0);

        logger.deinit().unwrap();
        logger.deinit().unwrap();
        assert_eq!(first.shutdowns.load(Ordering::SeqCst), 1);
        assert_eq!(second.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deinit_without_writer() {
        let logger = Logger::new();
        assert!(logger.deinit().is_ok());
        assert!(logger.deinit().is_ok());
        assert!(!logger.is_active());
    }

    #[test]
    fn test_invalid_destination_keeps_current_writer() {
        let logger = Logger::new();
        let recorder = Recorder::default();
        logger.install(Box::new(recorder.clone()));
        let err = logger.init(FileParams::default()).unwrap_err();
        assert!(matches!(err, LogError::InvalidArgument(_)));
        let err = logger.init(SocketParams::default()).unwrap_err();
        assert!(matches!(err, LogError::InvalidArgument(_)));
        assert!(logger.is_active());
        assert_eq!(recorder.shutdowns.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_open_leaves_no_writer() {
        let logger = Logger::new();
        let recorder = Recorder::default();
        logger.install(Box::new(recorder.clone()));
        let err = logger
            .init(FileParams::new(format!(
                "/nonexistent_dir/{}/app.log",
                Uuid::new_v4()
            )))
            .unwrap_err();
        assert!(matches!(err, LogError::ResourceUnavailable { .. }));
        assert!(!logger.is_active());
        assert_eq!(recorder.shutdowns.load(Ordering::SeqCst), 1);
    }

    /// Byte sink shared between a test and the writer that owns it.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lazy_writer_emits_banner_then_record() {
        let out = SharedBuf::default();
        let installs = Arc::new(AtomicUsize::new(0));
        let logger = {
            let out = out.clone();
            let installs = installs.clone();
            Logger::with_fallback(move || {
                installs.fetch_add(1, Ordering::SeqCst);
                let writer = StreamWriter::from_writer(out.clone(), Level::Trace, "")?;
                Ok(Box::new(writer) as Box<dyn LogWriter>)
            })
        };
        let here = Location {
            file: "src/main.rs",
            func: "main",
            line: 7,
        };
        logger
            .dispatch(Level::Info, None, Some(here), format_args!("lazy hello"))
            .unwrap();
        logger
            .dispatch(Level::Debug, None, None, format_args!("second"))
            .unwrap();
        assert_eq!(installs.load(Ordering::SeqCst), 1);
        assert_eq!(logger.min_level(), Some(Level::Trace));
        logger.deinit().unwrap();

        let content = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let re = regex::Regex::new(
            r"^\n----- Logging Started on \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} -----\n\[I\]:src/main\.rs:main:7:lazy hello\n\[D\]second\n$",
        )
        .unwrap();
        assert!(re.is_match(&content), "unexpected output {content:?}");
    }

    #[test]
    fn test_failing_fallback_is_unavailable() {
        let logger = Logger::with_fallback(|| {
            Err(LogError::unavailable("test sink", io::ErrorKind::BrokenPipe.into()))
        });
        let err = logger
            .dispatch(Level::Info, None, None, format_args!("lost"))
            .unwrap_err();
        assert!(matches!(err, LogError::ResourceUnavailable { .. }));
        assert!(!logger.is_active());
    }

    #[cfg(not(feature = "socket"))]
    #[test]
    fn test_socket_left_out_of_build() {
        let logger = Logger::new();
        let err = logger
            .init(SocketParams::new("127.0.0.1", 50007))
            .unwrap_err();
        assert!(matches!(err, LogError::Unsupported(_)));
    }

    #[test]
    fn test_lazy_console_writer() {
        let logger = Logger::new();
        assert!(!logger.is_active());
        let outcome = logger
            .dispatch(Level::Info, None, None, format_args!("lazy hello"))
            .unwrap();
        assert_eq!(outcome, Outcome::Written("[I]lazy hello\n".len()));
        assert_eq!(logger.min_level(), Some(Level::Trace));
        logger.deinit().unwrap();
        assert!(!logger.is_active());
    }
}
