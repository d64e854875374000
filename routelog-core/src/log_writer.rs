use std::{
    fmt::Write as _,
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{
    bounded::BoundedName,
    diag,
    error::LogError,
    level::Level,
    record::LogRecord,
    timestamp,
};

/// A log destination. Exactly one writer is active per logger; it is only
/// ever touched while the logger's lock is held.
pub trait LogWriter: Send {
    /// Records below this level are filtered out by the dispatcher.
    fn min_level(&self) -> Level;
    /// Module name used when the call site does not give one.
    fn module_name(&self) -> &str;
    /// Emits one record, returning the number of bytes produced.
    fn write(&mut self, record: &LogRecord<'_>) -> Result<usize, LogError>;
    fn write_func_entry(&mut self, func: &str) -> Result<usize, LogError>;
    fn write_func_exit(&mut self, func: &str, line: u32) -> Result<usize, LogError>;
    /// Releases the destination. The writer is not used again afterwards.
    fn shutdown(&mut self) -> Result<(), LogError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Discard any previous content.
    #[default]
    Truncate,
    /// Keep previous content and write after it.
    Append,
}

#[derive(Debug, Clone, Default)]
pub struct FileParams {
    pub path: Option<PathBuf>,
    pub open_mode: OpenMode,
    pub min_level: Level,
    pub module_name: String,
}

impl FileParams {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }
    /// Sets the open mode.
    pub fn with_open_mode(self, open_mode: OpenMode) -> Self {
        Self { open_mode, ..self }
    }
    /// Opens the file in append mode.
    pub fn append(self) -> Self {
        self.with_open_mode(OpenMode::Append)
    }
    pub fn with_min_level(self, min_level: Level) -> Self {
        Self { min_level, ..self }
    }
    pub fn with_module_name(self, name: &str) -> Self {
        Self {
            module_name: name.into(),
            ..self
        }
    }

    pub fn validate(&self) -> Result<&Path, LogError> {
        self.path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(LogError::InvalidArgument("file path is required"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    StdOut,
    StdErr,
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleParams {
    pub stream: ConsoleStream,
    pub min_level: Level,
    pub module_name: String,
}

impl ConsoleParams {
    pub fn stdout() -> Self {
        Self::default()
    }
    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::StdErr,
            ..Default::default()
        }
    }
    /// Picks the stream by name. Anything other than `stdout` or `stderr`
    /// is corrected to stdout with a diagnostic.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "stdout" => Self::stdout(),
            "stderr" => Self::stderr(),
            _ => {
                diag::warn(format_args!(
                    "`{name}` is not a console stream, stdout will be used"
                ));
                Self::stdout()
            }
        }
    }
    pub fn with_min_level(self, min_level: Level) -> Self {
        Self { min_level, ..self }
    }
    pub fn with_module_name(self, name: &str) -> Self {
        Self {
            module_name: name.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SocketParams {
    pub host: Option<String>,
    pub port: u16,
    pub min_level: Level,
    pub module_name: String,
    /// Overrides `ROUTELOG_FRAME_CAPACITY` for this writer.
    pub frame_capacity: Option<usize>,
}

impl SocketParams {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port,
            ..Default::default()
        }
    }
    pub fn with_min_level(self, min_level: Level) -> Self {
        Self { min_level, ..self }
    }
    pub fn with_module_name(self, name: &str) -> Self {
        Self {
            module_name: name.into(),
            ..self
        }
    }
    pub fn with_frame_capacity(self, capacity: usize) -> Self {
        Self {
            frame_capacity: Some(capacity),
            ..self
        }
    }

    pub fn validate(&self) -> Result<&str, LogError> {
        self.host
            .as_deref()
            .filter(|host| !host.is_empty())
            .ok_or(LogError::InvalidArgument("socket host is required"))
    }
}

enum Sink {
    File(File),
    StdOut,
    StdErr,
    Writer(Box<dyn Write + Send>),
    Closed,
}

/// Line-oriented writer for a log file or one of the standard streams.
///
/// Every record is rendered completely, written with a single `write_all`
/// and flushed right away.
pub struct StreamWriter {
    sink: Sink,
    min_level: Level,
    module: BoundedName,
}

impl StreamWriter {
    /// Opens (or creates) the log file and writes the banner.
    pub fn open(params: &FileParams) -> Result<Self, LogError> {
        let path = params.validate()?;
        let mut options = File::options();
        match params.open_mode {
            OpenMode::Truncate => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
        };
        let file = options.open(path).map_err(|source| {
            diag::error(format_args!(
                "could not open log file {}: {source}",
                path.display()
            ));
            LogError::unavailable(format!("log file {}", path.display()), source)
        })?;
        Self::start(Sink::File(file), params.min_level, &params.module_name)
    }

    /// Writes to stdout or stderr, starting with the banner.
    pub fn console(params: &ConsoleParams) -> Result<Self, LogError> {
        let sink = match params.stream {
            ConsoleStream::StdOut => Sink::StdOut,
            ConsoleStream::StdErr => Sink::StdErr,
        };
        Self::start(sink, params.min_level, &params.module_name)
    }

    /// Writes to any byte sink, starting with the banner.
    pub fn from_writer<W: Write + Send + 'static>(
        out: W,
        min_level: Level,
        module_name: &str,
    ) -> Result<Self, LogError> {
        Self::start(Sink::Writer(Box::new(out)), min_level, module_name)
    }

    fn start(sink: Sink, min_level: Level, module_name: &str) -> Result<Self, LogError> {
        let mut writer = Self {
            sink,
            min_level,
            module: BoundedName::new(module_name),
        };
        writer.emit(timestamp::banner().as_bytes())?;
        Ok(writer)
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<usize, LogError> {
        let result = match &mut self.sink {
            Sink::File(file) => write_flushed(file, bytes),
            Sink::StdOut => write_flushed(&mut io::stdout().lock(), bytes),
            Sink::StdErr => write_flushed(&mut io::stderr().lock(), bytes),
            Sink::Writer(out) => write_flushed(out, bytes),
            Sink::Closed => {
                diag::error(format_args!("write attempted on a closed log stream"));
                return Err(LogError::closed("log stream"));
            }
        };
        result.map(|()| bytes.len()).map_err(|err| {
            diag::error(format_args!("log stream write failed: {err}"));
            LogError::Io(err)
        })
    }
}

fn write_flushed<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}

/// `<tag><module>:<file>:<func>:<line>:<message>\n`, or `<tag><message>\n`
/// when the record has no location.
fn render_line(record: &LogRecord<'_>, default_module: &str) -> Result<String, LogError> {
    let mut line = String::with_capacity(128);
    line.push_str(record.level.tag());
    if let Some(location) = record.location {
        write!(
            line,
            "{}:{}:{}:{}:",
            record.module_or(default_module),
            location.file,
            location.func,
            location.line
        )?;
    }
    write!(line, "{}", record.message)?;
    line.push('\n');
    Ok(line)
}

impl LogWriter for StreamWriter {
    fn min_level(&self) -> Level {
        self.min_level
    }

    fn module_name(&self) -> &str {
        self.module.as_str()
    }

    fn write(&mut self, record: &LogRecord<'_>) -> Result<usize, LogError> {
        let line = render_line(record, self.module.as_str())?;
        self.emit(line.as_bytes())
    }

    fn write_func_entry(&mut self, func: &str) -> Result<usize, LogError> {
        self.emit(format!("{{ {func} \n").as_bytes())
    }

    fn write_func_exit(&mut self, func: &str, line: u32) -> Result<usize, LogError> {
        self.emit(format!("{func} : {line} }}\n").as_bytes())
    }

    fn shutdown(&mut self) -> Result<(), LogError> {
        // Standard streams are flushed but never closed.
        match std::mem::replace(&mut self.sink, Sink::Closed) {
            Sink::File(mut file) => {
                file.flush().ok();
            }
            Sink::Writer(mut out) => {
                out.flush().ok();
            }
            Sink::StdOut => {
                io::stdout().flush().ok();
            }
            Sink::StdErr | Sink::Closed => {}
        }
        self.min_level = Level::Trace;
        self.module.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::record::Location;
    use uuid::Uuid;

    fn temp_log(name: &str) -> PathBuf {
        PathBuf::from(format!("/tmp/routelog_{name}_{}.log", Uuid::new_v4()))
    }

    /// Byte sink whose contents stay readable after the writer takes it.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn body_after_banner(content: &str) -> &str {
        content.split_once(" -----\n").unwrap().1
    }

    const HERE: Location<'static> = Location {
        file: "src/net.rs",
        func: "connect",
        line: 42,
    };

    #[test]
    fn test_log_file_lines() {
        let path = temp_log("lines");
        let mut writer =
            StreamWriter::open(&FileParams::new(&path).with_module_name("HTTP")).unwrap();
        writer
            .write(&LogRecord::new(
                Level::Warn,
                None,
                Some(HERE),
                format_args!("retry {}", 3),
            ))
            .unwrap();
        writer
            .write(&LogRecord::new(
                Level::Info,
                Some("DB"),
                Some(HERE),
                format_args!("pool ready"),
            ))
            .unwrap();
        let bytes = writer
            .write(&LogRecord::new(
                Level::Fatal,
                None,
                None,
                format_args!("no location"),
            ))
            .unwrap();
        assert_eq!(bytes, "[F]no location\n".len());
        writer.write_func_entry("connect").unwrap();
        writer.write_func_exit("connect", 57).unwrap();
        writer.shutdown().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("\n----- Logging Started on "));
        assert_eq!(
            body_after_banner(&content),
            "[W]HTTP:src/net.rs:connect:42:retry 3\n\
             [I]DB:src/net.rs:connect:42:pool ready\n\
             [F]no location\n\
             { connect \n\
             connect : 57 }\n"
        );
    }

    #[test]
    fn test_truncate_discards_previous_content() {
        let path = temp_log("truncate");
        std::fs::write(&path, "old content\n").unwrap();
        let mut writer = StreamWriter::open(&FileParams::new(&path)).unwrap();
        writer.shutdown().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old content"));
        assert!(content.starts_with("\n----- Logging Started on "));
    }

    #[test]
    fn test_append_keeps_previous_content() {
        let path = temp_log("append");
        std::fs::write(&path, "old content\n").unwrap();
        let mut writer = StreamWriter::open(&FileParams::new(&path).append()).unwrap();
        writer
            .write(&LogRecord::new(Level::Info, None, None, format_args!("new")))
            .unwrap();
        writer.shutdown().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("old content\n\n----- Logging Started on "));
        assert!(content.ends_with(" -----\n[I]new\n"));
    }

    #[test]
    fn test_missing_path_is_invalid() {
        let err = StreamWriter::open(&FileParams::default()).err().unwrap();
        assert!(matches!(err, LogError::InvalidArgument(_)));
        let err = StreamWriter::open(&FileParams::new("")).err().unwrap();
        assert!(matches!(err, LogError::InvalidArgument(_)));
    }

    #[test]
    fn test_unopenable_path_is_unavailable() {
        let err = StreamWriter::open(&FileParams::new("/nonexistent_dir/routelog/x.log"))
            .err()
            .unwrap();
        assert!(matches!(err, LogError::ResourceUnavailable { .. }));
    }

    #[test]
    fn test_shutdown_clears_state() {
        let path = temp_log("shutdown");
        let mut writer = StreamWriter::open(
            &FileParams::new(&path)
                .with_min_level(Level::Error)
                .with_module_name("core"),
        )
        .unwrap();
        assert_eq!(writer.min_level(), Level::Error);
        assert_eq!(writer.module_name(), "core");
        writer.shutdown().unwrap();
        assert_eq!(writer.min_level(), Level::Trace);
        assert_eq!(writer.module_name(), "");
        assert!(writer.write_func_entry("late").is_err());
        assert!(writer.shutdown().is_ok());
    }

    #[test]
    fn test_console_stream_names() {
        assert_eq!(ConsoleParams::from_name("stderr").stream, ConsoleStream::StdErr);
        assert_eq!(ConsoleParams::from_name(" STDOUT ").stream, ConsoleStream::StdOut);
        assert_eq!(ConsoleParams::from_name("/dev/tty3").stream, ConsoleStream::StdOut);
    }

    #[test]
    fn test_custom_writer() {
        let out = SharedBuf::default();
        let mut writer = StreamWriter::from_writer(out.clone(), Level::Info, "mem").unwrap();
        writer
            .write(&LogRecord::new(Level::Info, None, Some(HERE), format_args!("ready")))
            .unwrap();
        writer.shutdown().unwrap();
        let content = out.contents();
        assert!(content.starts_with("\n----- Logging Started on "));
        assert_eq!(body_after_banner(&content), "[I]mem:src/net.rs:connect:42:ready\n");
        assert!(writer.write_func_entry("late").is_err());
    }

    #[test]
    fn test_log_stdout() {
        let mut writer = StreamWriter::console(&ConsoleParams::stdout()).unwrap();
        let bytes = writer
            .write(&LogRecord::new(
                Level::Debug,
                None,
                Some(HERE),
                format_args!("Hello, world!"),
            ))
            .unwrap();
        assert_eq!(bytes, "[D]:src/net.rs:connect:42:Hello, world!\n".len());
        writer.shutdown().unwrap();
    }
}
