use std::{
    fmt::Write as _,
    io::Write,
    net::{Shutdown, TcpStream},
};

use crate::{
    bounded::{BoundedName, FrameBuf},
    config::ROUTELOG_CONFIG,
    diag,
    error::LogError,
    level::Level,
    log_writer::{LogWriter, SocketParams},
    record::LogRecord,
    timestamp,
};

/// Connected stream the socket writer sends its frames over.
pub trait Transport: Write + Send {
    /// Closes the connection. Dropping the transport must also close it.
    fn close(&mut self) {}
}

impl Transport for TcpStream {
    fn close(&mut self) {
        self.shutdown(Shutdown::Both).ok();
    }
}

impl Transport for Vec<u8> {}

/// Forwards records as text frames to a remote listener.
///
/// Each frame is formatted into a buffer of fixed capacity; oversized frames
/// are cut to exactly that many bytes and a diagnostic is emitted.
pub struct SocketWriter<T: Transport = TcpStream> {
    transport: Option<T>,
    min_level: Level,
    module: BoundedName,
    capacity: usize,
}

impl SocketWriter<TcpStream> {
    /// Connects to `host:port` and sends the banner frame.
    pub fn connect(params: &SocketParams) -> Result<Self, LogError> {
        let host = params.validate()?;
        let stream = TcpStream::connect((host, params.port)).map_err(|source| {
            diag::error(format_args!(
                "could not connect to log server {host}:{}: {source}",
                params.port
            ));
            LogError::unavailable(format!("log server {host}:{}", params.port), source)
        })?;
        Self::with_transport(stream, params)
    }
}

impl<T: Transport> SocketWriter<T> {
    /// Uses an already connected transport and sends the banner frame.
    pub fn with_transport(transport: T, params: &SocketParams) -> Result<Self, LogError> {
        let mut writer = Self {
            transport: Some(transport),
            min_level: params.min_level,
            module: BoundedName::new(&params.module_name),
            capacity: params
                .frame_capacity
                .unwrap_or(ROUTELOG_CONFIG.FRAME_CAPACITY)
                .max(1),
        };
        let mut frame = FrameBuf::with_capacity(writer.capacity);
        frame.write_str(&timestamp::banner())?;
        writer.send(&frame, "banner")?;
        Ok(writer)
    }

    pub fn frame_capacity(&self) -> usize {
        self.capacity
    }

    /// The transport, until the writer is shut down.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    fn frame(&self) -> FrameBuf {
        FrameBuf::with_capacity(self.capacity)
    }

    fn send(&mut self, frame: &FrameBuf, what: &str) -> Result<usize, LogError> {
        let Some(transport) = self.transport.as_mut() else {
            diag::error(format_args!("{what} frame dropped, socket is closed"));
            return Err(LogError::closed("log socket"));
        };
        if frame.is_truncated() {
            diag::warn(format_args!(
                "socket {what} truncated from {} to {} bytes, raise ROUTELOG_FRAME_CAPACITY",
                frame.requested_len(),
                frame.len()
            ));
        }
        transport
            .write_all(frame.as_bytes())
            .and_then(|()| transport.flush())
            .map_err(|err| {
                diag::error(format_args!("socket send failed: {err}"));
                LogError::Io(err)
            })?;
        Ok(frame.len())
    }
}

impl<T: Transport> LogWriter for SocketWriter<T> {
    fn min_level(&self) -> Level {
        self.min_level
    }

    fn module_name(&self) -> &str {
        self.module.as_str()
    }

    fn write(&mut self, record: &LogRecord<'_>) -> Result<usize, LogError> {
        let mut frame = self.frame();
        let time = timestamp::now();
        let tag = record.level.tag();
        match record.location {
            Some(location) => write!(
                frame,
                "\n[{time}] {tag} {}::{}#{}:{}() - {}",
                record.module_or(self.module.as_str()),
                location.file,
                location.line,
                location.func,
                record.message
            )?,
            None => write!(frame, "\n[{time}] {tag} - {}", record.message)?,
        }
        self.send(&frame, "record")
    }

    fn write_func_entry(&mut self, func: &str) -> Result<usize, LogError> {
        let mut frame = self.frame();
        write!(frame, "\n{{ {func}")?;
        self.send(&frame, "function entry")
    }

    fn write_func_exit(&mut self, func: &str, line: u32) -> Result<usize, LogError> {
        let mut frame = self.frame();
        write!(frame, "\n{func} : {line} }}")?;
        self.send(&frame, "function exit")
    }

    fn shutdown(&mut self) -> Result<(), LogError> {
        if let Some(mut transport) = self.transport.take() {
            transport.flush().ok();
            transport.close();
        }
        self.min_level = Level::Trace;
        self.module.clear();
        Ok(())
    }
}
