#[cfg(feature = "socket")]
use std::fmt;

/// A module name stored in at most [`BoundedName::CAPACITY`] bytes.
/// Longer names are cut on the last char boundary that fits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedName(String);

impl BoundedName {
    pub const CAPACITY: usize = 64;

    pub fn new(name: &str) -> Self {
        let mut end = name.len().min(Self::CAPACITY);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        Self(name[..end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Fixed-capacity frame buffer.
///
/// Formatting into it never fails and never grows past `capacity`: bytes
/// beyond it are counted and dropped, so a frame is cut at exactly
/// `capacity` bytes.
#[cfg(feature = "socket")]
#[derive(Debug)]
pub struct FrameBuf {
    buf: Vec<u8>,
    capacity: usize,
    dropped: usize,
}

#[cfg(feature = "socket")]
impl FrameBuf {
    /// Bytes reserved up front. Larger frames grow on demand up to `capacity`.
    const RESERVE: usize = 4096;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity.min(Self::RESERVE)),
            capacity,
            dropped: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    /// Length the frame would have had without the capacity limit.
    pub fn requested_len(&self) -> usize {
        self.buf.len() + self.dropped
    }
}

#[cfg(feature = "socket")]
impl fmt::Write for FrameBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.capacity - self.buf.len();
        let take = s.len().min(room);
        self.buf.extend_from_slice(&s.as_bytes()[..take]);
        self.dropped += s.len() - take;
        Ok(())
    }
}
