//! Output sinks for serializers
//!
//! A [`Writer`] accepts text and reports how many bytes it took. Sinks that
//! run out of room (a fixed slice) or fail (an I/O stream) accept fewer bytes
//! than offered instead of returning an error, and the serializer's byte count
//! reflects what actually landed.

use std::io;

/// Destination for serialized text
pub trait Writer {
    /// Append `text`, returning the number of bytes accepted
    fn write_text(&mut self, text: &str) -> usize;
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write_text(&mut self, text: &str) -> usize {
        (**self).write_text(text)
    }
}

impl Writer for Vec<u8> {
    fn write_text(&mut self, text: &str) -> usize {
        self.extend_from_slice(text.as_bytes());
        text.len()
    }
}

impl Writer for String {
    fn write_text(&mut self, text: &str) -> usize {
        self.push_str(text);
        text.len()
    }
}

/// Accepts and discards everything; used to measure output
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyWriter;

impl Writer for DummyWriter {
    fn write_text(&mut self, text: &str) -> usize {
        text.len()
    }
}

/// Fills a caller-provided buffer and drops whatever does not fit
///
/// Truncation happens at a byte boundary, which may split a multi-byte
/// character.
#[derive(Debug)]
pub struct SliceWriter<'b> {
    buffer: &'b mut [u8],
    len: usize,
}

impl<'b> SliceWriter<'b> {
    /// Writer over `buffer`, starting at its beginning
    pub fn new(buffer: &'b mut [u8]) -> Self {
        Self { buffer, len: 0 }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was written
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// The written prefix of the buffer
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}

impl Writer for SliceWriter<'_> {
    fn write_text(&mut self, text: &str) -> usize {
        let room = self.buffer.len() - self.len;
        let taken = text.len().min(room);
        self.buffer[self.len..self.len + taken].copy_from_slice(&text.as_bytes()[..taken]);
        self.len += taken;
        taken
    }
}

/// Adapter over [`std::io::Write`]
///
/// The first I/O error stops all further output and is kept for
/// [`take_error`](Self::take_error).
#[derive(Debug)]
pub struct IoWriter<W> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoWriter<W> {
    /// Wrap `inner`
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    /// The error that stopped output, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Flush the underlying stream
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Writer for IoWriter<W> {
    fn write_text(&mut self, text: &str) -> usize {
        if self.error.is_some() {
            return 0;
        }
        match self.inner.write_all(text.as_bytes()) {
            Ok(()) => text.len(),
            Err(err) => {
                self.error = Some(err);
                0
            }
        }
    }
}
